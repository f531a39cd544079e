use chargeroulette::core::io::pdb::DepthPolicy;
use chargeroulette::engine::config::{DEFAULT_DEPTH_THRESHOLD, DEFAULT_PATIENCE};

/// Values used when neither the command line nor the config file sets them.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultsConfig {
    pub depth_threshold: f64,
    pub patience: usize,
    pub depth_policy: DepthPolicy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            depth_threshold: DEFAULT_DEPTH_THRESHOLD,
            patience: DEFAULT_PATIENCE,
            depth_policy: DepthPolicy::Strict,
        }
    }
}
