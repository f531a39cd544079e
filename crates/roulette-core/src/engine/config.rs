use crate::core::io::pdb::DepthPolicy;
use crate::core::models::residue::BasicResidue;
use std::collections::BTreeSet;
use thiserror::Error;

pub const DEFAULT_DEPTH_THRESHOLD: f64 = 5.0;
pub const DEFAULT_PATIENCE: usize = 10;

/// The atom kept as the single representative of each residue.
pub const REPRESENTATIVE_ATOM: &str = "CA";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Which residues are candidates for charging.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Residues are kept only when their depth is strictly below this value.
    pub depth_threshold: f64,
    /// The enabled residue categories, iterated in output order.
    pub residues: BTreeSet<BasicResidue>,
    pub depth_policy: DepthPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            depth_threshold: DEFAULT_DEPTH_THRESHOLD,
            residues: BasicResidue::ALL.into_iter().collect(),
            depth_policy: DepthPolicy::default(),
        }
    }
}

impl SelectionConfig {
    /// The three-letter codes of the enabled categories.
    pub fn residue_codes(&self) -> Vec<&'static str> {
        self.residues.iter().map(|r| r.code()).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.depth_threshold.is_finite() {
            return Err(ConfigError::InvalidValue {
                parameter: "depth_threshold",
                reason: format!("must be a finite number, got {}", self.depth_threshold),
            });
        }
        if self.residues.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "residues",
                reason: "every residue type is excluded".to_string(),
            });
        }
        Ok(())
    }
}

/// How many samples are drawn and how hard the sampler tries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingConfig {
    pub n_charges: usize,
    pub n_samples: usize,
    /// Consecutive duplicate draws tolerated before giving up.
    pub patience: usize,
    /// Seed for a reproducible run; drawn from OS entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouletteConfig {
    pub selection: SelectionConfig,
    pub sampling: SamplingConfig,
}

#[derive(Default)]
pub struct RouletteConfigBuilder {
    n_charges: Option<usize>,
    n_samples: Option<usize>,
    patience: Option<usize>,
    seed: Option<u64>,
    depth_threshold: Option<f64>,
    residues: Option<BTreeSet<BasicResidue>>,
    depth_policy: Option<DepthPolicy>,
}

impl RouletteConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_charges(mut self, n: usize) -> Self {
        self.n_charges = Some(n);
        self
    }
    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = Some(n);
        self
    }
    pub fn patience(mut self, patience: usize) -> Self {
        self.patience = Some(patience);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn depth_threshold(mut self, threshold: f64) -> Self {
        self.depth_threshold = Some(threshold);
        self
    }
    pub fn residues(mut self, residues: impl IntoIterator<Item = BasicResidue>) -> Self {
        self.residues = Some(residues.into_iter().collect());
        self
    }
    pub fn depth_policy(mut self, policy: DepthPolicy) -> Self {
        self.depth_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<RouletteConfig, ConfigError> {
        let defaults = SelectionConfig::default();
        let selection = SelectionConfig {
            depth_threshold: self.depth_threshold.unwrap_or(defaults.depth_threshold),
            residues: self.residues.unwrap_or(defaults.residues),
            depth_policy: self.depth_policy.unwrap_or(defaults.depth_policy),
        };
        selection.validate()?;

        let sampling = SamplingConfig {
            n_charges: self
                .n_charges
                .ok_or(ConfigError::MissingParameter("n_charges"))?,
            n_samples: self
                .n_samples
                .ok_or(ConfigError::MissingParameter("n_samples"))?,
            patience: self.patience.unwrap_or(DEFAULT_PATIENCE),
            seed: self.seed,
        };
        for (parameter, value) in [
            ("n_charges", sampling.n_charges),
            ("n_samples", sampling.n_samples),
            ("patience", sampling.patience),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    parameter,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        Ok(RouletteConfig {
            selection,
            sampling,
        })
    }
}
