use std::io;
use thiserror::Error;

use super::config::ConfigError;
use super::sampling::SamplingError;
use crate::core::io::charges::ChargesError;
use crate::core::io::pdb::PdbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Structure file error: {source}")]
    Structure {
        #[from]
        source: PdbError,
    },

    #[error("Failed to write charge summary: {source}")]
    Charges {
        #[from]
        source: ChargesError,
    },

    #[error("Failed to save outputs: {source}")]
    Output {
        #[from]
        source: io::Error,
    },

    #[error(
        "Requested number of charges ({requested}) is greater than the number of residues that can be sampled from ({available}). Decrease the number of charges, raise the depth threshold, or re-enable excluded residue types"
    )]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("Sampling failed: {source}")]
    Sampling {
        #[from]
        source: SamplingError,
    },
}
