use phf::{Set, phf_set};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Residue codes that are unassigned or ambiguous and never enter a model.
static EXCLUDED_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ASX", "GLX", "SEC", "PYL", "UNK",
};

/// Returns `true` when the residue name is an ambiguous or unassigned code.
pub fn is_excluded_residue(name: &str) -> bool {
    EXCLUDED_RESIDUE_NAMES.contains(name)
}

/// The basic residues whose side chains can carry a positive charge.
///
/// The declaration order is the fixed category order used by every writer:
/// lysine, arginine, histidine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BasicResidue {
    #[serde(alias = "lys", alias = "lysine")]
    Lys,
    #[serde(alias = "arg", alias = "arginine")]
    Arg,
    #[serde(alias = "his", alias = "histidine")]
    His,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a basic residue (expected LYS, ARG or HIS)")]
pub struct UnknownResidueError(pub String);

impl BasicResidue {
    pub const ALL: [BasicResidue; 3] = [BasicResidue::Lys, BasicResidue::Arg, BasicResidue::His];

    /// The three-letter code as it appears in structure files.
    pub fn code(self) -> &'static str {
        match self {
            BasicResidue::Lys => "LYS",
            BasicResidue::Arg => "ARG",
            BasicResidue::His => "HIS",
        }
    }

    /// The full lowercase name, used by the expect-script report.
    pub fn full_name(self) -> &'static str {
        match self {
            BasicResidue::Lys => "lysine",
            BasicResidue::Arg => "arginine",
            BasicResidue::His => "histidine",
        }
    }

    /// Maps a residue name from a structure file onto a category.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "LYS" => Some(BasicResidue::Lys),
            "ARG" => Some(BasicResidue::Arg),
            "HIS" => Some(BasicResidue::His),
            _ => None,
        }
    }
}

impl fmt::Display for BasicResidue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BasicResidue {
    type Err = UnknownResidueError;

    /// Accepts the three-letter code or the full name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LYS" | "LYSINE" => Ok(BasicResidue::Lys),
            "ARG" | "ARGININE" => Ok(BasicResidue::Arg),
            "HIS" | "HISTIDINE" => Ok(BasicResidue::His),
            _ => Err(UnknownResidueError(s.to_string())),
        }
    }
}
