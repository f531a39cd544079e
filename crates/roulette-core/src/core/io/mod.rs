//! Provides input/output functionality for depth-annotated structure files and
//! the charge summaries derived from them.
//!
//! Structure files are read and written through the [`traits::StructureFile`]
//! interface; every path-based writer goes through
//! [`traits::write_atomically`] so that a failed run never leaves a truncated
//! file behind.

pub mod charges;
pub mod pdb;
pub mod traits;
