//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Data models** ([`models`]) - Atom records, models, residue categories and samples.
//! - **File I/O** ([`io`]) - The fixed-column structure format and the charge summaries.

pub mod io;
pub mod models;
