//! Data structures for depth-annotated structures and drawn charge samples.
//!
//! - [`atom`] - A single fixed-column `ATOM` record and its residue identity.
//! - [`model`] - One coordinate frame of a (possibly multi-model) file.
//! - [`residue`] - The basic residue categories and excluded residue codes.
//! - [`sample`] - A sorted, identity-comparable set of residues to charge.

pub mod atom;
pub mod model;
pub mod residue;
pub mod sample;
