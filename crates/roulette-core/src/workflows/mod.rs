//! End-to-end procedures built on the [`crate::core`] and [`crate::engine`] layers.
//!
//! - [`spin`] - Select candidates, draw unique charge samples and write them out.
//! - [`extract`] - Write every candidate residue without sampling.

pub mod extract;
pub mod spin;
