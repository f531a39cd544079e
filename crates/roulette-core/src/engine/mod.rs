//! # Engine Module
//!
//! The selection and sampling machinery behind the workflows.
//!
//! - **Configuration** ([`config`]) - Sample sizes, patience, depth threshold and residue types
//! - **Selection** ([`selection`]) - Field-membership and depth filters over parsed models
//! - **Sampling** ([`sampling`]) - The patience-bounded generator of unique charge samples
//! - **Progress Monitoring** ([`progress`]) - Hooks for front ends that display progress
//! - **Error Handling** ([`error`]) - The error type returned by the workflows

pub mod config;
pub mod error;
pub mod progress;
pub mod sampling;
pub mod selection;
