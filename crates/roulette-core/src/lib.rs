//! # ChargeRoulette Core Library
//!
//! Picks which basic residues (lysine, arginine, histidine) of a protein to
//! charge in gas-phase simulations. The input is a PDB file whose
//! temperature-factor column holds per-atom burial depths; the output is a set
//! of randomized, mutually distinct residue selections, written as a
//! multi-model PDB file and as a compact charge summary for the downstream
//! expect scripts.
//!
//! ## Layers
//!
//! - **[`core`]** - Stateless data models (`AtomRecord`, `Model`, `Sample`) and
//!   the fixed-column file formats.
//! - **[`engine`]** - Selection filters, the unique-sample generator, configuration,
//!   progress reporting and errors.
//! - **[`workflows`]** - The end-to-end procedures: `spin` draws and writes
//!   charge samples, `extract` writes every candidate residue.

pub mod core;
pub mod engine;
pub mod workflows;
