use super::spin::collect_candidates;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::model::Model;
use crate::engine::config::SelectionConfig;
use crate::engine::error::EngineError;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Writes every candidate residue of the first model, without sampling, as a
/// single-model structure file and returns the candidates.
///
/// # Errors
///
/// Returns an error if the selection is invalid or the output cannot be
/// written.
#[instrument(skip_all, name = "extract_workflow")]
pub fn run(
    models: &[Model],
    selection: &SelectionConfig,
    output: &Path,
) -> Result<Model, EngineError> {
    selection.validate()?;
    let candidates = collect_candidates(models, selection);
    if candidates.is_empty() {
        warn!("No chargeable residues found below {} A.", selection.depth_threshold);
    }
    PdbFile::write_model_to_path(&candidates, output)?;
    info!(
        "Wrote {} chargeable residues to {}",
        candidates.len(),
        output.display()
    );
    Ok(candidates)
}
