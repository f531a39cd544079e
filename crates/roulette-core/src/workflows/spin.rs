use crate::core::io::charges::{write_charge_report_to, write_charges_to};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::{StructureFile, persist_all, stage};
use crate::core::models::model::Model;
use crate::core::models::sample::Sample;
use crate::engine::config::{
    REPRESENTATIVE_ATOM, RouletteConfig, SamplingConfig, SelectionConfig,
};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sampling::charge_sample_with_progress;
use crate::engine::selection::{AtomField, below_depth, select};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What was found in the input before any sampling happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureSummary {
    pub models: usize,
    /// Atoms in the first model, which is the one sampled from.
    pub atoms: usize,
    pub chains: Vec<String>,
    /// Candidate residues left after the name and depth filters.
    pub candidates: usize,
}

/// Where the outputs of a spin are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinOutputs {
    pub structure: PathBuf,
    pub charges: PathBuf,
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SpinResult {
    pub summary: StructureSummary,
    pub samples: Vec<Sample>,
}

/// Reduces the first model to one representative atom per enabled basic
/// residue, keeping only residues buried less than the depth threshold.
///
/// Models after the first are ignored.
pub fn collect_candidates(models: &[Model], selection: &SelectionConfig) -> Model {
    let Some(first) = models.first() else {
        return Model::new();
    };
    let first = std::slice::from_ref(first);
    let representatives = select(first, AtomField::Name, &[REPRESENTATIVE_ATOM]);
    let basic = select(
        &representatives,
        AtomField::ResidueName,
        &selection.residue_codes(),
    );
    basic
        .first()
        .map(|model| below_depth(model, selection.depth_threshold))
        .unwrap_or_default()
}

pub fn summarize(models: &[Model], candidates: &Model) -> StructureSummary {
    let chains = models
        .iter()
        .flat_map(|m| m.chain_ids())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    StructureSummary {
        models: models.len(),
        atoms: models.first().map_or(0, Model::len),
        chains,
        candidates: candidates.len(),
    }
}

/// The candidate pool of a structure, ready to be sampled.
#[derive(Debug, Clone)]
pub struct SpinCandidates {
    pub summary: StructureSummary,
    pub pool: Model,
}

/// Filters the parsed structure down to candidate residues.
#[instrument(skip_all, name = "spin_candidates")]
pub fn prepare(
    models: &[Model],
    selection: &SelectionConfig,
    reporter: &ProgressReporter,
) -> SpinCandidates {
    reporter.report(Progress::PhaseStart {
        name: "Selecting candidates",
    });
    if models.len() > 1 {
        let message = format!(
            "Structure has {} models; only the first one is sampled.",
            models.len()
        );
        warn!("{}", message);
        reporter.report(Progress::Message(message));
    }
    let pool = collect_candidates(models, selection);
    let summary = summarize(models, &pool);
    info!(
        models = summary.models,
        atoms = summary.atoms,
        chains = summary.chains.len(),
        candidates = summary.candidates,
        "Selected chargeable residues below {} A",
        selection.depth_threshold
    );
    reporter.report(Progress::PhaseFinish);

    SpinCandidates { summary, pool }
}

/// Draws the configured number of unique samples from a prepared pool.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientCandidates`] before any draw when the
/// pool is smaller than the sample size, and [`EngineError::Sampling`] when
/// patience runs out.
#[instrument(skip_all, name = "spin_sampling")]
pub fn sample(
    candidates: &SpinCandidates,
    sampling: &SamplingConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Sample>, EngineError> {
    let pool = &candidates.pool;
    if pool.len() < sampling.n_charges {
        return Err(EngineError::InsufficientCandidates {
            requested: sampling.n_charges,
            available: pool.len(),
        });
    }

    let mut rng = match sampling.seed {
        Some(seed) => {
            info!(seed, "Using a fixed random seed.");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    reporter.report(Progress::PhaseStart { name: "Sampling" });
    let samples = charge_sample_with_progress(
        pool.atoms(),
        sampling.n_charges,
        sampling.n_samples,
        sampling.patience,
        &mut rng,
        reporter,
    )?;
    reporter.report(Progress::PhaseFinish);
    info!("Drew {} unique samples.", samples.len());

    Ok(samples)
}

/// Filters the parsed structure down to candidate residues and draws the
/// configured number of unique samples from them.
///
/// # Errors
///
/// See [`sample`].
#[instrument(skip_all, name = "spin_workflow")]
pub fn run(
    models: &[Model],
    config: &RouletteConfig,
    reporter: &ProgressReporter,
) -> Result<SpinResult, EngineError> {
    let candidates = prepare(models, &config.selection, reporter);
    let samples = sample(&candidates, &config.sampling, reporter)?;
    Ok(SpinResult {
        summary: candidates.summary,
        samples,
    })
}

/// Writes the structure file, the charge summary and, when requested, the
/// human-readable report.
///
/// Every file is rendered to a temporary file first; the outputs are moved
/// into place only once all of them were rendered, and a failed move removes
/// the ones already in place.
///
/// # Errors
///
/// Returns an error if any file cannot be written. No output is left behind
/// in that case.
#[instrument(skip_all, name = "write_outputs")]
pub fn write_outputs(samples: &[Sample], outputs: &SpinOutputs) -> Result<(), EngineError> {
    let mut staged = vec![
        stage(&outputs.structure, |w| PdbFile::write_samples_to(samples, w))?,
        stage(&outputs.charges, |w| write_charges_to(samples, w))?,
    ];
    if let Some(report) = &outputs.report {
        staged.push(stage(report, |w| {
            write_charge_report_to(samples, &outputs.structure, w)
        })?);
    }
    persist_all(staged)?;

    info!("Structure samples written to {}", outputs.structure.display());
    info!("Charge summary written to {}", outputs.charges.display());
    if let Some(report) = &outputs.report {
        info!("Charge report written to {}", report.display());
    }
    Ok(())
}
