use super::progress::{Progress, ProgressReporter};
use crate::core::models::atom::AtomRecord;
use crate::core::models::sample::Sample;
use rand::prelude::*;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplingError {
    #[error(
        "Patience of {patience} draws reached without generating a unique sample ({accepted} of {requested} samples found after {draws} draws). Increase patience or decrease the number of samples"
    )]
    Exhausted {
        accepted: usize,
        requested: usize,
        patience: usize,
        /// Every draw made, accepted or not.
        draws: usize,
    },
}

/// Draws `n_samples` mutually distinct samples of `n_charges` residues each.
///
/// See [`charge_sample_with_progress`].
///
/// # Errors
///
/// Returns [`SamplingError::Exhausted`] after `patience` consecutive
/// duplicate draws.
pub fn charge_sample(
    candidates: &[AtomRecord],
    n_charges: usize,
    n_samples: usize,
    patience: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Sample>, SamplingError> {
    charge_sample_with_progress(
        candidates,
        n_charges,
        n_samples,
        patience,
        rng,
        &ProgressReporter::new(),
    )
}

/// Draws `n_samples` mutually distinct samples of `n_charges` residues each,
/// reporting one progress step per accepted sample.
///
/// Every draw picks `n_charges` candidates uniformly without replacement and
/// is compared against all samples accepted so far. A new sample resets the
/// failure counter; a duplicate increments it. Sampling stops once
/// `n_samples` samples are accepted, or fails once `patience` duplicates have
/// been drawn in a row, which happens when fewer than `n_samples` distinct
/// combinations exist (or are likely to be found).
///
/// The caller must ensure `candidates.len() >= n_charges`.
///
/// # Errors
///
/// Returns [`SamplingError::Exhausted`] after `patience` consecutive
/// duplicate draws. Accepted samples are discarded in that case.
#[instrument(level = "debug", skip(candidates, rng, reporter), fields(pool = candidates.len()))]
pub fn charge_sample_with_progress(
    candidates: &[AtomRecord],
    n_charges: usize,
    n_samples: usize,
    patience: usize,
    rng: &mut impl Rng,
    reporter: &ProgressReporter,
) -> Result<Vec<Sample>, SamplingError> {
    debug_assert!(
        candidates.len() >= n_charges,
        "candidate pool is smaller than the sample size"
    );

    let mut accepted: Vec<Sample> = Vec::with_capacity(n_samples);
    let mut failures = 0;
    let mut draws = 0usize;

    reporter.report(Progress::TaskStart {
        total_steps: n_samples as u64,
    });

    while accepted.len() < n_samples {
        draws += 1;
        let sample = Sample::new(
            candidates
                .choose_multiple(&mut *rng, n_charges)
                .cloned()
                .collect(),
        );

        if accepted.contains(&sample) {
            failures += 1;
            trace!(failures, "Rejected duplicate sample");
            if failures >= patience {
                warn!(
                    accepted = accepted.len(),
                    draws, "Patience exhausted before all samples were found"
                );
                return Err(SamplingError::Exhausted {
                    accepted: accepted.len(),
                    requested: n_samples,
                    patience,
                    draws,
                });
            }
        } else {
            accepted.push(sample);
            failures = 0;
            reporter.report(Progress::TaskIncrement);
        }
    }

    reporter.report(Progress::TaskFinish);
    debug!(draws, "Collected {} unique samples", accepted.len());
    Ok(accepted)
}
