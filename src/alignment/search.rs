use super::greek::Aligner;
use super::{Alignment, Problem};
use crate::features::{Feature, ScoringContext};
use float_ord::FloatOrd;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum AlignError {
    #[error("{features} features but {weights} weights")]
    LengthMismatch { features: usize, weights: usize },
    #[error("search did not terminate within {0} steps")]
    StepLimit(usize),
}

/// Greedy hill climbing: repeatedly moves to the best-scoring candidate proposed by `aligner`
/// until it proposes none. Exact ties go to the earliest candidate.
///
/// Every step merges at least one `Del` and one `Ins` into a single edit, so the number of steps
/// is bounded by the size of the starting alignment; exceeding it means the aligner is broken.
pub fn align(
    initial: Alignment,
    aligner: &dyn Aligner,
    features: &[Feature],
    weights: &[f64],
    max_group: usize,
    ctx: &ScoringContext,
) -> Result<Alignment, AlignError> {
    if features.len() != weights.len() {
        return Err(AlignError::LengthMismatch {
            features: features.len(),
            weights: weights.len(),
        });
    }

    let step_limit = initial.len();
    let mut current = initial;
    for step in 0..=step_limit {
        let mut candidates = aligner.next(&current, max_group).into_iter();
        let Some(first) = candidates.next() else {
            debug!(steps = step, edits = current.len(), "alignment complete");
            return Ok(current);
        };

        let mut best_score = FloatOrd(first.score(features, weights, ctx));
        let mut best = first;
        let mut candidate_count = 1;
        for candidate in candidates {
            candidate_count += 1;
            let score = FloatOrd(candidate.score(features, weights, ctx));
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        debug!(step, candidates = candidate_count, score = best_score.0, "greedy step");
        current = best;
    }
    Err(AlignError::StepLimit(step_limit))
}

pub fn align_problem(
    problem: &Problem,
    aligner: &dyn Aligner,
    features: &[Feature],
    weights: &[f64],
    max_group: usize,
    ctx: &ScoringContext,
) -> Result<Alignment, AlignError> {
    align(
        Alignment::from_word_bags(&problem.from, &problem.to),
        aligner,
        features,
        weights,
        max_group,
        ctx,
    )
}
