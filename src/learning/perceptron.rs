use super::vectors::{self, Vector};
use crate::alignment::search::AlignError;
use crate::alignment::{Alignment, GoldStandard, Problem};
use crate::features::{AuxiliaryData, Feature, ScoringContext};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum LearnError {
    #[error("burn-in of {burn_in} epochs leaves nothing to average out of {epochs}")]
    BurnInTooLong { burn_in: usize, epochs: usize },
    #[error("no training examples")]
    EmptyTrainingSet,
    #[error(transparent)]
    Align(#[from] AlignError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LearnParams {
    pub epochs: usize,
    /// Leading epochs left out of the average.
    pub burn_in: usize,
    pub initial_rate: f64,
    /// Multiplies the learning rate at the start of every epoch.
    pub decay: f64,
    /// Seed of the per-epoch shuffle.
    pub seed: u64,
}

impl Default for LearnParams {
    fn default() -> LearnParams {
        LearnParams {
            epochs: 50,
            burn_in: 10,
            initial_rate: 1.0,
            decay: 0.8,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrainingOutcome {
    /// Mean of the epoch weights after burn-in.
    pub weights: Vector,
    /// Normalized weights at the end of each epoch.
    pub epoch_weights: Vec<Vector>,
}

/// Φ: every feature summed over the edits of the alignment.
pub fn phi(alignment: &Alignment, features: &[Feature], ctx: &ScoringContext) -> Vector {
    features
        .iter()
        .map(|&feature| alignment.edits().map(|edit| ctx.value(feature, edit)).sum())
        .collect()
}

/// Averaged structured perceptron. `predict` aligns a problem under the current weights; each
/// example moves the weights by `rate * (Φ(gold) - Φ(prediction))`.
pub fn learn<F>(
    training: &[GoldStandard],
    params: &LearnParams,
    features: &[Feature],
    data: &AuxiliaryData,
    mut predict: F,
) -> Result<TrainingOutcome, LearnError>
where
    F: FnMut(&Problem, &[f64], &ScoringContext) -> Result<Alignment, AlignError>,
{
    if params.burn_in >= params.epochs {
        return Err(LearnError::BurnInTooLong {
            burn_in: params.burn_in,
            epochs: params.epochs,
        });
    }
    if training.is_empty() {
        return Err(LearnError::EmptyTrainingSet);
    }

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(params.seed);
    let mut order: Vec<usize> = (0..training.len()).collect();
    let mut weights: Vector = vec![1.0; features.len()];
    let mut epoch_weights = Vec::with_capacity(params.epochs);
    let mut rate = params.initial_rate;
    let start = Instant::now();

    for epoch in 0..params.epochs {
        let epoch_start = Instant::now();
        rate *= params.decay;
        order.shuffle(&mut rng);
        for (position, &index) in order.iter().enumerate() {
            let example = &training[index];
            let ctx = ScoringContext::new(data);
            let predicted = predict(&example.problem, &weights, &ctx)?;
            let update = vectors::diff(
                &phi(&example.alignment, features, &ctx),
                &phi(&predicted, features, &ctx),
            );
            weights = vectors::sum(&weights, &vectors::scale(&update, rate));
            debug!(epoch = epoch + 1, example = position + 1, id = %example.id, "trained on example");
        }
        weights = vectors::normalize(&weights, vectors::norm2);
        info!(
            epoch = epoch + 1,
            of = params.epochs,
            rate,
            elapsed = ?epoch_start.elapsed(),
            "epoch finished: {weights:?}"
        );
        epoch_weights.push(weights.clone());
    }
    info!(elapsed = ?start.elapsed(), "training finished");

    Ok(TrainingOutcome {
        weights: vectors::avg(&epoch_weights[params.burn_in..]),
        epoch_weights,
    })
}
