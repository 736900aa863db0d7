//! Offline fitting of scoring weights from observed rewards.
//!
//! Each training example pairs a factor vector (as produced by
//! [`FactorBreakdown`](crate::core::scoring::FactorBreakdown)) with an observed
//! reward, for example a normalized session rating. Weights are fitted with a
//! least-mean-squares update and exported as a [`WeightConfig`] artifact.

use serde::{Deserialize, Serialize};
use crate::models::WeightConfig;

/// Learning rate used when none is configured
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// Passes over the training set used when none is configured
pub const DEFAULT_EPOCHS: usize = 1000;

/// One observation: factor vector in weight order and its reward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: [f64; 5],
    pub reward: f64,
}

/// Hyperparameters for [`fit_weights`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    pub learning_rate: f64,
    pub epochs: usize,
    pub initial: WeightConfig,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
            initial: WeightConfig::default(),
        }
    }
}

/// Predicted reward: dot product of features and weights
#[inline]
pub fn predict_reward(features: &[f64; 5], weights: &[f64; 5]) -> f64 {
    features.iter().zip(weights).map(|(f, w)| f * w).sum()
}

/// Fit weights to the examples
///
/// Per example: `w += learning_rate * (reward - predicted) * features`.
/// Negative fitted weights are clamped to 0 so the result is a valid
/// weight configuration.
pub fn fit_weights(examples: &[TrainingExample], options: &TrainingOptions) -> WeightConfig {
    let mut weights = options.initial.as_array();

    for _ in 0..options.epochs {
        for example in examples {
            let error = example.reward - predict_reward(&example.features, &weights);
            for (w, f) in weights.iter_mut().zip(example.features.iter()) {
                *w += options.learning_rate * error * f;
            }
        }
    }

    tracing::info!("Fitted weights over {} examples: {:?}", examples.len(), weights);

    let [rating, availability, price, language, learning_style] = weights.map(|w| w.max(0.0));
    WeightConfig {
        rating,
        availability,
        price,
        language,
        learning_style,
    }
}

/// Mean squared error of `weights` over the examples
pub fn mean_squared_error(examples: &[TrainingExample], weights: &WeightConfig) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }

    let weights = weights.as_array();
    let total: f64 = examples
        .iter()
        .map(|example| (example.reward - predict_reward(&example.features, &weights)).powi(2))
        .sum();
    total / examples.len() as f64
}
