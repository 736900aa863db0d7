//! Fit scoring weights from a JSON training set and write the artifact.
//!
//! Usage: `fit-weights <examples.json> <weights.json|weights.toml> [epochs] [learning_rate]`
//!
//! The training set is a JSON array of `{"features": [..5 factors..], "reward": r}`.

use tracing::info;
use tracing_subscriber::EnvFilter;

use tutoreal_match::config::export_weight_artifact;
use tutoreal_match::core::training::mean_squared_error;
use tutoreal_match::core::{fit_weights, TrainingExample, TrainingOptions};

fn usage_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message)
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match (args.first(), args.get(1)) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            return Err(usage_error(
                "usage: fit-weights <examples.json> <weights.json|weights.toml> [epochs] [learning_rate]"
                    .to_string(),
            ))
        }
    };

    let mut options = TrainingOptions::default();
    if let Some(epochs) = args.get(2) {
        options.epochs = epochs
            .parse()
            .map_err(|e| usage_error(format!("Invalid epochs '{}': {}", epochs, e)))?;
    }
    if let Some(rate) = args.get(3) {
        options.learning_rate = rate
            .parse()
            .map_err(|e| usage_error(format!("Invalid learning rate '{}': {}", rate, e)))?;
    }

    let raw = std::fs::read_to_string(input)?;
    let examples: Vec<TrainingExample> = serde_json::from_str(&raw)
        .map_err(|e| usage_error(format!("Invalid training set {}: {}", input, e)))?;

    let weights = fit_weights(&examples, &options);
    info!(
        "Training MSE {:.6} over {} examples",
        mean_squared_error(&examples, &weights),
        examples.len()
    );

    export_weight_artifact(&weights, output)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
}
