use thiserror::Error;

/// Errors raised by the storage collaborators (tutors, slots, subjects)
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// Errors that abort a match request
///
/// A subject nobody teaches is reported through `MatchOutcome::NotFound`.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid date format: {input}. Expected DD-MM-YYYY")]
    InvalidDateFormat { input: String },

    #[error("Cyclic prerequisite chain detected at subject '{subject}'")]
    CyclicPrerequisite { subject: String },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors from the feedback text classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Classifier returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Errors while loading a weight configuration artifact
#[derive(Debug, Error)]
pub enum WeightsError {
    #[error("Failed to read weights file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON weights: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML weights: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to encode TOML weights: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Weight '{field}' must be a finite, non-negative number")]
    Negative { field: &'static str },

    #[error("Unsupported weights file format: {0}")]
    UnsupportedFormat(String),
}
