//! Error types for the rigor_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rigor_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),
}

/// A problem with a single input record.
///
/// These are reported next to a computed result rather than aborting it:
/// the offending record is left out of the aggregation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A logged set carried no exercise identifier
    #[error("logged set #{position} has no exercise id")]
    MissingExerciseId { position: usize },

    /// A planned exercise reused the id of an earlier planned exercise
    #[error("planned exercise #{position} repeats exercise id '{exercise_id}'")]
    DuplicatePlannedExercise { position: usize, exercise_id: String },
}
