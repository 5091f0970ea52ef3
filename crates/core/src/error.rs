//! Error types for the traffic-forecast system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the traffic-forecast system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable raw rows at all; fatal to a dataset build.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Not enough rows for a split or a training run.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Inference requested for a point with zero history.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Model training or prediction error.
    #[error("Model error: {0}")]
    Model(String),

    /// Artifact persistence error.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data-unavailable error.
    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Error::DataUnavailable(msg.into())
    }

    /// Create an insufficient-data error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Error::InsufficientData(msg.into())
    }

    /// Create an entity-not-found error.
    pub fn entity_not_found(msg: impl Into<String>) -> Self {
        Error::EntityNotFound(msg.into())
    }

    /// Create a model error.
    pub fn model(msg: impl Into<String>) -> Self {
        Error::Model(msg.into())
    }

    /// Create an artifact error.
    pub fn artifact(msg: impl Into<String>) -> Self {
        Error::Artifact(msg.into())
    }
}
