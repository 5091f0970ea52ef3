//! Training, evaluation and online inference for the traffic-forecast system.
//!
//! This crate provides:
//! - The leakage-safe time-ordered train/test split
//! - Per-horizon training with a persistence baseline
//! - MAE/RMSE evaluation and the machine-readable metrics report
//! - Versioned model artifacts and single-row online prediction

pub mod artifact;
pub mod inference;
pub mod metrics;
pub mod split;
pub mod trainer;

pub use artifact::{ModelArtifact, Regressor, ARTIFACT_SCHEMA_VERSION};
pub use inference::{latest_features_for_point, predict_for_point, PointForecast};
pub use metrics::{evaluate, ForecastMetrics};
pub use split::time_split;
pub use trainer::{train_models, HorizonReport, TrainingReport};
