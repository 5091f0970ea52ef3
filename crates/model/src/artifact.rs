//! Persisted model artifacts.
//!
//! One artifact per horizon: the fitted estimator, the exact ordered feature
//! column list it was trained with, and the horizon. Artifacts are immutable
//! once written; retraining writes a replacement, never an edit.

use forecast_core::{Error, Result};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs;
use std::path::Path;

/// Current artifact schema version.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// The learned regressor type.
pub type Regressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// A trained model together with everything inference needs to rebuild its
/// input row.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact layout version; bumped on incompatible changes.
    pub schema_version: u32,
    /// Forecast horizon this model targets, in minutes.
    pub horizon_min: u32,
    /// Feature columns, in the exact order used for training.
    pub feature_columns: Vec<String>,
    /// Fitted estimator.
    pub model: Regressor,
}

impl ModelArtifact {
    /// Wrap a fitted model with its feature schema and horizon.
    pub fn new(model: Regressor, feature_columns: Vec<String>, horizon_min: u32) -> Self {
        Self {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            horizon_min,
            feature_columns,
            model,
        }
    }

    /// Write the artifact as JSON, atomically (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        let body = serde_json::to_vec(self)?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Load an artifact, rejecting unknown schema versions.
    pub fn load(path: &Path) -> Result<Self> {
        let body = fs::read(path)?;
        let artifact: ModelArtifact = serde_json::from_slice(&body)?;
        if artifact.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(Error::artifact(format!(
                "unsupported artifact schema version {} in {}",
                artifact.schema_version,
                path.display()
            )));
        }
        Ok(artifact)
    }

    /// Predict from one assembled feature row.
    ///
    /// The row must follow `feature_columns` order.
    pub fn predict_row(&self, features: &[f64]) -> Result<f64> {
        let x = DenseMatrix::from_2d_vec(&vec![features.to_vec()]);
        let predictions = self
            .model
            .predict(&x)
            .map_err(|e| Error::model(format!("prediction failed: {e}")))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| Error::model("empty prediction"))
    }
}
