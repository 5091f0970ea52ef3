//! Per-horizon training and evaluation.
//!
//! Trains one persistence baseline and one random-forest regressor per
//! horizon, evaluates both on the held-out time range, and writes one
//! artifact per horizon plus a machine-readable metrics report. A horizon
//! that cannot be trained is logged and left out of the report; it never
//! aborts the other horizons.

use crate::artifact::ModelArtifact;
use crate::metrics::{evaluate, ForecastMetrics};
use crate::split::time_split;
use forecast_core::{config::TrainConfig, Error, Result};
use forecast_features::{target_column, FeatureFrame, TARGET_COLUMN};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Evaluation result for one horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonReport {
    /// Persistence baseline scores on the test partition.
    pub baseline: ForecastMetrics,
    /// Learned model scores on the test partition.
    pub model: ForecastMetrics,
    /// Where the artifact was written.
    pub artifact_path: PathBuf,
    /// Rows used for fitting.
    pub n_train: usize,
    /// Rows used for evaluation.
    pub n_test: usize,
}

/// Metrics report keyed by horizon, the only surface of model quality.
///
/// A horizon whose training failed is absent from the map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    pub horizons: BTreeMap<u32, HorizonReport>,
}

impl TrainingReport {
    /// Write the report as JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}

/// One horizon's assembled design matrix: features, target, and the current
/// metric value used for the persistence baseline.
struct DesignMatrix {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
    current: Vec<f64>,
}

/// Assemble the dense matrix for one partition and one target column.
///
/// Rows without a defined target or current metric value are excluded. An
/// undefined feature value is filled with the row's own current metric value,
/// the same fallback the online assembler applies at inference time.
fn design_matrix(frame: &FeatureFrame, feature_columns: &[String], target: &str) -> DesignMatrix {
    let n = frame.n_rows();
    let target_values = frame.column(target);
    let metric_values = frame.column(TARGET_COLUMN);
    let columns: Vec<Option<&[Option<f64>]>> =
        feature_columns.iter().map(|name| frame.column(name)).collect();

    let mut out = DesignMatrix {
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
        current: Vec::with_capacity(n),
    };
    for i in 0..n {
        let Some(y) = target_values.and_then(|v| v[i]) else {
            continue;
        };
        let Some(current) = metric_values.and_then(|v| v[i]) else {
            continue;
        };
        let row: Vec<f64> = columns
            .iter()
            .map(|col| col.and_then(|v| v[i]).unwrap_or(current))
            .collect();
        out.x.push(row);
        out.y.push(y);
        out.current.push(current);
    }
    out
}

fn train_horizon(
    train: &FeatureFrame,
    test: &FeatureFrame,
    feature_columns: &[String],
    horizon_min: u32,
    cfg: &TrainConfig,
    out_dir: &Path,
) -> Result<HorizonReport> {
    let target = target_column(horizon_min);
    if train.column(&target).is_none() {
        return Err(Error::insufficient_data(format!(
            "no {target} column in the feature frame"
        )));
    }

    let train_matrix = design_matrix(train, feature_columns, &target);
    let test_matrix = design_matrix(test, feature_columns, &target);
    if train_matrix.y.is_empty() || test_matrix.y.is_empty() {
        return Err(Error::insufficient_data(format!(
            "horizon {horizon_min}: no complete rows (train {}, test {})",
            train_matrix.y.len(),
            test_matrix.y.len()
        )));
    }

    // Persistence baseline: yhat(t+h) = metric(t)
    let baseline = evaluate(&test_matrix.y, &test_matrix.current);

    let x_train = DenseMatrix::from_2d_vec(&train_matrix.x);
    let model = RandomForestRegressor::fit(
        &x_train,
        &train_matrix.y,
        RandomForestRegressorParameters::default()
            .with_n_trees(cfg.n_trees)
            .with_max_depth(cfg.max_depth)
            .with_min_samples_leaf(cfg.min_samples_leaf)
            .with_seed(cfg.seed),
    )
    .map_err(|e| Error::model(format!("training failed: {e}")))?;

    let x_test = DenseMatrix::from_2d_vec(&test_matrix.x);
    let y_pred = model
        .predict(&x_test)
        .map_err(|e| Error::model(format!("prediction failed: {e}")))?;
    let model_metrics = evaluate(&test_matrix.y, &y_pred);

    let artifact_path = out_dir.join(format!("rf_h{horizon_min}.json"));
    ModelArtifact::new(model, feature_columns.to_vec(), horizon_min).save(&artifact_path)?;

    Ok(HorizonReport {
        baseline,
        model: model_metrics,
        artifact_path,
        n_train: train_matrix.y.len(),
        n_test: test_matrix.y.len(),
    })
}

/// Train one baseline and one regressor per configured horizon.
///
/// The frame is split by time once; every horizon trains on the same
/// partitions. Artifacts land in `out_dir`, one per horizon.
pub fn train_models(
    frame: &FeatureFrame,
    feature_columns: &[String],
    cfg: &TrainConfig,
    out_dir: &Path,
) -> Result<TrainingReport> {
    let (train, test) = time_split(frame, cfg.test_fraction)?;
    info!(
        n_train = train.n_rows(),
        n_test = test.n_rows(),
        features = feature_columns.len(),
        "training models"
    );

    let mut report = TrainingReport::default();
    for &horizon_min in &cfg.horizons_min {
        match train_horizon(&train, &test, feature_columns, horizon_min, cfg, out_dir) {
            Ok(horizon_report) => {
                info!(
                    horizon_min,
                    baseline_mae = horizon_report.baseline.mae,
                    model_mae = horizon_report.model.mae,
                    "trained horizon"
                );
                report.horizons.insert(horizon_min, horizon_report);
            }
            Err(err) => {
                warn!(horizon_min, %err, "skipping horizon");
            }
        }
    }
    Ok(report)
}
