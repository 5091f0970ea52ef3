//! Configuration structures for the traffic-forecast pipeline.
//!
//! Components take these values explicitly; there is no process-wide cached
//! settings object in this workspace.

use serde::{Deserialize, Serialize};

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Dataset build configuration.
    pub dataset: DatasetConfig,
    /// Feature/target construction configuration.
    pub features: FeatureConfig,
    /// Training configuration.
    pub train: TrainConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            features: FeatureConfig::default(),
            train: TrainConfig::default(),
        }
    }
}

/// Dataset build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Sampling interval assumed when the table has fewer than two timestamps.
    pub default_interval_minutes: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            default_interval_minutes: 10,
        }
    }
}

/// Feature and target construction configuration.
///
/// Lags and rolling windows are expressed in rows (ticks), not minutes;
/// horizons are expressed in minutes and converted to a row shift using the
/// effective sampling interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Forecast horizons in minutes.
    pub horizons_min: Vec<u32>,
    /// Lag offsets in rows.
    pub lags: Vec<usize>,
    /// Rolling window sizes in rows.
    pub rolling_windows: Vec<usize>,
    /// Drop rows with any undefined target column (complete-rows-only).
    pub drop_incomplete_targets: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            horizons_min: vec![15, 30],
            lags: vec![1, 2, 3],
            rolling_windows: vec![3, 6],
            drop_incomplete_targets: true,
        }
    }
}

/// Training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Horizons to train one model each for, in minutes.
    pub horizons_min: Vec<u32>,
    /// Fraction of rows (by time order) held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the regressor.
    pub seed: u64,
    /// Number of trees in the random forest.
    pub n_trees: usize,
    /// Maximum tree depth.
    pub max_depth: u16,
    /// Minimum samples per leaf.
    pub min_samples_leaf: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            horizons_min: vec![15, 30],
            test_fraction: 0.2,
            seed: 42,
            n_trees: 200,
            max_depth: 6,
            min_samples_leaf: 1,
        }
    }
}
