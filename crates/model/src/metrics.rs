//! Forecast error metrics.

use serde::{Deserialize, Serialize};

/// Error metrics for one forecaster on one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
}

/// Compute MAE and RMSE over paired true/predicted values.
///
/// Callers guarantee non-empty, equal-length slices; the trainer never
/// evaluates an empty partition.
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> ForecastMetrics {
    debug_assert_eq!(y_true.len(), y_pred.len());
    debug_assert!(!y_true.is_empty());

    let n = y_true.len() as f64;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    for (t, p) in y_true.iter().zip(y_pred) {
        let err = t - p;
        abs_sum += err.abs();
        sq_sum += err * err;
    }
    ForecastMetrics {
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
    }
}
