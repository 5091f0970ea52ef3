//! Online single-row inference.
//!
//! Rebuilds the feature row for one point's most recent observation using the
//! feature-column list stored in the artifact. Calendar features are
//! recomputed from the row's timestamp; lag and rolling history is not
//! recomputed online. Any required column the single-row frame cannot provide
//! is filled with the row's own current metric value, so prediction never
//! fails on thin history or schema drift, at a documented accuracy cost.

use crate::artifact::ModelArtifact;
use forecast_core::{Error, ObservationTable, Result};
use forecast_features::{add_calendar_features, FeatureFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One prediction for one point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointForecast {
    /// Point the forecast is for.
    pub point_id: String,
    /// Forecast lead time in minutes.
    pub horizon_min: u32,
    /// Predicted congestion index.
    pub prediction: f64,
}

/// Assemble the feature row for a point's most recent observation.
///
/// Values follow `feature_columns` order exactly. Fails with `EntityNotFound`
/// when the table has no row for the point.
pub fn latest_features_for_point(
    table: &ObservationTable,
    point_id: &str,
    feature_columns: &[String],
) -> Result<Vec<f64>> {
    let row = table
        .latest_for_point(point_id)
        .ok_or_else(|| Error::entity_not_found(format!("no observations for point {point_id}")))?;

    // Rebuild the single-row frame with the same passes training used, so the
    // base and calendar columns resolve identically.
    let single = ObservationTable::new(vec![row.clone()]);
    let mut frame = FeatureFrame::from_observations(&single);
    add_calendar_features(&mut frame);

    let fallback = row.congestion_index.unwrap_or(0.0);
    let mut filled = 0usize;
    let features = feature_columns
        .iter()
        .map(|name| match frame.column(name).and_then(|v| v[0]) {
            Some(value) => value,
            None => {
                filled += 1;
                fallback
            }
        })
        .collect();
    if filled > 0 {
        debug!(
            point_id,
            filled, fallback, "filled unavailable feature columns with the current metric value"
        );
    }
    Ok(features)
}

/// Predict a point's congestion at the artifact's horizon from its most
/// recent observation.
pub fn predict_for_point(
    artifact: &ModelArtifact,
    table: &ObservationTable,
    point_id: &str,
) -> Result<PointForecast> {
    let features = latest_features_for_point(table, point_id, &artifact.feature_columns)?;
    let prediction = artifact.predict_row(&features)?;
    Ok(PointForecast {
        point_id: point_id.to_string(),
        horizon_min: artifact.horizon_min,
        prediction,
    })
}
