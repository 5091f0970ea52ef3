//! Feature frame assembly.
//!
//! Wires the calendar, lag, rolling and target passes together in the order
//! the downstream trainer expects.

use crate::calendar::add_calendar_features;
use crate::frame::FeatureFrame;
use crate::targets::{add_targets, drop_incomplete_targets};
use crate::temporal::{add_lag_features, add_rolling_features};
use forecast_core::{config::FeatureConfig, ObservationTable, Result};
use tracing::info;

/// Column the forecasters are trained against.
pub const TARGET_COLUMN: &str = "congestion_index";

/// Name of the target column for a horizon.
#[inline]
pub fn target_column(horizon_min: u32) -> String {
    format!("y_{horizon_min}")
}

/// Build the modeling table from observations.
///
/// Deterministic for a given (table, config, interval): rebuilding from the
/// same inputs yields an identical frame. The frame is left sorted by
/// (point, time).
pub fn make_feature_frame(
    table: &ObservationTable,
    cfg: &FeatureConfig,
    interval_minutes: u32,
) -> Result<FeatureFrame> {
    let mut frame = FeatureFrame::from_observations(table);
    frame.sort_by_point_time();

    add_calendar_features(&mut frame);
    add_lag_features(&mut frame, TARGET_COLUMN, &cfg.lags)?;
    add_rolling_features(&mut frame, TARGET_COLUMN, &cfg.rolling_windows)?;
    add_targets(&mut frame, TARGET_COLUMN, &cfg.horizons_min, interval_minutes)?;

    if cfg.drop_incomplete_targets {
        drop_incomplete_targets(&mut frame, &cfg.horizons_min);
    }

    info!(
        rows = frame.n_rows(),
        columns = frame.column_names().len(),
        interval_minutes,
        "built feature frame"
    );
    Ok(frame)
}

/// Feature columns of a frame: every column except the targets.
///
/// The (point, timestamp) keys are structural and never appear as columns.
/// Order follows the frame's column order and is the order models are trained
/// and queried with.
pub fn feature_columns(frame: &FeatureFrame, horizons_min: &[u32]) -> Vec<String> {
    let targets: Vec<String> = horizons_min.iter().map(|&h| target_column(h)).collect();
    frame
        .column_names()
        .into_iter()
        .filter(|name| !targets.iter().any(|t| t == name))
        .map(|name| name.to_string())
        .collect()
}
