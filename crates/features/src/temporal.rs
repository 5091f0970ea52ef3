//! Grouped lag and rolling-window features.
//!
//! Both transforms sort the frame by (point, time) before computing anything;
//! they are undefined on arrival order. All offsets are in rows, not minutes.

use crate::frame::FeatureFrame;
use forecast_core::{Error, Result};
use statrs::statistics::Statistics;

fn require_column(frame: &FeatureFrame, col: &str) -> Result<Vec<Option<f64>>> {
    frame
        .column(col)
        .map(|v| v.to_vec())
        .ok_or_else(|| Error::config(format!("unknown column: {col}")))
}

/// Add `{col}_lag_{k}` columns for each lag offset.
///
/// Within a point's time-ordered run, the lag-k value at position i is the
/// column value at position i−k; undefined for i<k.
pub fn add_lag_features(frame: &mut FeatureFrame, col: &str, lags: &[usize]) -> Result<()> {
    frame.sort_by_point_time();
    let values = require_column(frame, col)?;
    let runs = frame.entity_runs();

    for &k in lags {
        let mut lagged: Vec<Option<f64>> = vec![None; values.len()];
        for &(start, end) in &runs {
            for i in start..end {
                if i - start >= k {
                    lagged[i] = values[i - k];
                }
            }
        }
        frame.set_column(&format!("{col}_lag_{k}"), lagged);
    }
    Ok(())
}

/// Add `{col}_roll_mean_{w}` and `{col}_roll_std_{w}` columns for each window.
///
/// The window covers the w rows strictly preceding the current row within the
/// point's run; the current row is never included, so the value being
/// predicted cannot leak into its own recent-history feature. The mean is
/// defined from one present value, the sample standard deviation needs two.
pub fn add_rolling_features(frame: &mut FeatureFrame, col: &str, windows: &[usize]) -> Result<()> {
    frame.sort_by_point_time();
    let values = require_column(frame, col)?;
    let runs = frame.entity_runs();

    for &w in windows {
        let mut mean_col: Vec<Option<f64>> = vec![None; values.len()];
        let mut std_col: Vec<Option<f64>> = vec![None; values.len()];
        for &(start, end) in &runs {
            for i in start..end {
                let lo = i.saturating_sub(w).max(start);
                let window: Vec<f64> = values[lo..i].iter().filter_map(|v| *v).collect();
                if !window.is_empty() {
                    mean_col[i] = Some((&window).mean());
                }
                if window.len() >= 2 {
                    std_col[i] = Some((&window).std_dev());
                }
            }
        }
        frame.set_column(&format!("{col}_roll_mean_{w}"), mean_col);
        frame.set_column(&format!("{col}_roll_std_{w}"), std_col);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use forecast_core::{Observation, ObservationTable};

    fn obs(point_id: &str, tick: u32, congestion: Option<f64>) -> Observation {
        Observation {
            point_id: point_id.to_string(),
            timestamp_utc: Utc
                .with_ymd_and_hms(2024, 6, 3, 8 + tick / 6, (tick % 6) * 10, 0)
                .unwrap(),
            congestion_index: congestion,
            current_speed: None,
            free_flow_speed: None,
            current_travel_time: None,
            free_flow_travel_time: None,
            confidence: None,
            road_closure: None,
            disruptions_count: None,
            severe_disruptions_count: None,
            roads_seen: None,
        }
    }

    fn frame_for(rows: Vec<Observation>) -> FeatureFrame {
        FeatureFrame::from_observations(&ObservationTable::new(rows))
    }

    #[test]
    fn test_lag_within_entity_history() {
        let mut frame = frame_for(vec![
            obs("A", 0, Some(0.1)),
            obs("A", 1, Some(0.2)),
            obs("A", 2, Some(0.3)),
            obs("B", 0, Some(0.9)),
            obs("B", 1, Some(0.8)),
        ]);
        add_lag_features(&mut frame, "congestion_index", &[1, 2]).unwrap();

        assert_eq!(
            frame.column("congestion_index_lag_1").unwrap(),
            &[None, Some(0.1), Some(0.2), None, Some(0.9)]
        );
        assert_eq!(
            frame.column("congestion_index_lag_2").unwrap(),
            &[None, None, Some(0.1), None, None]
        );
    }

    #[test]
    fn test_lag_ignores_arrival_order() {
        // Rows arrive shuffled; lags must follow time order within the point.
        let mut frame = frame_for(vec![
            obs("A", 2, Some(0.3)),
            obs("A", 0, Some(0.1)),
            obs("A", 1, Some(0.2)),
        ]);
        add_lag_features(&mut frame, "congestion_index", &[1]).unwrap();

        assert_eq!(
            frame.column("congestion_index_lag_1").unwrap(),
            &[None, Some(0.1), Some(0.2)]
        );
    }

    #[test]
    fn test_rolling_excludes_current_row() {
        let mut frame = frame_for(vec![
            obs("A", 0, Some(0.1)),
            obs("A", 1, Some(0.2)),
            obs("A", 2, Some(0.3)),
            obs("A", 3, Some(0.4)),
        ]);
        add_rolling_features(&mut frame, "congestion_index", &[2]).unwrap();

        let mean = frame.column("congestion_index_roll_mean_2").unwrap();
        assert_eq!(mean[0], None);
        assert_relative_eq!(mean[1].unwrap(), 0.1);
        assert_relative_eq!(mean[2].unwrap(), 0.15);
        // Window [0.2, 0.3], current 0.4 not included
        assert_relative_eq!(mean[3].unwrap(), 0.25);
    }

    #[test]
    fn test_rolling_std_needs_two_values() {
        let mut frame = frame_for(vec![
            obs("A", 0, Some(0.1)),
            obs("A", 1, Some(0.3)),
            obs("A", 2, Some(0.5)),
        ]);
        add_rolling_features(&mut frame, "congestion_index", &[1, 2]).unwrap();

        // Window of one row: defined mean, undefined std
        let std_1 = frame.column("congestion_index_roll_std_1").unwrap();
        assert_eq!(std_1, &[None, None, None]);
        let mean_1 = frame.column("congestion_index_roll_mean_1").unwrap();
        assert_relative_eq!(mean_1[2].unwrap(), 0.3);

        // Sample std of [0.1, 0.3]
        let std_2 = frame.column("congestion_index_roll_std_2").unwrap();
        assert_relative_eq!(std_2[2].unwrap(), 0.1414213562, epsilon = 1e-6);
    }

    #[test]
    fn test_rolling_skips_missing_values() {
        let mut frame = frame_for(vec![
            obs("A", 0, Some(0.2)),
            obs("A", 1, None),
            obs("A", 2, Some(0.4)),
        ]);
        add_rolling_features(&mut frame, "congestion_index", &[2]).unwrap();

        let mean = frame.column("congestion_index_roll_mean_2").unwrap();
        // Window [0.2, None] keeps the present value only
        assert_relative_eq!(mean[2].unwrap(), 0.2);
    }

    #[test]
    fn test_unknown_column_is_config_error() {
        let mut frame = frame_for(vec![obs("A", 0, Some(0.1))]);
        assert!(add_lag_features(&mut frame, "nope", &[1]).is_err());
    }
}
