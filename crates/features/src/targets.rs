//! Multi-horizon target construction.
//!
//! Horizons are given in minutes and converted to a row shift using the
//! effective sampling interval of the dataset.

use crate::frame::FeatureFrame;
use forecast_core::{Error, Result, Timestamp};
use statrs::statistics::{Data, Median};
use tracing::debug;

/// Median gap between consecutive distinct timestamps, in whole minutes
/// (minimum 1). Falls back to `default_minutes` when fewer than two distinct
/// timestamps exist.
///
/// The median over the whole table is robust to occasional missed ticks.
pub fn effective_interval_minutes(timestamps: &[Timestamp], default_minutes: u32) -> u32 {
    let mut distinct: Vec<Timestamp> = timestamps.to_vec();
    distinct.sort();
    distinct.dedup();
    if distinct.len() < 2 {
        return default_minutes.max(1);
    }

    let gaps: Vec<f64> = distinct
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
        .collect();
    let median_seconds = Data::new(gaps).median();
    let minutes = (median_seconds / 60.0).round() as u32;
    minutes.max(1)
}

/// Row shift for a horizon: `round(horizon / interval)`, minimum 1.
///
/// Ties round away from zero, so a horizon landing exactly between two ticks
/// shifts to the later one.
#[inline]
pub fn shift_rows(horizon_min: u32, interval_minutes: u32) -> usize {
    let shift = (horizon_min as f64 / interval_minutes.max(1) as f64).round() as usize;
    shift.max(1)
}

/// Add one `y_{h}` column per horizon.
///
/// Within a point's time-ordered run, `y_h` at position i is the column value
/// at position i + shift_rows(h); undefined for the trailing rows of the run,
/// which have no future observation at that offset.
pub fn add_targets(
    frame: &mut FeatureFrame,
    col: &str,
    horizons_min: &[u32],
    interval_minutes: u32,
) -> Result<()> {
    frame.sort_by_point_time();
    let values = frame
        .column(col)
        .map(|v| v.to_vec())
        .ok_or_else(|| Error::config(format!("unknown column: {col}")))?;
    let runs = frame.entity_runs();

    for &h in horizons_min {
        let shift = shift_rows(h, interval_minutes);
        debug!(horizon_min = h, shift, "adding target column");
        let mut target: Vec<Option<f64>> = vec![None; values.len()];
        for &(start, end) in &runs {
            for i in start..end {
                if i + shift < end {
                    target[i] = values[i + shift];
                }
            }
        }
        frame.set_column(&format!("y_{h}"), target);
    }
    Ok(())
}

/// Drop rows with any undefined target column (complete-rows-only policy).
pub fn drop_incomplete_targets(frame: &mut FeatureFrame, horizons_min: &[u32]) {
    let n = frame.n_rows();
    let mut mask = vec![true; n];
    for &h in horizons_min {
        if let Some(values) = frame.column(&format!("y_{h}")) {
            for (i, v) in values.iter().enumerate() {
                if v.is_none() {
                    mask[i] = false;
                }
            }
        }
    }
    frame.retain_rows(&mask);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use forecast_core::{Observation, ObservationTable};

    fn obs(point_id: &str, tick: i64, congestion: f64) -> Observation {
        Observation {
            point_id: point_id.to_string(),
            timestamp_utc: Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
                + Duration::minutes(10 * tick),
            congestion_index: Some(congestion),
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
    fn test_shift_rows() {
        assert_eq!(shift_rows(30, 10), 3);
        assert_eq!(shift_rows(15, 10), 2); // round(1.5)
        assert_eq!(shift_rows(25, 10), 3); // ties go to the later tick
        assert_eq!(shift_rows(5, 10), 1); // minimum 1
    }

    #[test]
    fn test_effective_interval_median_gap() {
        let base = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
        // Duplicate timestamps across points collapse; one missed tick leaves
        // a 20-minute gap that the median ignores.
        let timestamps = vec![
            base,
            base,
            base + Duration::minutes(10),
            base + Duration::minutes(20),
            base + Duration::minutes(40),
            base + Duration::minutes(50),
        ];
        assert_eq!(effective_interval_minutes(&timestamps, 5), 10);
    }

    #[test]
    fn test_effective_interval_default() {
        let base = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
        assert_eq!(effective_interval_minutes(&[], 10), 10);
        assert_eq!(effective_interval_minutes(&[base, base], 7), 7);
    }

    #[test]
    fn test_targets_shift_within_entity() {
        let mut frame = frame_for(vec![
            obs("A", 0, 0.1),
            obs("A", 1, 0.2),
            obs("A", 2, 0.3),
            obs("A", 3, 0.4),
            obs("B", 0, 0.9),
            obs("B", 1, 0.8),
        ]);
        // interval 10 min, horizon 30 min -> shift 3 rows
        add_targets(&mut frame, "congestion_index", &[30], 10).unwrap();

        assert_eq!(
            frame.column("y_30").unwrap(),
            &[Some(0.4), None, None, None, None, None]
        );
    }

    #[test]
    fn test_drop_incomplete_targets() {
        let mut frame = frame_for(vec![
            obs("A", 0, 0.1),
            obs("A", 1, 0.2),
            obs("A", 2, 0.3),
        ]);
        add_targets(&mut frame, "congestion_index", &[10], 10).unwrap();
        drop_incomplete_targets(&mut frame, &[10]);

        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.column("y_10").unwrap(), &[Some(0.2), Some(0.3)]);
    }
}
