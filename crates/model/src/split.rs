//! Time-ordered train/test split.
//!
//! Never random: the table is sorted by timestamp and cut once, so the test
//! partition is strictly later than the train partition. Points are not
//! separated; both partitions may contain the same point at different time
//! ranges.

use forecast_core::{Error, Result};
use forecast_features::FeatureFrame;

/// Split a frame by time order.
///
/// The cut lands at `round(n · (1 − test_fraction))`, clamped to [1, n−1] so
/// both partitions are non-empty. Ties round up, favoring the train side.
/// Fails with `InsufficientData` for n < 2.
pub fn time_split(frame: &FeatureFrame, test_fraction: f64) -> Result<(FeatureFrame, FeatureFrame)> {
    let n = frame.n_rows();
    if n < 2 {
        return Err(Error::insufficient_data(format!(
            "need at least 2 rows to split, got {n}"
        )));
    }

    let mut sorted = frame.clone();
    sorted.sort_by_time();

    let cut = ((n as f64) * (1.0 - test_fraction)).round() as usize;
    let cut = cut.clamp(1, n - 1);
    Ok((sorted.slice(0..cut), sorted.slice(cut..n)))
}
