//! Calendar features.
//!
//! Derived from each row's own timestamp; no cross-row dependency.

use crate::frame::FeatureFrame;
use chrono::{Datelike, Timelike};

/// Add `hour`, `day_of_week` (Monday=0) and `is_weekend` columns.
pub fn add_calendar_features(frame: &mut FeatureFrame) {
    let mut hour = Vec::with_capacity(frame.n_rows());
    let mut day_of_week = Vec::with_capacity(frame.n_rows());
    let mut is_weekend = Vec::with_capacity(frame.n_rows());

    for ts in frame.timestamps() {
        let dow = ts.weekday().num_days_from_monday();
        hour.push(Some(ts.hour() as f64));
        day_of_week.push(Some(dow as f64));
        is_weekend.push(Some(if dow >= 5 { 1.0 } else { 0.0 }));
    }

    frame.set_column("hour", hour);
    frame.set_column("day_of_week", day_of_week);
    frame.set_column("is_weekend", is_weekend);
}
