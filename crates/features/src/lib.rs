//! Feature and target construction for the traffic-forecast system.
//!
//! This crate handles:
//! - The columnar feature frame and its (point, time) ordering
//! - Calendar features
//! - Grouped lag and rolling-window features
//! - Multi-horizon target shifting and the effective sampling interval

pub mod calendar;
pub mod frame;
pub mod pipeline;
pub mod targets;
pub mod temporal;

pub use calendar::add_calendar_features;
pub use frame::{Column, FeatureFrame};
pub use pipeline::{feature_columns, make_feature_frame, target_column, TARGET_COLUMN};
pub use targets::{add_targets, drop_incomplete_targets, effective_interval_minutes, shift_rows};
pub use temporal::{add_lag_features, add_rolling_features};
