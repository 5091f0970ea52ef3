//! Raw snapshot ingestion for the traffic-forecast system.
//!
//! This crate handles:
//! - Discovering and parsing per-tick snapshot files
//! - Timestamp normalization and (point, timestamp) deduplication
//! - Joining contextual disruption counters onto flow observations

pub mod builder;
pub mod loader;

pub use builder::{build_dataset, build_observation_table, parse_timestamp};
pub use loader::{load_disruption_snapshots, load_flow_snapshots};
