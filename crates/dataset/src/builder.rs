//! Observation table construction.
//!
//! Merges per-point flow snapshots with tick-level disruption counters into
//! one rectangular table keyed by (point, timestamp). Contextual counters are
//! joined on timestamp only and apply identically to every point observed at
//! that tick; a tick without a contextual record keeps its rows with empty
//! contextual columns.

use chrono::{DateTime, NaiveDateTime, Utc};
use forecast_core::{
    congestion_index, DisruptionSnapshot, Error, FlowSnapshot, Observation, ObservationTable,
    Result, Timestamp,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Timestamp format written by the collector (`20240603T081000Z`).
const COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Parse a collector timestamp: RFC 3339 or the compact collector form.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, COMPACT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Index contextual snapshots by parsed timestamp, keeping the last record
/// per tick.
fn index_context(context: &[DisruptionSnapshot]) -> HashMap<Timestamp, &DisruptionSnapshot> {
    let mut by_ts = HashMap::new();
    for snapshot in context {
        match parse_timestamp(&snapshot.timestamp_utc) {
            Some(ts) => {
                by_ts.insert(ts, snapshot);
            }
            None => {
                warn!(raw = %snapshot.timestamp_utc, "dropping disruption snapshot with unparsable timestamp");
            }
        }
    }
    by_ts
}

/// Build the observation table from raw flow and contextual snapshots.
///
/// Rows with unparsable timestamps are dropped with a warning. Duplicate
/// (point, timestamp) keys keep the last record seen. Fails with
/// `DataUnavailable` when no usable row remains.
pub fn build_observation_table(
    flow: &[FlowSnapshot],
    context: &[DisruptionSnapshot],
) -> Result<ObservationTable> {
    let context_by_ts = index_context(context);

    let mut by_key: HashMap<(String, Timestamp), Observation> = HashMap::new();
    let mut dropped = 0usize;
    for snapshot in flow {
        let Some(ts) = parse_timestamp(&snapshot.timestamp_utc) else {
            dropped += 1;
            continue;
        };

        let ctx = context_by_ts.get(&ts);
        let row = Observation {
            point_id: snapshot.point_id.clone(),
            timestamp_utc: ts,
            congestion_index: snapshot
                .congestion_index
                .or_else(|| congestion_index(snapshot.current_speed, snapshot.free_flow_speed)),
            current_speed: snapshot.current_speed,
            free_flow_speed: snapshot.free_flow_speed,
            current_travel_time: snapshot.current_travel_time,
            free_flow_travel_time: snapshot.free_flow_travel_time,
            confidence: snapshot.confidence,
            road_closure: snapshot.road_closure.map(|c| if c { 1.0 } else { 0.0 }),
            disruptions_count: ctx.and_then(|c| c.disruptions_count).map(|n| n as f64),
            severe_disruptions_count: ctx
                .and_then(|c| c.severe_disruptions_count)
                .map(|n| n as f64),
            roads_seen: ctx.and_then(|c| c.roads_seen).map(|n| n as f64),
        };
        by_key.insert((row.point_id.clone(), ts), row);
    }

    if dropped > 0 {
        warn!(dropped, "dropped flow snapshots with unparsable timestamps");
    }
    if by_key.is_empty() {
        return Err(Error::data_unavailable(
            "no usable flow rows after timestamp parsing",
        ));
    }

    let table = ObservationTable::new(by_key.into_values().collect());
    info!(
        rows = table.len(),
        points = table.point_ids().len(),
        "built observation table"
    );
    Ok(table)
}

/// Load raw snapshots from the collector layout under `data_dir` and build
/// the observation table.
///
/// Expects `raw/flow/` (required) and `raw/disruptions/` (optional).
pub fn build_dataset(data_dir: &Path) -> Result<ObservationTable> {
    let flow = crate::loader::load_flow_snapshots(&data_dir.join("raw").join("flow"))?;
    let context = crate::loader::load_disruption_snapshots(&data_dir.join("raw").join("disruptions"));
    build_observation_table(&flow, &context)
}
