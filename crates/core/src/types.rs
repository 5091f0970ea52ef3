//! Core data types for the traffic-forecast system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timezone-aware UTC instant used throughout the pipeline.
pub type Timestamp = DateTime<Utc>;

/// Compute the congestion index from current and free-flow speed.
///
/// `1 - current/free_flow`, clipped to [0, 1]. `None` when either speed is
/// missing or the free-flow speed is zero.
pub fn congestion_index(current_speed: Option<f64>, free_flow_speed: Option<f64>) -> Option<f64> {
    match (current_speed, free_flow_speed) {
        (Some(current), Some(free_flow)) if free_flow > 0.0 => {
            Some((1.0 - current / free_flow).clamp(0.0, 1.0))
        }
        _ => None,
    }
}

/// One raw flow measurement for a single point at a single tick.
///
/// The timestamp is kept as the collector wrote it; parsing happens when the
/// observation table is built so that a bad timestamp drops one row instead of
/// failing a whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSnapshot {
    /// Stable point identifier.
    pub point_id: String,
    /// Tick timestamp as written by the collector.
    pub timestamp_utc: String,
    /// Point latitude.
    pub latitude: f64,
    /// Point longitude.
    pub longitude: f64,
    /// Measured speed (km/h).
    pub current_speed: Option<f64>,
    /// Free-flow speed (km/h).
    pub free_flow_speed: Option<f64>,
    /// Measured travel time over the segment (s).
    pub current_travel_time: Option<f64>,
    /// Free-flow travel time over the segment (s).
    pub free_flow_travel_time: Option<f64>,
    /// Provider confidence in the measurement.
    pub confidence: Option<f64>,
    /// Whether the road was reported closed.
    pub road_closure: Option<bool>,
    /// Congestion index in [0, 1], if computed upstream.
    pub congestion_index: Option<f64>,
}

/// One raw disruption summary for a single tick.
///
/// Contextual records are keyed by timestamp only; they are not per-point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisruptionSnapshot {
    /// Tick timestamp as written by the collector.
    pub timestamp_utc: String,
    /// Total disruptions observed across sampled roads.
    pub disruptions_count: Option<i64>,
    /// Disruptions with serious/severe/critical severity.
    pub severe_disruptions_count: Option<i64>,
    /// Number of roads visible in the listing.
    pub roads_seen: Option<i64>,
}

/// One parsed row of the observation table, keyed by (point, timestamp).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Stable point identifier.
    pub point_id: String,
    /// Parsed UTC timestamp of the tick.
    pub timestamp_utc: Timestamp,
    /// Congestion index in [0, 1].
    pub congestion_index: Option<f64>,
    /// Measured speed (km/h).
    pub current_speed: Option<f64>,
    /// Free-flow speed (km/h).
    pub free_flow_speed: Option<f64>,
    /// Measured travel time (s).
    pub current_travel_time: Option<f64>,
    /// Free-flow travel time (s).
    pub free_flow_travel_time: Option<f64>,
    /// Provider confidence.
    pub confidence: Option<f64>,
    /// Road closure flag as 0/1.
    pub road_closure: Option<f64>,
    /// Disruption count joined from the contextual source.
    pub disruptions_count: Option<f64>,
    /// Severe disruption count joined from the contextual source.
    pub severe_disruptions_count: Option<f64>,
    /// Roads-seen count joined from the contextual source.
    pub roads_seen: Option<f64>,
}

/// Rectangular table of observations, sorted by (point, timestamp) ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationTable {
    rows: Vec<Observation>,
}

impl ObservationTable {
    /// Create a table from rows, enforcing (point, timestamp) order.
    pub fn new(mut rows: Vec<Observation>) -> Self {
        rows.sort_by(|a, b| {
            a.point_id
                .cmp(&b.point_id)
                .then(a.timestamp_utc.cmp(&b.timestamp_utc))
        });
        Self { rows }
    }

    /// All rows in (point, timestamp) order.
    #[inline]
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct point ids, in table order.
    pub fn point_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for row in &self.rows {
            if ids.last() != Some(&row.point_id.as_str()) {
                ids.push(&row.point_id);
            }
        }
        ids
    }

    /// Most recent observation for a point, by timestamp.
    pub fn latest_for_point(&self, point_id: &str) -> Option<&Observation> {
        self.rows
            .iter()
            .filter(|r| r.point_id == point_id)
            .max_by_key(|r| r.timestamp_utc)
    }
}

/// A fixed monitored location with stable identity and coordinates.
///
/// Created once during point selection and immutable thereafter; the
/// observation table references it by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredPoint {
    /// Stable point identifier.
    pub point_id: String,
    /// Upstream count-point identifier.
    pub count_point_id: String,
    /// Road name.
    pub road_name: String,
    /// Road category code.
    pub road_category: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Geographic bounding box used when selecting monitored points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Whether a coordinate falls inside the box (inclusive).
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn obs(point_id: &str, minute: u32, congestion: f64) -> Observation {
        Observation {
            point_id: point_id.to_string(),
            timestamp_utc: Utc.with_ymd_and_hms(2024, 6, 3, 8, minute, 0).unwrap(),
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

    #[test]
    fn test_congestion_index() {
        assert!((congestion_index(Some(30.0), Some(60.0)).unwrap() - 0.5).abs() < 1e-10);
        // Faster than free-flow clips to zero
        assert_eq!(congestion_index(Some(70.0), Some(60.0)), Some(0.0));
        assert_eq!(congestion_index(None, Some(60.0)), None);
        assert_eq!(congestion_index(Some(30.0), Some(0.0)), None);
    }

    #[test]
    fn test_table_sorts_on_construction() {
        let table = ObservationTable::new(vec![
            obs("B", 20, 0.2),
            obs("A", 10, 0.1),
            obs("B", 10, 0.3),
            obs("A", 0, 0.4),
        ]);

        let keys: Vec<(&str, u32)> = table
            .rows()
            .iter()
            .map(|r| (r.point_id.as_str(), chrono::Timelike::minute(&r.timestamp_utc)))
            .collect();
        assert_eq!(keys, vec![("A", 0), ("A", 10), ("B", 10), ("B", 20)]);
    }

    #[test]
    fn test_point_ids_and_latest() {
        let table = ObservationTable::new(vec![
            obs("A", 0, 0.1),
            obs("A", 10, 0.2),
            obs("B", 0, 0.3),
        ]);

        assert_eq!(table.point_ids(), vec!["A", "B"]);
        let latest = table.latest_for_point("A").unwrap();
        assert_eq!(latest.congestion_index, Some(0.2));
        assert!(table.latest_for_point("C").is_none());
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox {
            min_lat: 51.28,
            max_lat: 51.70,
            min_lon: -0.55,
            max_lon: 0.30,
        };
        assert!(bbox.contains(51.5, -0.1));
        assert!(!bbox.contains(52.0, -0.1));
        assert!(!bbox.contains(51.5, 0.4));
    }
}
