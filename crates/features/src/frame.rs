//! Columnar feature frame.
//!
//! Holds the (point, timestamp) key vectors alongside named `Option<f64>`
//! columns. All positional transforms (lags, rolling windows, target shifts)
//! require (point, time) order and operate within contiguous per-point runs;
//! the frame owns both the ordering and the run discovery so callers can never
//! compute them on raw arrival order by accident.

use forecast_core::{Observation, ObservationTable, Timestamp};
use serde::{Deserialize, Serialize};

/// One named column of optional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, e.g. `congestion_index_lag_1`.
    pub name: String,
    /// One value per frame row; `None` marks an undefined value.
    pub values: Vec<Option<f64>>,
}

/// Columnar table keyed by (point, timestamp).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureFrame {
    point_id: Vec<String>,
    timestamp_utc: Vec<Timestamp>,
    columns: Vec<Column>,
}

/// Base measurement columns carried from the observation table, in order.
const BASE_COLUMNS: &[&str] = &[
    "congestion_index",
    "current_speed",
    "free_flow_speed",
    "current_travel_time",
    "free_flow_travel_time",
    "confidence",
    "road_closure",
    "disruptions_count",
    "severe_disruptions_count",
    "roads_seen",
];

fn base_value(row: &Observation, name: &str) -> Option<f64> {
    match name {
        "congestion_index" => row.congestion_index,
        "current_speed" => row.current_speed,
        "free_flow_speed" => row.free_flow_speed,
        "current_travel_time" => row.current_travel_time,
        "free_flow_travel_time" => row.free_flow_travel_time,
        "confidence" => row.confidence,
        "road_closure" => row.road_closure,
        "disruptions_count" => row.disruptions_count,
        "severe_disruptions_count" => row.severe_disruptions_count,
        "roads_seen" => row.roads_seen,
        _ => None,
    }
}

impl FeatureFrame {
    /// Build a frame holding the base measurement columns of a table.
    pub fn from_observations(table: &ObservationTable) -> Self {
        let rows = table.rows();
        let mut frame = Self {
            point_id: rows.iter().map(|r| r.point_id.clone()).collect(),
            timestamp_utc: rows.iter().map(|r| r.timestamp_utc).collect(),
            columns: Vec::with_capacity(BASE_COLUMNS.len()),
        };
        for &name in BASE_COLUMNS {
            frame.set_column(name, rows.iter().map(|r| base_value(r, name)).collect());
        }
        frame
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.point_id.len()
    }

    /// Whether the frame has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.point_id.is_empty()
    }

    /// Point id of each row.
    #[inline]
    pub fn point_ids(&self) -> &[String] {
        &self.point_id
    }

    /// Timestamp of each row.
    #[inline]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamp_utc
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Values of a column, if present.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Insert or replace a column. The value vector must match the row count.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.n_rows());
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
    }

    /// Sort rows by (point, timestamp) ascending.
    pub fn sort_by_point_time(&mut self) {
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by(|&a, &b| {
            self.point_id[a]
                .cmp(&self.point_id[b])
                .then(self.timestamp_utc[a].cmp(&self.timestamp_utc[b]))
        });
        self.apply_order(&order);
    }

    /// Sort rows by timestamp ascending, preserving point interleaving
    /// between equal timestamps (stable).
    pub fn sort_by_time(&mut self) {
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by(|&a, &b| self.timestamp_utc[a].cmp(&self.timestamp_utc[b]));
        self.apply_order(&order);
    }

    fn apply_order(&mut self, order: &[usize]) {
        self.point_id = order.iter().map(|&i| self.point_id[i].clone()).collect();
        self.timestamp_utc = order.iter().map(|&i| self.timestamp_utc[i]).collect();
        for col in &mut self.columns {
            col.values = order.iter().map(|&i| col.values[i]).collect();
        }
    }

    /// Contiguous per-point runs as half-open `(start, end)` ranges.
    ///
    /// Only meaningful after `sort_by_point_time`.
    pub fn entity_runs(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let n = self.n_rows();
        let mut start = 0;
        for i in 1..=n {
            if i == n || self.point_id[i] != self.point_id[start] {
                runs.push((start, i));
                start = i;
            }
        }
        runs
    }

    /// Keep only rows where `mask` is true.
    pub fn retain_rows(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.n_rows());
        let keep: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();
        self.apply_order(&keep);
    }

    /// Copy of the rows in `range`, all columns included.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            point_id: self.point_id[range.clone()].to_vec(),
            timestamp_utc: self.timestamp_utc[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[range.clone()].to_vec(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use forecast_core::Observation;

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
    fn test_from_observations_base_columns() {
        let table = ObservationTable::new(vec![obs("A", 0, 0.1), obs("A", 10, 0.2)]);
        let frame = FeatureFrame::from_observations(&table);

        assert_eq!(frame.n_rows(), 2);
        assert_eq!(
            frame.column("congestion_index").unwrap(),
            &[Some(0.1), Some(0.2)]
        );
        assert_eq!(frame.column("current_speed").unwrap(), &[None, None]);
        assert!(frame.column("nope").is_none());
    }

    #[test]
    fn test_entity_runs() {
        let table = ObservationTable::new(vec![
            obs("B", 0, 0.1),
            obs("A", 0, 0.2),
            obs("A", 10, 0.3),
            obs("B", 10, 0.4),
        ]);
        let mut frame = FeatureFrame::from_observations(&table);
        frame.sort_by_point_time();

        assert_eq!(frame.entity_runs(), vec![(0, 2), (2, 4)]);
        assert_eq!(frame.point_ids()[0], "A");
    }

    #[test]
    fn test_sort_by_time_is_stable() {
        let table = ObservationTable::new(vec![
            obs("A", 0, 0.1),
            obs("A", 10, 0.2),
            obs("B", 0, 0.3),
            obs("B", 10, 0.4),
        ]);
        let mut frame = FeatureFrame::from_observations(&table);
        frame.sort_by_time();

        // Equal timestamps keep the (point-sorted) relative order
        assert_eq!(frame.point_ids(), &["A", "B", "A", "B"]);
    }

    #[test]
    fn test_retain_and_slice() {
        let table = ObservationTable::new(vec![
            obs("A", 0, 0.1),
            obs("A", 10, 0.2),
            obs("A", 20, 0.3),
        ]);
        let mut frame = FeatureFrame::from_observations(&table);

        let sliced = frame.slice(1..3);
        assert_eq!(
            sliced.column("congestion_index").unwrap(),
            &[Some(0.2), Some(0.3)]
        );

        frame.retain_rows(&[true, false, true]);
        assert_eq!(
            frame.column("congestion_index").unwrap(),
            &[Some(0.1), Some(0.3)]
        );
    }
}
