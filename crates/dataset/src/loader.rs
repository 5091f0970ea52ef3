//! Per-tick snapshot file loading.
//!
//! The collector writes one file per tick: a JSON array of flow snapshots
//! (one element per monitored point) and a single JSON object of disruption
//! counters. Files are grouped in per-date subdirectories. A corrupt file is
//! skipped with a warning; only a numeric source that yields zero usable rows
//! is fatal.

use forecast_core::{DisruptionSnapshot, Error, FlowSnapshot, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Collect all `.json` files under `root`, recursively, in sorted order.
fn json_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut dirs = vec![root.to_path_buf()];
    while let Some(dir) = dirs.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Load all flow snapshots under `root`.
///
/// Fails with `DataUnavailable` when no file exists or none can be parsed.
pub fn load_flow_snapshots(root: &Path) -> Result<Vec<FlowSnapshot>> {
    let files = json_files(root);
    if files.is_empty() {
        return Err(Error::data_unavailable(format!(
            "no flow snapshot files under {}; run the collector first",
            root.display()
        )));
    }

    let mut snapshots = Vec::new();
    let mut parsed_files = 0usize;
    for path in &files {
        match fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|text| serde_json::from_str::<Vec<FlowSnapshot>>(&text).map_err(Error::from))
        {
            Ok(mut rows) => {
                snapshots.append(&mut rows);
                parsed_files += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable flow snapshot file");
            }
        }
    }

    if parsed_files == 0 {
        return Err(Error::data_unavailable(format!(
            "found {} flow snapshot files but failed to parse any",
            files.len()
        )));
    }
    Ok(snapshots)
}

/// Load all disruption snapshots under `root`.
///
/// The contextual source is optional: a missing directory or unparsable files
/// yield an empty collection, never an error.
pub fn load_disruption_snapshots(root: &Path) -> Vec<DisruptionSnapshot> {
    let mut snapshots = Vec::new();
    for path in json_files(root) {
        match fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|text| serde_json::from_str::<DisruptionSnapshot>(&text).map_err(Error::from))
        {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable disruption snapshot file");
            }
        }
    }
    snapshots
}
