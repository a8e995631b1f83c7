use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dispatch_core::config::DispatchConfig;
use dispatch_core::model::Trip;
use dispatch_core::synthetic::Snapshot;
use tracing::debug;

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    debug!(
        path = %path.display(),
        trips = snapshot.trips.len(),
        drivers = snapshot.drivers.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json).with_context(|| format!("failed to write snapshot {}", path.display()))
}

pub fn find_trip<'a>(snapshot: &'a Snapshot, trip_id: &str) -> Result<&'a Trip> {
    snapshot
        .trip(trip_id)
        .with_context(|| format!("trip {trip_id} is not in the snapshot"))
}

/// Defaults when no config file is given.
pub fn load_config(path: Option<&Path>) -> Result<DispatchConfig> {
    match path {
        Some(path) => DispatchConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(DispatchConfig::default()),
    }
}
