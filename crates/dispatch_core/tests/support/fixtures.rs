use dispatch_core::matching::Suggestion;
use dispatch_core::synthetic::{generate_snapshot, FleetParams, Snapshot};

/// Seeded snapshot large enough to exercise ties, offline drivers and unknown locations.
pub fn seeded_snapshot(seed: u64) -> Snapshot {
    generate_snapshot(&FleetParams::default().with_seed(seed).with_drivers(40).with_trips(60))
}

pub fn driver_ids(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.driver_id.as_str()).collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
