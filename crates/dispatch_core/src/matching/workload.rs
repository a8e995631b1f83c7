use std::collections::HashMap;

use crate::model::Trip;

/// Count non-terminal trips per assigned driver in one pass over `all_trips`.
///
/// `exclude_trip_id` is left out of the count so re-ranking an already
/// assigned trip does not penalize its current driver for that same trip.
pub fn active_trip_counts<'a>(
    all_trips: &'a [Trip],
    exclude_trip_id: &str,
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for trip in all_trips {
        if trip.status.is_terminal() || trip.id == exclude_trip_id {
            continue;
        }
        if let Some(driver_id) = trip.driver_id.as_deref() {
            *counts.entry(driver_id).or_insert(0) += 1;
        }
    }
    counts
}
