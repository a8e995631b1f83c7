use rayon::prelude::*;
use tracing::debug;

use crate::model::{Driver, Trip, TripStatus};

use super::scorer::DriverMatchScorer;
use super::types::BatchRanking;

/// Trips still waiting for a driver, earliest scheduled first.
pub fn pending_trips(all_trips: &[Trip]) -> Vec<&Trip> {
    let mut pending: Vec<&Trip> = all_trips
        .iter()
        .filter(|trip| trip.status == TripStatus::Pending)
        .collect();
    pending.sort_by_key(|trip| trip.scheduled_at);
    pending
}

impl DriverMatchScorer {
    /// Rank several trips against the same driver pool in parallel.
    ///
    /// Output order follows `trips`. Each trip carries its own result, so a
    /// malformed trip does not hide the rankings of the others. Rankings are
    /// independent: a driver suggested for one trip may appear for another.
    pub fn rank_batch(
        &self,
        trips: &[&Trip],
        drivers: &[Driver],
        all_trips: &[Trip],
    ) -> Vec<BatchRanking> {
        let rankings: Vec<BatchRanking> = trips
            .par_iter()
            .map(|trip| BatchRanking {
                trip_id: trip.id.clone(),
                result: self.rank(trip, drivers, all_trips),
            })
            .collect();

        let failed = rankings.iter().filter(|r| r.result.is_err()).count();
        debug!(trips = trips.len(), failed, "ranked trip batch");
        rankings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{DriverBuilder, TripBuilder};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn pending_trips_sorted_by_schedule() {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let trips = vec![
            TripBuilder::new("late").scheduled_at(base + Duration::hours(2)).build(),
            TripBuilder::new("assigned")
                .assigned_to("d1", TripStatus::Assigned)
                .build(),
            TripBuilder::new("early").scheduled_at(base).build(),
        ];

        let ids: Vec<&str> = pending_trips(&trips).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let good = TripBuilder::new("good").build();
        let bad = TripBuilder::new("bad").without_pickup().build();
        let drivers = vec![DriverBuilder::new("d1").build()];

        let rankings = DriverMatchScorer::default().rank_batch(&[&good, &bad], &drivers, &[]);
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].trip_id, "good");
        assert_eq!(rankings[0].result.as_ref().map(Vec::len), Ok(1));
        assert!(rankings[1].result.is_err());
    }
}
