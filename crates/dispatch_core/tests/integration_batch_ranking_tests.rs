mod support;

use dispatch_core::matching::{pending_trips, DriverMatchScorer, MatchError};
use dispatch_core::model::TripStatus;
use dispatch_core::test_helpers::{DriverBuilder, TripBuilder};

use support::fixtures::{driver_ids, seeded_snapshot};

#[test]
fn batch_matches_one_by_one_ranking() {
    let scorer = DriverMatchScorer::default();
    let snapshot = seeded_snapshot(11);
    let pending = pending_trips(&snapshot.trips);
    assert!(!pending.is_empty());

    let batch = scorer.rank_batch(&pending, &snapshot.drivers, &snapshot.trips);
    assert_eq!(batch.len(), pending.len());

    for (ranking, trip) in batch.iter().zip(&pending) {
        assert_eq!(ranking.trip_id, trip.id);
        let single = scorer
            .rank(trip, &snapshot.drivers, &snapshot.trips)
            .expect("rank");
        let batched = ranking.result.as_ref().expect("batched rank");
        assert_eq!(driver_ids(batched), driver_ids(&single));
    }
}

#[test]
fn pending_trips_come_out_in_schedule_order() {
    let snapshot = seeded_snapshot(3);
    let pending = pending_trips(&snapshot.trips);
    assert!(pending.iter().all(|t| t.status == TripStatus::Pending));
    assert!(pending
        .windows(2)
        .all(|pair| pair[0].scheduled_at <= pair[1].scheduled_at));
}

#[test]
fn malformed_trip_does_not_hide_the_rest() {
    let good = TripBuilder::new("good").build();
    let broken = TripBuilder::new("broken").without_pickup().build();
    let drivers = vec![DriverBuilder::new("d1").build()];

    let batch = DriverMatchScorer::default().rank_batch(&[&good, &broken], &drivers, &[]);

    assert_eq!(batch[0].trip_id, "good");
    assert_eq!(batch[0].result.as_ref().map(Vec::len), Ok(1));
    assert_eq!(batch[1].trip_id, "broken");
    assert!(matches!(batch[1].result, Err(MatchError::InvalidTripInput(_))));
}

#[test]
fn one_driver_can_be_suggested_for_several_trips() {
    let first = TripBuilder::new("t1").build();
    let second = TripBuilder::new("t2").build();
    let drivers = vec![DriverBuilder::new("only").build()];

    let batch = DriverMatchScorer::default().rank_batch(&[&first, &second], &drivers, &[]);

    for ranking in &batch {
        let suggestions = ranking.result.as_ref().expect("rank");
        assert_eq!(driver_ids(suggestions), vec!["only"]);
    }
}

#[test]
fn empty_batch_is_empty() {
    let drivers = vec![DriverBuilder::new("d1").build()];
    assert!(DriverMatchScorer::default()
        .rank_batch(&[], &drivers, &[])
        .is_empty());
}
