//! Plain-text rendering for terminal output.

use std::fmt::Write;

use dispatch_core::matching::{NoMatchExplanation, Suggestion};
use dispatch_core::model::VehicleClass;
use dispatch_core::pricing::FareBreakdown;

pub fn suggestions_table(trip_id: &str, suggestions: &[Suggestion]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "trip {trip_id}");
    for (rank, suggestion) in suggestions.iter().enumerate() {
        let distance = suggestion
            .distance_miles
            .map_or_else(|| "    ?".to_string(), |miles| format!("{miles:5.1}"));
        let _ = writeln!(
            out,
            "  {}. {:<20} score {:>3}  {} mi  {} active",
            rank + 1,
            suggestion.driver_name,
            suggestion.display_score(),
            distance,
            suggestion.active_trips
        );
        for reason in &suggestion.reasons {
            let _ = writeln!(out, "       {reason}");
        }
    }
    out
}

pub fn explanation_line(trip_id: &str, explanation: &NoMatchExplanation) -> String {
    let counts = explanation.counts;
    format!(
        "trip {trip_id}: {} (offline {}, on trip {}, wrong vehicle {}, below floor {})",
        explanation.reason,
        counts.offline,
        counts.on_trip,
        counts.vehicle_incapable,
        counts.below_floor
    )
}

pub fn fare_line(service: VehicleClass, breakdown: &FareBreakdown, detailed: bool) -> String {
    let mut out = format!(
        "{service} {:.1} mi: ${:.2}",
        breakdown.distance_miles, breakdown.total
    );
    if detailed {
        let _ = write!(
            out,
            " (tier {} at ${:.2}",
            breakdown.tier_index + 1,
            breakdown.tier_rate
        );
        if breakdown.overflow_miles > 0.0 {
            let _ = write!(
                out,
                " + {:.1} overflow mi at ${:.2}",
                breakdown.overflow_miles, breakdown.overflow_charge
            );
        }
        out.push(')');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::matching::{BlockerCounts, DriverMatchScorer, NoMatchReason};
    use dispatch_core::pricing::{RateTable, RateTier};
    use dispatch_core::test_helpers::{DriverBuilder, TripBuilder};

    #[test]
    fn table_lists_drivers_and_reasons() {
        let trip = TripBuilder::new("t1").build();
        let drivers = vec![DriverBuilder::new("d1").without_location().build()];
        let suggestions = DriverMatchScorer::default()
            .rank(&trip, &drivers, &[])
            .expect("rank");

        let table = suggestions_table("t1", &suggestions);
        assert!(table.starts_with("trip t1\n"));
        assert!(table.contains("1. Driver d1"));
        assert!(table.contains("?"));
        assert!(table.contains("Driver location unknown"));
    }

    #[test]
    fn explanation_includes_counts() {
        let explanation = NoMatchExplanation {
            reason: NoMatchReason::NoAvailableDrivers,
            counts: BlockerCounts {
                offline: 3,
                ..BlockerCounts::default()
            },
        };
        let line = explanation_line("t9", &explanation);
        assert!(line.starts_with("trip t9: "));
        assert!(line.contains("offline 3"));
    }

    #[test]
    fn fare_breakdown_mentions_overflow() {
        let table = RateTable::new(
            vec![RateTier::new(1.0, 5.0, 14.0), RateTier::new(5.0, 10.0, 20.0)],
            2.0,
        )
        .expect("tiers");
        let breakdown = table.breakdown(12.0).expect("fare");

        assert_eq!(
            fare_line(VehicleClass::Ambulatory, &breakdown, false),
            "ambulatory 12.0 mi: $24.00"
        );
        assert_eq!(
            fare_line(VehicleClass::Ambulatory, &breakdown, true),
            "ambulatory 12.0 mi: $24.00 (tier 2 at $20.00 + 2.0 overflow mi at $4.00)"
        );
    }
}
