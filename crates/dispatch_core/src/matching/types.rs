use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{VehicleClass, VehicleFit};

use super::error::MatchError;

pub const POSITIVE_PREFIX: &str = "✓ ";
pub const WARNING_PREFIX: &str = "⚠ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    Positive,
    Warning,
}

/// One line of justification shown next to a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub kind: ReasonKind,
    pub text: String,
}

impl Reason {
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            kind: ReasonKind::Positive,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: ReasonKind::Warning,
            text: text.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.kind == ReasonKind::Warning
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            ReasonKind::Positive => POSITIVE_PREFIX,
            ReasonKind::Warning => WARNING_PREFIX,
        };
        write!(f, "{prefix}{}", self.text)
    }
}

/// Per-dimension view of how a driver fits a trip. Sub-scores are 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub availability_match: bool,
    /// True when the vehicle can serve the trip, exactly or as a superset.
    pub vehicle_match: bool,
    pub vehicle_fit: VehicleFit,
    pub vehicle_score: f64,
    pub availability_score: f64,
    pub proximity_score: f64,
    pub performance_score: f64,
    pub workload_score: f64,
}

/// A ranked driver for a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub driver_id: String,
    pub driver_name: String,
    /// Composite 0..=100, unrounded so ordering stays stable.
    pub score: f64,
    pub details: MatchDetails,
    /// Miles from the driver to the pickup; `None` when either side has no coordinate.
    pub distance_miles: Option<f64>,
    pub active_trips: usize,
    pub reasons: Vec<Reason>,
}

impl Suggestion {
    pub fn display_score(&self) -> u8 {
        self.score.round().clamp(0.0, 100.0) as u8
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Reason> {
        self.reasons.iter().filter(|reason| reason.is_warning())
    }
}

/// Dominant reason a trip ended up with no suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum NoMatchReason {
    NoDrivers,
    NoAvailableDrivers,
    NoVehicleCapableDrivers { required: VehicleClass },
    BelowViabilityFloor,
}

impl fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoMatchReason::NoDrivers => f.write_str("no drivers in the candidate pool"),
            NoMatchReason::NoAvailableDrivers => f.write_str("no available drivers"),
            NoMatchReason::NoVehicleCapableDrivers { required } => {
                write!(f, "no drivers with a {required}-capable vehicle")
            }
            NoMatchReason::BelowViabilityFloor => {
                f.write_str("no driver reaches the minimum match score")
            }
        }
    }
}

/// How many drivers each blocker accounted for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerCounts {
    pub offline: usize,
    pub on_trip: usize,
    pub vehicle_incapable: usize,
    pub below_floor: usize,
}

impl BlockerCounts {
    pub fn unavailable(&self) -> usize {
        self.offline + self.on_trip
    }

    pub fn total(&self) -> usize {
        self.unavailable() + self.vehicle_incapable + self.below_floor
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoMatchExplanation {
    pub reason: NoMatchReason,
    pub counts: BlockerCounts,
}

/// Ranking result for one trip of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRanking {
    pub trip_id: String,
    pub result: Result<Vec<Suggestion>, MatchError>,
}
