//! Sub-scores for the five match dimensions and the reasons shown for them.
//!
//! Every sub-score is on a 0..=100 scale; the composite is their weighted sum.

use crate::model::{DriverStatus, VehicleClass, VehicleFit};

use super::config::{MatchingConfig, ScoreWeights};
use super::types::Reason;

/// Distance (miles) beyond which proximity is flagged as a warning.
const FAR_PICKUP_MILES: f64 = 10.0;
const STRONG_PERFORMANCE: f64 = 90.0;
const WEAK_PERFORMANCE: f64 = 60.0;
const HEAVY_WORKLOAD_TRIPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub vehicle: f64,
    pub availability: f64,
    pub proximity: f64,
    pub performance: f64,
    pub workload: f64,
}

impl ScoreComponents {
    pub fn composite(&self, weights: &ScoreWeights) -> f64 {
        let total = self.vehicle * weights.vehicle
            + self.availability * weights.availability
            + self.proximity * weights.proximity
            + self.performance * weights.performance
            + self.workload * weights.workload;
        total.clamp(0.0, 100.0)
    }
}

pub fn vehicle_score(fit: VehicleFit, config: &MatchingConfig) -> f64 {
    match fit {
        VehicleFit::Exact => 100.0,
        VehicleFit::Superset => config.superset_vehicle_credit,
        VehicleFit::Mismatch => 0.0,
    }
}

pub fn availability_score(status: DriverStatus) -> f64 {
    match status {
        DriverStatus::Available => 100.0,
        DriverStatus::OnTrip | DriverStatus::Offline => 0.0,
    }
}

pub fn proximity_score(distance_miles: Option<f64>, config: &MatchingConfig) -> f64 {
    match distance_miles {
        Some(miles) if miles.is_finite() => {
            (100.0 - miles.max(0.0) * config.proximity_decay_per_mile).clamp(0.0, 100.0)
        }
        _ => config.neutral_proximity,
    }
}

/// Clamp the stored performance signal; non-finite values score 0 and a
/// driver with no signal yet gets the configured neutral score.
pub fn performance_score(signal: Option<f64>, config: &MatchingConfig) -> f64 {
    match signal {
        Some(signal) if signal.is_finite() => signal.clamp(0.0, 100.0),
        Some(_) => 0.0,
        None => config.neutral_performance,
    }
}

pub fn workload_score(active_trips: usize, config: &MatchingConfig) -> f64 {
    (100.0 - active_trips as f64 * config.workload_decrement_per_trip).max(0.0)
}

/// Inputs to the reason list, gathered once per candidate.
#[derive(Debug, Clone, Copy)]
pub struct ReasonInputs {
    pub status: DriverStatus,
    pub fit: VehicleFit,
    pub driver_vehicle: VehicleClass,
    pub required_vehicle: VehicleClass,
    pub distance_miles: Option<f64>,
    /// False when the pickup is an address with no coordinate.
    pub pickup_geocoded: bool,
    /// Performance sub-score, `None` when the driver has no signal yet.
    pub performance: Option<f64>,
    pub active_trips: usize,
}

/// Reasons in dimension order: availability, vehicle, proximity, performance, workload.
pub fn build_reasons(inputs: &ReasonInputs) -> Vec<Reason> {
    let mut reasons = Vec::with_capacity(5);

    reasons.push(match inputs.status {
        DriverStatus::Available => Reason::positive("Available now"),
        DriverStatus::OnTrip => Reason::warning("Currently on a trip"),
        DriverStatus::Offline => Reason::warning("Offline"),
    });

    reasons.push(match inputs.fit {
        VehicleFit::Exact => {
            Reason::positive(format!("Vehicle match ({})", inputs.required_vehicle))
        }
        VehicleFit::Superset => Reason::positive(format!(
            "Vehicle exceeds requirement ({} for {})",
            inputs.driver_vehicle, inputs.required_vehicle
        )),
        VehicleFit::Mismatch => Reason::warning(format!(
            "Vehicle mismatch: needs {}, has {}",
            inputs.required_vehicle, inputs.driver_vehicle
        )),
    });

    reasons.push(match inputs.distance_miles {
        Some(miles) if miles > FAR_PICKUP_MILES => {
            Reason::warning(format!("Far from pickup ({miles:.1} mi)"))
        }
        Some(miles) => Reason::positive(format!("{miles:.1} mi from pickup")),
        None if !inputs.pickup_geocoded => Reason::warning("Pickup not geocoded"),
        None => Reason::warning("Driver location unknown"),
    });

    reasons.push(match inputs.performance {
        None => Reason::warning("No performance history"),
        Some(score) if score >= STRONG_PERFORMANCE => {
            Reason::positive(format!("Excellent performance ({score:.0})"))
        }
        Some(score) if score < WEAK_PERFORMANCE => {
            Reason::warning(format!("Low performance ({score:.0})"))
        }
        Some(score) => Reason::positive(format!("Performance {score:.0}")),
    });

    reasons.push(match inputs.active_trips {
        0 => Reason::positive("No active trips"),
        n if n >= HEAVY_WORKLOAD_TRIPS => {
            Reason::warning(format!("Heavy workload ({n} active trips)"))
        }
        1 => Reason::positive("1 active trip"),
        n => Reason::positive(format!("{n} active trips")),
    });

    reasons
}
