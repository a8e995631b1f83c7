use h3o::Resolution;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::spatial::DistanceModelKind;

/// Share of the composite score each dimension contributes. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub vehicle: f64,
    pub availability: f64,
    pub proximity: f64,
    pub performance: f64,
    pub workload: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            vehicle: 0.25,
            availability: 0.25,
            proximity: 0.20,
            performance: 0.15,
            workload: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.vehicle + self.availability + self.proximity + self.performance + self.workload
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("vehicle", self.vehicle),
            ("availability", self.availability),
            ("proximity", self.proximity),
            ("performance", self.performance),
            ("workload", self.workload),
        ]
    }
}

/// Tunables for the driver match scorer.
///
/// # Defaults
///
/// - Superset vehicle credit: 50 (stretcher van on an ambulatory trip)
/// - Neutral proximity: 50 when either coordinate is unknown
/// - Neutral performance: 50 for a driver with no performance signal yet
/// - Proximity decay: 5 points per mile, floored at 0 (20+ miles scores 0)
/// - Workload decrement: 20 points per active trip, floored at 0
/// - Top N: 3, viability floor: 20, tie epsilon: 0.01
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: ScoreWeights,
    pub superset_vehicle_credit: f64,
    pub neutral_proximity: f64,
    pub neutral_performance: f64,
    pub proximity_decay_per_mile: f64,
    pub workload_decrement_per_trip: f64,
    pub top_n: usize,
    pub viability_floor: f64,
    pub tie_epsilon: f64,
    pub distance_model: DistanceModelKind,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            superset_vehicle_credit: 50.0,
            neutral_proximity: 50.0,
            neutral_performance: 50.0,
            proximity_decay_per_mile: 5.0,
            workload_decrement_per_trip: 20.0,
            top_n: 3,
            viability_floor: 20.0,
            tie_epsilon: 0.01,
            distance_model: DistanceModelKind::default(),
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, weight) in self.weights.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight '{name}' must be a non-negative number, got {weight}"
                )));
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }

        for (name, value) in [
            ("superset_vehicle_credit", self.superset_vehicle_credit),
            ("neutral_proximity", self.neutral_proximity),
            ("neutral_performance", self.neutral_performance),
            ("viability_floor", self.viability_floor),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=100, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("proximity_decay_per_mile", self.proximity_decay_per_mile),
            ("workload_decrement_per_trip", self.workload_decrement_per_trip),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.top_n == 0 {
            return Err(ConfigError::Invalid(
                "top_n must be a positive integer".to_string(),
            ));
        }

        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tie_epsilon must be a non-negative number, got {}",
                self.tie_epsilon
            )));
        }

        if let DistanceModelKind::H3Grid { resolution } = self.distance_model {
            Resolution::try_from(resolution).map_err(|_| {
                ConfigError::Invalid(format!("H3 resolution must be 0..=15, got {resolution}"))
            })?;
        }

        Ok(())
    }
}
