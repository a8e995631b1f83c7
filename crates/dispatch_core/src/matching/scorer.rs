use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::config::ConfigError;
use crate::model::{Coordinate, Driver, DriverStatus, Location, Trip, VehicleClass, VehicleFit};
use crate::spatial::{DistanceModel, GreatCircle};

use super::config::MatchingConfig;
use super::error::MatchError;
use super::scoring::{
    availability_score, build_reasons, performance_score, proximity_score, vehicle_score,
    workload_score, ReasonInputs, ScoreComponents,
};
use super::types::{BlockerCounts, MatchDetails, NoMatchExplanation, NoMatchReason, Suggestion};
use super::workload::active_trip_counts;

/// The parts of a trip the scorer needs, after validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TripRequest<'a> {
    pub id: &'a str,
    pub pickup: Option<Coordinate>,
    pub required_vehicle: VehicleClass,
}

impl<'a> TripRequest<'a> {
    pub fn from_trip(trip: &'a Trip) -> Result<Self, MatchError> {
        if trip.id.trim().is_empty() {
            return Err(MatchError::InvalidTripInput(
                "trip id cannot be empty".to_string(),
            ));
        }

        let pickup = match &trip.pickup {
            None => {
                return Err(MatchError::InvalidTripInput(format!(
                    "trip '{}' has no pickup location",
                    trip.id
                )))
            }
            Some(Location::Address(address)) if address.trim().is_empty() => {
                return Err(MatchError::InvalidTripInput(format!(
                    "trip '{}' has an empty pickup address",
                    trip.id
                )))
            }
            Some(Location::Address(_)) => None,
            Some(Location::Coordinate(coordinate)) => {
                if !coordinate.is_valid() {
                    return Err(MatchError::InvalidTripInput(format!(
                        "trip '{}' has an out-of-range pickup coordinate ({}, {})",
                        trip.id, coordinate.lat, coordinate.lng
                    )));
                }
                Some(*coordinate)
            }
        };

        let required_vehicle = trip.required_vehicle.ok_or_else(|| {
            MatchError::InvalidTripInput(format!(
                "trip '{}' has no required vehicle classification",
                trip.id
            ))
        })?;

        Ok(Self {
            id: &trip.id,
            pickup,
            required_vehicle,
        })
    }
}

/// A non-offline driver with every sub-score computed.
#[derive(Debug, Clone)]
struct ScoredCandidate<'a> {
    input_index: usize,
    driver: &'a Driver,
    fit: VehicleFit,
    components: ScoreComponents,
    composite: f64,
    distance_miles: Option<f64>,
    active_trips: usize,
}

/// Ranks drivers for a trip by weighted composite score.
///
/// Stateless apart from its configuration; `rank` is a pure function of its
/// arguments and safe to call from many threads at once.
pub struct DriverMatchScorer {
    config: MatchingConfig,
    distance: Box<dyn DistanceModel>,
}

impl fmt::Debug for DriverMatchScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverMatchScorer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for DriverMatchScorer {
    fn default() -> Self {
        Self {
            config: MatchingConfig::default(),
            distance: Box::new(GreatCircle),
        }
    }
}

impl DriverMatchScorer {
    /// Validate `config` and build the distance model it names.
    pub fn new(config: MatchingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let distance = config
            .distance_model
            .build()
            .map_err(|error| ConfigError::Invalid(error.to_string()))?;
        Ok(Self { config, distance })
    }

    /// Use a caller-supplied distance model instead of the configured one.
    pub fn with_distance_model(
        config: MatchingConfig,
        distance: Box<dyn DistanceModel>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, distance })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Top-N drivers for `trip`, best first.
    ///
    /// Offline drivers are never considered. A vehicle mismatch only costs
    /// points, unless no remaining driver can serve the required class at
    /// all; then the result is empty. Candidates under the viability
    /// floor are dropped, so an empty result is a normal outcome; use
    /// [`DriverMatchScorer::explain_no_matches`] to find out why.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidTripInput`] when the trip lacks an id, a usable
    /// pickup location or a required vehicle classification.
    pub fn rank(
        &self,
        trip: &Trip,
        drivers: &[Driver],
        all_trips: &[Trip],
    ) -> Result<Vec<Suggestion>, MatchError> {
        let request = TripRequest::from_trip(trip)?;
        let workloads = active_trip_counts(all_trips, request.id);

        let mut candidates = self.score_pool(&request, drivers, &workloads);
        let scored = candidates.len();
        if !candidates.iter().any(|candidate| candidate.fit.can_serve()) {
            debug!(
                trip_id = request.id,
                pool = drivers.len(),
                offline = drivers.len() - scored,
                required = %request.required_vehicle,
                "no driver can serve the required vehicle class"
            );
            return Ok(Vec::new());
        }
        candidates.retain(|candidate| candidate.composite >= self.config.viability_floor);
        let viable = candidates.len();

        self.order_candidates(&mut candidates);
        candidates.truncate(self.config.top_n);

        debug!(
            trip_id = request.id,
            pool = drivers.len(),
            offline = drivers.len() - scored,
            viable,
            returned = candidates.len(),
            "ranked drivers for trip"
        );

        Ok(candidates
            .into_iter()
            .map(|candidate| self.to_suggestion(&request, candidate))
            .collect())
    }

    /// Why `rank` returns nothing for this trip, or `None` when it returns something.
    ///
    /// An all-offline pool reports unavailability. A pool where no remaining
    /// driver can serve the required vehicle class reports that. Otherwise
    /// each excluded driver is attributed one blocker, checked in order:
    /// unavailable (offline or on a trip), vehicle cannot serve the trip,
    /// composite below the viability floor. The blocker covering the most
    /// drivers is reported; ties go to the earlier blocker in that order.
    pub fn explain_no_matches(
        &self,
        trip: &Trip,
        drivers: &[Driver],
        all_trips: &[Trip],
    ) -> Result<Option<NoMatchExplanation>, MatchError> {
        let request = TripRequest::from_trip(trip)?;

        if drivers.is_empty() {
            return Ok(Some(NoMatchExplanation {
                reason: NoMatchReason::NoDrivers,
                counts: BlockerCounts::default(),
            }));
        }

        let workloads = active_trip_counts(all_trips, request.id);
        let candidates = self.score_pool(&request, drivers, &workloads);
        let any_capable = candidates.iter().any(|candidate| candidate.fit.can_serve());
        if any_capable
            && candidates
                .iter()
                .any(|candidate| candidate.composite >= self.config.viability_floor)
        {
            return Ok(None);
        }

        let mut counts = BlockerCounts {
            offline: drivers.len() - candidates.len(),
            ..BlockerCounts::default()
        };
        for candidate in &candidates {
            if candidate.driver.status != DriverStatus::Available {
                counts.on_trip += 1;
            } else if !candidate.fit.can_serve() {
                counts.vehicle_incapable += 1;
            } else {
                counts.below_floor += 1;
            }
        }

        if candidates.is_empty() {
            let reason = NoMatchReason::NoAvailableDrivers;
            debug!(trip_id = request.id, %reason, ?counts, "no viable drivers for trip");
            return Ok(Some(NoMatchExplanation { reason, counts }));
        }
        if !any_capable {
            let reason = NoMatchReason::NoVehicleCapableDrivers {
                required: request.required_vehicle,
            };
            debug!(trip_id = request.id, %reason, ?counts, "no viable drivers for trip");
            return Ok(Some(NoMatchExplanation { reason, counts }));
        }

        let ranked = [
            (counts.unavailable(), NoMatchReason::NoAvailableDrivers),
            (
                counts.vehicle_incapable,
                NoMatchReason::NoVehicleCapableDrivers {
                    required: request.required_vehicle,
                },
            ),
            (counts.below_floor, NoMatchReason::BelowViabilityFloor),
        ];
        // max_by_key keeps the last maximum, so scan in reverse priority
        let reason = ranked
            .iter()
            .rev()
            .max_by_key(|(count, _)| *count)
            .map(|(_, reason)| *reason)
            .unwrap_or(NoMatchReason::NoDrivers);

        debug!(trip_id = request.id, %reason, ?counts, "no viable drivers for trip");

        Ok(Some(NoMatchExplanation { reason, counts }))
    }

    fn score_pool<'a>(
        &self,
        request: &TripRequest<'_>,
        drivers: &'a [Driver],
        workloads: &HashMap<&str, usize>,
    ) -> Vec<ScoredCandidate<'a>> {
        drivers
            .iter()
            .enumerate()
            .filter(|(_, driver)| driver.status != DriverStatus::Offline)
            .map(|(input_index, driver)| {
                let active_trips = workloads.get(driver.id.as_str()).copied().unwrap_or(0);
                self.score_candidate(request, input_index, driver, active_trips)
            })
            .collect()
    }

    fn score_candidate<'a>(
        &self,
        request: &TripRequest<'_>,
        input_index: usize,
        driver: &'a Driver,
        active_trips: usize,
    ) -> ScoredCandidate<'a> {
        let fit = driver.vehicle.fit_for(request.required_vehicle);
        let distance_miles = match (driver.location, request.pickup) {
            (Some(from), Some(to)) if from.is_valid() => {
                Some(self.distance.distance_miles(from, to))
            }
            _ => None,
        };

        let components = ScoreComponents {
            vehicle: vehicle_score(fit, &self.config),
            availability: availability_score(driver.status),
            proximity: proximity_score(distance_miles, &self.config),
            performance: performance_score(driver.performance, &self.config),
            workload: workload_score(active_trips, &self.config),
        };
        let composite = components.composite(&self.config.weights);

        trace!(
            driver_id = driver.id.as_str(),
            composite,
            vehicle = components.vehicle,
            availability = components.availability,
            proximity = components.proximity,
            performance = components.performance,
            workload = components.workload,
            "scored candidate"
        );

        ScoredCandidate {
            input_index,
            driver,
            fit,
            components,
            composite,
            distance_miles,
            active_trips,
        }
    }

    /// Descending by composite. Candidates within `tie_epsilon` of the first
    /// member of their run are ordered by lower workload, then higher
    /// performance, then input order.
    fn order_candidates(&self, candidates: &mut [ScoredCandidate<'_>]) {
        candidates.sort_by(|a, b| {
            b.composite
                .total_cmp(&a.composite)
                .then(a.input_index.cmp(&b.input_index))
        });

        let epsilon = self.config.tie_epsilon;
        let mut start = 0;
        while start < candidates.len() {
            let leader = candidates[start].composite;
            let mut end = start + 1;
            while end < candidates.len() && leader - candidates[end].composite <= epsilon {
                end += 1;
            }
            candidates[start..end].sort_by(tie_break);
            start = end;
        }
    }

    fn to_suggestion(&self, request: &TripRequest<'_>, candidate: ScoredCandidate<'_>) -> Suggestion {
        let ScoredCandidate {
            driver,
            fit,
            components,
            composite,
            distance_miles,
            active_trips,
            ..
        } = candidate;

        let reasons = build_reasons(&ReasonInputs {
            status: driver.status,
            fit,
            driver_vehicle: driver.vehicle,
            required_vehicle: request.required_vehicle,
            distance_miles,
            pickup_geocoded: request.pickup.is_some(),
            performance: driver.performance.map(|_| components.performance),
            active_trips,
        });

        Suggestion {
            driver_id: driver.id.clone(),
            driver_name: driver.name.clone(),
            score: composite,
            details: MatchDetails {
                availability_match: driver.status == DriverStatus::Available,
                vehicle_match: fit.can_serve(),
                vehicle_fit: fit,
                vehicle_score: components.vehicle,
                availability_score: components.availability,
                proximity_score: components.proximity,
                performance_score: components.performance,
                workload_score: components.workload,
            },
            distance_miles,
            active_trips,
            reasons,
        }
    }
}

fn tie_break(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    a.active_trips
        .cmp(&b.active_trips)
        .then(b.components.performance.total_cmp(&a.components.performance))
        .then(a.input_index.cmp(&b.input_index))
}
