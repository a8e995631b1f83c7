//! Seeded synthetic snapshots for demos, benchmarks and randomized tests.
//!
//! Drivers and trips are scattered around a service-area center. The same
//! seed always produces the same snapshot.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, Driver, DriverStatus, Location, Trip, TripStatus, VehicleClass};

const MILES_PER_DEGREE_LAT: f64 = 69.05;

#[derive(Debug, Clone, Copy)]
pub struct FleetParams {
    pub num_drivers: usize,
    pub num_trips: usize,
    pub center: Coordinate,
    /// Drivers and pickups fall within this many miles of `center`.
    pub radius_miles: f64,
    /// Share of drivers with no known location.
    pub unknown_location_share: f64,
    pub start: DateTime<Utc>,
    pub seed: u64,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            num_drivers: 25,
            num_trips: 40,
            center: Coordinate::new(39.9612, -82.9988),
            radius_miles: 12.0,
            unknown_location_share: 0.1,
            // 2026-03-02 06:00 UTC
            start: DateTime::from_timestamp(1_772_431_200, 0).unwrap_or_default(),
            seed: 0,
        }
    }
}

impl FleetParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_drivers(mut self, num_drivers: usize) -> Self {
        self.num_drivers = num_drivers;
        self
    }

    pub fn with_trips(mut self, num_trips: usize) -> Self {
        self.num_trips = num_trips;
        self
    }
}

/// Trips and drivers as the dashboard would hand them over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

impl Snapshot {
    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.id == id)
    }
}

fn random_point(rng: &mut StdRng, center: Coordinate, radius_miles: f64) -> Coordinate {
    // sqrt keeps the density uniform over the disk
    let distance = radius_miles * rng.gen::<f64>().sqrt();
    let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
    let dlat = distance * bearing.cos() / MILES_PER_DEGREE_LAT;
    let dlng = distance * bearing.sin() / (MILES_PER_DEGREE_LAT * center.lat.to_radians().cos());
    Coordinate::new(center.lat + dlat, center.lng + dlng)
}

fn random_vehicle(rng: &mut StdRng) -> VehicleClass {
    // Mostly sedans, fewer wheelchair vans, a handful of stretcher units
    match rng.gen_range(0..10) {
        0..=5 => VehicleClass::Ambulatory,
        6..=8 => VehicleClass::Wheelchair,
        _ => VehicleClass::Stretcher,
    }
}

pub fn generate_snapshot(params: &FleetParams) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(params.seed);

    let drivers: Vec<Driver> = (0..params.num_drivers)
        .map(|n| {
            let status = match rng.gen_range(0..10) {
                0..=5 => DriverStatus::Available,
                6..=7 => DriverStatus::OnTrip,
                _ => DriverStatus::Offline,
            };
            let location = if rng.gen_bool(params.unknown_location_share.clamp(0.0, 1.0)) {
                None
            } else {
                Some(random_point(&mut rng, params.center, params.radius_miles))
            };
            Driver {
                id: format!("drv-{n:04}"),
                name: format!("Driver {n}"),
                status,
                vehicle: random_vehicle(&mut rng),
                location,
                performance: Some(rng.gen_range(40.0..=100.0_f64).round()),
            }
        })
        .collect();

    let trips = (0..params.num_trips)
        .map(|n| {
            let status = match rng.gen_range(0..10) {
                0..=4 => TripStatus::Pending,
                5..=6 => TripStatus::Assigned,
                7 => TripStatus::InProgress,
                8 => TripStatus::Completed,
                _ => TripStatus::Cancelled,
            };
            let driver_id = if status == TripStatus::Pending || drivers.is_empty() {
                None
            } else {
                Some(drivers[rng.gen_range(0..drivers.len())].id.clone())
            };
            Trip {
                id: format!("trip-{n:04}"),
                pickup: Some(Location::Coordinate(random_point(
                    &mut rng,
                    params.center,
                    params.radius_miles,
                ))),
                scheduled_at: params.start + Duration::minutes(rng.gen_range(0..12 * 60)),
                required_vehicle: Some(random_vehicle(&mut rng)),
                status,
                driver_id,
            }
        })
        .collect();

    Snapshot { trips, drivers }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_snapshot() {
        let params = FleetParams::default().with_seed(7);
        assert_eq!(generate_snapshot(&params), generate_snapshot(&params));
    }

    #[test]
    fn generates_requested_counts_with_valid_coordinates() {
        let params = FleetParams::default().with_drivers(50).with_trips(80);
        let snapshot = generate_snapshot(&params);
        assert_eq!(snapshot.drivers.len(), 50);
        assert_eq!(snapshot.trips.len(), 80);
        assert!(snapshot
            .drivers
            .iter()
            .filter_map(|d| d.location)
            .all(|c| c.is_valid()));
        assert!(snapshot
            .trips
            .iter()
            .filter(|t| t.status == TripStatus::Pending)
            .all(|t| t.driver_id.is_none()));
    }
}
