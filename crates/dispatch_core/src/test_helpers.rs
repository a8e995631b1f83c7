//! Test helpers for common fixture setup.
//!
//! Builders start from a trip and driver that match perfectly (same
//! coordinate, same vehicle class, available) so each test only spells out
//! the field it is about.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{Coordinate, Driver, DriverStatus, Location, Trip, TripStatus, VehicleClass};

/// Pickup used by default: a clinic entrance in downtown Columbus, OH.
pub const TEST_PICKUP: Coordinate = Coordinate {
    lat: 39.9612,
    lng: -82.9988,
};

pub fn test_pickup() -> Coordinate {
    TEST_PICKUP
}

/// A point `miles` due north of the test pickup.
pub fn north_of_pickup(miles: f64) -> Coordinate {
    // One degree of latitude is ~69.05 miles on a 3958.8 mile sphere.
    let degrees = miles / (crate::spatial::EARTH_RADIUS_MILES.to_radians());
    Coordinate::new(TEST_PICKUP.lat + degrees, TEST_PICKUP.lng)
}

pub fn test_schedule_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0)
        .single()
        .expect("fixed timestamp is unambiguous")
}

#[derive(Debug, Clone)]
pub struct TripBuilder {
    trip: Trip,
}

impl TripBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            trip: Trip {
                id: id.to_string(),
                pickup: Some(Location::Coordinate(TEST_PICKUP)),
                scheduled_at: test_schedule_time(),
                required_vehicle: Some(VehicleClass::Ambulatory),
                status: TripStatus::Pending,
                driver_id: None,
            },
        }
    }

    pub fn pickup(mut self, pickup: Location) -> Self {
        self.trip.pickup = Some(pickup);
        self
    }

    pub fn without_pickup(mut self) -> Self {
        self.trip.pickup = None;
        self
    }

    pub fn requires(mut self, vehicle: VehicleClass) -> Self {
        self.trip.required_vehicle = Some(vehicle);
        self
    }

    pub fn without_required_vehicle(mut self) -> Self {
        self.trip.required_vehicle = None;
        self
    }

    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.trip.scheduled_at = at;
        self
    }

    pub fn assigned_to(mut self, driver_id: &str, status: TripStatus) -> Self {
        self.trip.driver_id = Some(driver_id.to_string());
        self.trip.status = status;
        self
    }

    pub fn build(self) -> Trip {
        self.trip
    }
}

#[derive(Debug, Clone)]
pub struct DriverBuilder {
    driver: Driver,
}

impl DriverBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            driver: Driver {
                id: id.to_string(),
                name: format!("Driver {id}"),
                status: DriverStatus::Available,
                vehicle: VehicleClass::Ambulatory,
                location: Some(TEST_PICKUP),
                performance: Some(80.0),
            },
        }
    }

    pub fn status(mut self, status: DriverStatus) -> Self {
        self.driver.status = status;
        self
    }

    pub fn vehicle(mut self, vehicle: VehicleClass) -> Self {
        self.driver.vehicle = vehicle;
        self
    }

    pub fn location(mut self, location: Coordinate) -> Self {
        self.driver.location = Some(location);
        self
    }

    pub fn without_location(mut self) -> Self {
        self.driver.location = None;
        self
    }

    pub fn performance(mut self, performance: f64) -> Self {
        self.driver.performance = Some(performance);
        self
    }

    pub fn without_performance(mut self) -> Self {
        self.driver.performance = None;
        self
    }

    pub fn build(self) -> Driver {
        self.driver
    }
}

/// `count` non-terminal trips assigned to `driver_id`.
pub fn active_trips_for(driver_id: &str, count: usize) -> Vec<Trip> {
    (0..count)
        .map(|n| {
            TripBuilder::new(&format!("{driver_id}-active-{n}"))
                .assigned_to(driver_id, TripStatus::Assigned)
                .build()
        })
        .collect()
}
