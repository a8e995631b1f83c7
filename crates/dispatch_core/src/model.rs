//! Trip and driver records as they arrive from the dispatch data store.
//!
//! These are read-only snapshots: the scorer and the fare calculator never
//! mutate them. Fields that a malformed record may lack (pickup, required
//! vehicle) are `Option` so that validation, not deserialization, decides
//! how to report them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle / service classification. Ordered by capability: a stretcher van
/// can carry wheelchair and ambulatory passengers, a wheelchair van can carry
/// ambulatory passengers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    Ambulatory,
    Wheelchair,
    Stretcher,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [
        VehicleClass::Ambulatory,
        VehicleClass::Wheelchair,
        VehicleClass::Stretcher,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Ambulatory => "ambulatory",
            VehicleClass::Wheelchair => "wheelchair",
            VehicleClass::Stretcher => "stretcher",
        }
    }

    fn capability_rank(self) -> u8 {
        match self {
            VehicleClass::Ambulatory => 0,
            VehicleClass::Wheelchair => 1,
            VehicleClass::Stretcher => 2,
        }
    }

    /// How well a vehicle of this class serves a trip requiring `required`.
    pub fn fit_for(self, required: VehicleClass) -> VehicleFit {
        match self.capability_rank().cmp(&required.capability_rank()) {
            std::cmp::Ordering::Equal => VehicleFit::Exact,
            std::cmp::Ordering::Greater => VehicleFit::Superset,
            std::cmp::Ordering::Less => VehicleFit::Mismatch,
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing a driver's vehicle against a trip requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleFit {
    Exact,
    /// The vehicle can serve the trip but is more capable than required.
    Superset,
    Mismatch,
}

impl VehicleFit {
    pub fn can_serve(self) -> bool {
        !matches!(self, VehicleFit::Mismatch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Completed and cancelled trips no longer occupy a driver.
    pub fn is_terminal(self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    OnTrip,
    Offline,
}

impl DriverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::OnTrip => "on_trip",
            DriverStatus::Offline => "offline",
        }
    }
}

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Pickup location: either geocoded or a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Address(String),
    Coordinate(Coordinate),
}

impl Location {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Location::Coordinate(coordinate) => Some(*coordinate),
            Location::Address(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    #[serde(default)]
    pub pickup: Option<Location>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub required_vehicle: Option<VehicleClass>,
    pub status: TripStatus,
    /// Driver the trip is assigned to, if any.
    #[serde(default)]
    pub driver_id: Option<String>,
}

impl Trip {
    /// True when the trip still occupies `driver_id`.
    pub fn is_active_for(&self, driver_id: &str) -> bool {
        !self.status.is_terminal() && self.driver_id.as_deref() == Some(driver_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub status: DriverStatus,
    pub vehicle: VehicleClass,
    /// Last known position; `None` when the GPS feed is stale or missing.
    #[serde(default)]
    pub location: Option<Coordinate>,
    /// Rolling performance signal in `0..=100` (completion rate / rating).
    /// `None` for drivers without enough history; scored neutral.
    #[serde(default)]
    pub performance: Option<f64>,
}
