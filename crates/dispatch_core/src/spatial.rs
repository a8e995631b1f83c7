//! Distance models: how far a driver is from a pickup, in miles.
//!
//! This module provides:
//!
//! - **DistanceModel**: the seam the scorer uses to turn two coordinates into miles
//! - **GreatCircle**: plain haversine distance between the raw coordinates
//! - **H3Grid**: coordinates snapped to H3 cells, distance between cell centers,
//!   memoized in an LRU cache so repeated driver/pickup pairs are cheap
//!
//! Resolution 9 (~240m cells) is precise enough for pickup proximity while
//! still collapsing nearby GPS jitter into the same cache key.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use h3o::error::InvalidResolution;
use h3o::{CellIndex, LatLng, Resolution};
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3_958.8;

const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/// Distance between two coordinates, in miles.
///
/// Implementations must be pure with respect to their inputs and return a
/// finite, non-negative value for valid coordinates. Callers validate
/// coordinates before asking.
pub trait DistanceModel: Send + Sync {
    fn distance_miles(&self, from: Coordinate, to: Coordinate) -> f64;
}

/// Haversine distance between raw coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl DistanceModel for GreatCircle {
    fn distance_miles(&self, from: Coordinate, to: Coordinate) -> f64 {
        haversine_miles(from.lat, from.lng, to.lat, to.lng)
    }
}

fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lng1) = (lat1.to_radians(), lng1.to_radians());
    let (lat2, lng2) = (lat2.to_radians(), lng2.to_radians());
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlng = ((lng2 - lng1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Cell-snapped distance with a bounded cache keyed by cell pair.
pub struct H3Grid {
    resolution: Resolution,
    cache: Mutex<LruCache<(CellIndex, CellIndex), f64>>,
}

impl H3Grid {
    pub fn new(resolution: Resolution) -> Self {
        Self::with_capacity(resolution, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(resolution: Resolution, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            resolution,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Snap a coordinate to its containing cell, `None` if h3o rejects it.
    pub fn cell_for(&self, coordinate: Coordinate) -> Option<CellIndex> {
        LatLng::new(coordinate.lat, coordinate.lng)
            .ok()
            .map(|ll| ll.to_cell(self.resolution))
    }

    fn distance_between_cells_uncached(a: CellIndex, b: CellIndex) -> f64 {
        let a: LatLng = a.into();
        let b: LatLng = b.into();
        haversine_miles(a.lat(), a.lng(), b.lat(), b.lng())
    }

    fn distance_between_cells(&self, a: CellIndex, b: CellIndex) -> f64 {
        // Symmetric key so (a, b) and (b, a) share an entry
        let key = if a < b { (a, b) } else { (b, a) };
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(_) => return Self::distance_between_cells_uncached(key.0, key.1),
        };
        *cache.get_or_insert(key, || Self::distance_between_cells_uncached(key.0, key.1))
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl fmt::Debug for H3Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("H3Grid")
            .field("resolution", &self.resolution)
            .field("cached_pairs", &self.cached_pairs())
            .finish()
    }
}

impl Default for H3Grid {
    fn default() -> Self {
        Self::new(Resolution::Nine)
    }
}

impl DistanceModel for H3Grid {
    fn distance_miles(&self, from: Coordinate, to: Coordinate) -> f64 {
        match (self.cell_for(from), self.cell_for(to)) {
            (Some(a), Some(b)) => self.distance_between_cells(a, b),
            _ => haversine_miles(from.lat, from.lng, to.lat, to.lng),
        }
    }
}

/// Which distance model the scorer builds from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DistanceModelKind {
    #[default]
    GreatCircle,
    H3Grid { resolution: u8 },
}

impl DistanceModelKind {
    pub fn build(self) -> Result<Box<dyn DistanceModel>, InvalidResolution> {
        match self {
            DistanceModelKind::GreatCircle => Ok(Box::new(GreatCircle)),
            DistanceModelKind::H3Grid { resolution } => {
                let resolution = Resolution::try_from(resolution)?;
                Ok(Box::new(H3Grid::new(resolution)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Midtown and downtown Manhattan, roughly 3.6 miles apart.
    fn midtown() -> Coordinate {
        Coordinate::new(40.7549, -73.9840)
    }

    fn downtown() -> Coordinate {
        Coordinate::new(40.7075, -74.0113)
    }

    #[test]
    fn great_circle_is_zero_for_same_point() {
        assert_eq!(GreatCircle.distance_miles(midtown(), midtown()), 0.0);
    }

    #[test]
    fn great_circle_matches_known_distance() {
        let miles = GreatCircle.distance_miles(midtown(), downtown());
        assert!((3.0..3.8).contains(&miles), "got {miles}");
    }

    #[test]
    fn h3_grid_approximates_great_circle_and_caches() {
        let grid = H3Grid::default();
        let snapped = grid.distance_miles(midtown(), downtown());
        let exact = GreatCircle.distance_miles(midtown(), downtown());
        assert!((snapped - exact).abs() < 0.5, "snapped={snapped} exact={exact}");

        let again = grid.distance_miles(downtown(), midtown());
        assert_eq!(snapped, again);
        assert_eq!(grid.cached_pairs(), 1);
    }

    #[test]
    fn distance_model_kind_rejects_bad_resolution() {
        assert!(DistanceModelKind::H3Grid { resolution: 16 }.build().is_err());
        assert!(DistanceModelKind::H3Grid { resolution: 9 }.build().is_ok());
    }
}
