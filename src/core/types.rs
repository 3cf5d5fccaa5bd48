//! Core data types for the stabilizer

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::algorithms::geodesy::{haversine_distance_km, round_to_decimals};
use super::constants::{COORDINATE_DECIMALS, EARTH_RADIUS_KM};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { lat: 0.0, lon: 0.0 };

    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Round both components to the default ingestion precision
    pub fn rounded(lat: f64, lon: f64) -> Self {
        Self::rounded_to(lat, lon, COORDINATE_DECIMALS)
    }

    /// Round both components to `places` decimal places
    pub fn rounded_to(lat: f64, lon: f64, places: u32) -> Self {
        Self {
            lat: round_to_decimals(lat, places),
            lon: round_to_decimals(lon, places),
        }
    }

    /// Great-circle distance to `other` in kilometers
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_distance_km(self, other, EARTH_RADIUS_KM)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}
