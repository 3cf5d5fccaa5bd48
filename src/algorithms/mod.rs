//! Geodesy algorithms

pub mod geodesy;

pub use geodesy::{haversine_distance_km, round_to_decimals};
