//! Spherical geodesy helpers
//!
//! Distances are computed on a sphere with the Haversine formula. Latitude and
//! longitude degrees are not uniformly spaced in physical distance, so planar
//! differences on raw degrees are never used for gating.

use crate::core::Coordinate;

/// Great-circle distance between two coordinates (km)
pub fn haversine_distance_km(from: &Coordinate, to: &Coordinate, earth_radius_km: f64) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    earth_radius_km * c
}

/// Round half-up to `places` decimal places.
///
/// Halves round toward positive infinity (`-2.5` becomes `-2`), so a point and
/// its mirror image across the equator may round one unit apart. Negative
/// values that round to zero keep their sign (`-0.0`).
pub fn round_to_decimals(value: f64, places: u32) -> f64 {
    let multiplier = 10_f64.powi(places as i32);
    let rounded = (value * multiplier + 0.5).floor() / multiplier;
    if rounded == 0.0 {
        rounded.copysign(value)
    } else {
        rounded
    }
}
