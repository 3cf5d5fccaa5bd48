//! GPS Coordinate Stabilizer
//!
//! Smooths jittery geolocation readings with distance-threshold gating and a
//! bounded moving-average history of accepted fixes.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{Coordinate, EARTH_RADIUS_KM, MAX_HISTORY_SIZE, MOVEMENT_THRESHOLD_KM};
pub use algorithms::geodesy::{haversine_distance_km, round_to_decimals};
pub use processing::{GpsStabilizer, StabilizeOutcome};
pub use validation::{CoordinateValidator, ValidatingStabilizer, ValidationConfig, ValidationError};
pub use utils::{ConfigError, StabilizerConfig};
pub use api::{FixFormatter, FixReport, OutputFormat, SampleStatus};
