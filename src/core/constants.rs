//! Physical constants and stabilizer parameters

/// Mean Earth radius used by the Haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minimum movement from the last fix before a new sample is accepted (km)
pub const MOVEMENT_THRESHOLD_KM: f64 = 0.05;

/// Number of accepted fixes kept for the moving average
pub const MAX_HISTORY_SIZE: usize = 5;

/// Decimal places kept on ingestion (5 places is roughly 1.1 m)
pub const COORDINATE_DECIMALS: u32 = 5;
