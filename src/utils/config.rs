use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::{COORDINATE_DECIMALS, EARTH_RADIUS_KM, MAX_HISTORY_SIZE, MOVEMENT_THRESHOLD_KM};

/// Highest rounding precision that still fits in an f64 mantissa
const MAX_DECIMAL_PLACES: u32 = 15;

/// Largest moving-average window accepted
const MAX_HISTORY_LIMIT: usize = 10_000;

/// Tunable parameters for a [`GpsStabilizer`](crate::GpsStabilizer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Minimum movement from the last fix before a sample is accepted (km)
    pub movement_threshold_km: f64,
    /// Number of accepted fixes kept for the moving average
    pub max_history_size: usize,
    /// Decimal places kept on ingestion
    pub decimal_places: u32,
    /// Sphere radius for Haversine distances (km)
    pub earth_radius_km: f64,
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            movement_threshold_km: MOVEMENT_THRESHOLD_KM,
            max_history_size: MAX_HISTORY_SIZE,
            decimal_places: COORDINATE_DECIMALS,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl StabilizerConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate configuration from a JSON string.
    /// Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: StabilizerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn with_movement_threshold_km(mut self, threshold_km: f64) -> Self {
        self.movement_threshold_km = threshold_km;
        self
    }

    pub fn with_max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }

    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = places;
        self
    }

    /// Check every parameter, returning the first violation found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.movement_threshold_km.is_finite() || self.movement_threshold_km < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "movement_threshold_km",
                value: self.movement_threshold_km.to_string(),
                reason: "must be a finite, non-negative distance",
            });
        }

        if self.max_history_size == 0 || self.max_history_size > MAX_HISTORY_LIMIT {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_history_size",
                value: self.max_history_size.to_string(),
                reason: "must hold between 1 and 10000 fixes",
            });
        }

        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::InvalidParameter {
                parameter: "decimal_places",
                value: self.decimal_places.to_string(),
                reason: "must be at most 15",
            });
        }

        if !self.earth_radius_km.is_finite() || self.earth_radius_km <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "earth_radius_km",
                value: self.earth_radius_km.to_string(),
                reason: "must be a finite, positive radius",
            });
        }

        Ok(())
    }
}
