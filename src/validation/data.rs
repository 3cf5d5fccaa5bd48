use thiserror::Error;
use tracing::warn;

use crate::core::Coordinate;
use crate::processing::stabilizer::{GpsStabilizer, StabilizeOutcome};

/// Bounds checked by the validator
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Largest accepted absolute latitude (degrees)
    pub max_abs_latitude: f64,
    /// Largest accepted absolute longitude (degrees)
    pub max_abs_longitude: f64,
    /// Reject the exact origin, which many sensors report when they have no fix
    pub reject_null_island: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_abs_latitude: 90.0,
            max_abs_longitude: 180.0,
            reject_null_island: false,
        }
    }
}

/// Reasons a raw sample can be refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{axis} is not a finite number: {value}")]
    NonFinite { axis: &'static str, value: f64 },
    #[error("latitude {lat} outside ±{limit} degrees")]
    LatitudeOutOfRange { lat: f64, limit: f64 },
    #[error("longitude {lon} outside ±{limit} degrees")]
    LongitudeOutOfRange { lon: f64, limit: f64 },
    #[error("sample at (0, 0) looks like a missing fix")]
    NullIsland,
}

/// Range checks for raw latitude/longitude samples
#[derive(Debug, Clone, Default)]
pub struct CoordinateValidator {
    config: ValidationConfig,
}

impl CoordinateValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, lat: f64, lon: f64) -> Result<Coordinate, ValidationError> {
        if !lat.is_finite() {
            return Err(ValidationError::NonFinite { axis: "latitude", value: lat });
        }
        if !lon.is_finite() {
            return Err(ValidationError::NonFinite { axis: "longitude", value: lon });
        }
        if lat.abs() > self.config.max_abs_latitude {
            return Err(ValidationError::LatitudeOutOfRange {
                lat,
                limit: self.config.max_abs_latitude,
            });
        }
        if lon.abs() > self.config.max_abs_longitude {
            return Err(ValidationError::LongitudeOutOfRange {
                lon,
                limit: self.config.max_abs_longitude,
            });
        }
        if self.config.reject_null_island && lat == 0.0 && lon == 0.0 {
            return Err(ValidationError::NullIsland);
        }

        Ok(Coordinate::new(lat, lon))
    }
}

/// A [`GpsStabilizer`] that refuses invalid samples before they reach it.
///
/// Refused samples leave the stabilizer untouched. The unwrapped stabilizer
/// keeps its total behaviour.
#[derive(Debug, Clone, Default)]
pub struct ValidatingStabilizer {
    validator: CoordinateValidator,
    inner: GpsStabilizer,
    rejected_count: u64,
}

impl ValidatingStabilizer {
    pub fn new(validator: CoordinateValidator, inner: GpsStabilizer) -> Self {
        Self {
            validator,
            inner,
            rejected_count: 0,
        }
    }

    pub fn stabilize(&mut self, lat: f64, lon: f64) -> Result<Coordinate, ValidationError> {
        self.observe(lat, lon).map(|(fix, _)| fix)
    }

    pub fn observe(
        &mut self,
        lat: f64,
        lon: f64,
    ) -> Result<(Coordinate, StabilizeOutcome), ValidationError> {
        let sample = self.check(lat, lon)?;
        Ok(self.inner.observe(sample.lat, sample.lon))
    }

    pub fn force_update(&mut self, lat: f64, lon: f64) -> Result<(), ValidationError> {
        let sample = self.check(lat, lon)?;
        self.inner.force_update(sample.lat, sample.lon);
        Ok(())
    }

    fn check(&mut self, lat: f64, lon: f64) -> Result<Coordinate, ValidationError> {
        self.validator.validate(lat, lon).map_err(|err| {
            self.rejected_count += 1;
            warn!(lat, lon, error = %err, "sample refused");
            err
        })
    }

    /// Number of samples refused since construction
    pub fn rejected_count(&self) -> u64 {
        self.rejected_count
    }

    pub fn inner(&self) -> &GpsStabilizer {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut GpsStabilizer {
        &mut self.inner
    }

    pub fn into_inner(self) -> GpsStabilizer {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sample() {
        let validator = CoordinateValidator::new();
        assert_eq!(validator.validate(12.5, -77.25), Ok(Coordinate::new(12.5, -77.25)));
        assert!(validator.validate(90.0, 180.0).is_ok());
        assert!(validator.validate(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let validator = CoordinateValidator::new();
        assert!(matches!(
            validator.validate(90.5, 0.0),
            Err(ValidationError::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            validator.validate(0.0, -181.0),
            Err(ValidationError::LongitudeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_finite() {
        let validator = CoordinateValidator::new();
        assert!(matches!(
            validator.validate(f64::NAN, 0.0),
            Err(ValidationError::NonFinite { axis: "latitude", .. })
        ));
        assert!(matches!(
            validator.validate(0.0, f64::INFINITY),
            Err(ValidationError::NonFinite { axis: "longitude", .. })
        ));
    }

    #[test]
    fn test_null_island_optional() {
        assert!(CoordinateValidator::new().validate(0.0, 0.0).is_ok());

        let strict = CoordinateValidator::with_config(ValidationConfig {
            reject_null_island: true,
            ..ValidationConfig::default()
        });
        assert_eq!(strict.validate(0.0, 0.0), Err(ValidationError::NullIsland));
    }

    #[test]
    fn test_refused_sample_leaves_state_untouched() {
        let mut stabilizer = ValidatingStabilizer::default();
        stabilizer.stabilize(12.0, 77.0).unwrap();

        assert!(stabilizer.stabilize(120.0, 77.0).is_err());
        assert!(stabilizer.force_update(f64::NAN, 0.0).is_err());

        assert_eq!(stabilizer.inner().last_accepted(), Some(Coordinate::new(12.0, 77.0)));
        assert_eq!(stabilizer.inner().history_len(), 1);
        assert_eq!(stabilizer.rejected_count(), 2);
    }

    #[test]
    fn test_valid_samples_pass_through() {
        let mut stabilizer = ValidatingStabilizer::default();
        stabilizer.stabilize(12.0, 77.0).unwrap();

        let (fix, outcome) = stabilizer.observe(12.001, 77.001).unwrap();
        assert_eq!(fix, Coordinate::new(12.001, 77.001));
        assert!(outcome.is_accepted());

        stabilizer.force_update(5.0, 5.0).unwrap();
        assert_eq!(stabilizer.into_inner().last_accepted(), Some(Coordinate::new(5.0, 5.0)));
    }
}
