use nalgebra::Vector2;
use std::collections::VecDeque;
use tracing::debug;

use crate::algorithms::geodesy::haversine_distance_km;
use crate::core::Coordinate;
use crate::utils::config::{ConfigError, StabilizerConfig};

/// Distance-gated GPS stabilizer with a bounded moving-average history.
///
/// Raw samples are rounded on ingestion, then accepted only when they lie
/// further than the movement threshold from the last accepted fix. Rejected
/// samples never reach the history or the returned fix.
///
/// The stabilizer owns its state and is driven through `&mut self`; callers
/// feeding it from an asynchronous sensor must serialize their calls.
#[derive(Debug, Clone)]
pub struct GpsStabilizer {
    config: StabilizerConfig,
    /// Most recently accepted fix
    last_accepted: Option<Coordinate>,
    /// Accepted fixes, oldest first
    history: VecDeque<Coordinate>,
}

/// What a single call to [`GpsStabilizer::observe`] did with its sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilizeOutcome {
    /// First sample after construction or reset, accepted unconditionally
    Initial,
    /// Sample moved past the threshold and became the new fix
    Accepted { distance_km: f64 },
    /// Sample stayed within the threshold and was dropped
    Rejected { distance_km: f64 },
}

impl StabilizeOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, StabilizeOutcome::Rejected { .. })
    }

    /// Distance from the previous fix, if there was one
    pub fn distance_km(&self) -> Option<f64> {
        match self {
            StabilizeOutcome::Initial => None,
            StabilizeOutcome::Accepted { distance_km } | StabilizeOutcome::Rejected { distance_km } => {
                Some(*distance_km)
            }
        }
    }
}

impl Default for GpsStabilizer {
    fn default() -> Self {
        Self::from_valid_config(StabilizerConfig::default())
    }
}

impl GpsStabilizer {
    /// Create a stabilizer with the default 50 m threshold and 5-fix window
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stabilizer with custom parameters.
    ///
    /// Fails when the config would let the fix drift out of the history,
    /// e.g. a zero-sized window.
    pub fn with_config(config: StabilizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: StabilizerConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.max_history_size + 1),
            last_accepted: None,
            config,
        }
    }

    /// Feed a raw sample and return the current fix.
    ///
    /// The returned coordinate is the state after this call: the rounded
    /// sample if it was accepted, otherwise the previous fix.
    pub fn stabilize(&mut self, lat: f64, lon: f64) -> Coordinate {
        self.observe(lat, lon).0
    }

    /// Feed a raw sample, returning the current fix together with what
    /// happened to the sample
    pub fn observe(&mut self, lat: f64, lon: f64) -> (Coordinate, StabilizeOutcome) {
        let candidate = Coordinate::rounded_to(lat, lon, self.config.decimal_places);

        let last = match self.last_accepted {
            Some(last) => last,
            None => {
                debug!(lat = candidate.lat, lon = candidate.lon, "initial fix");
                self.accept(candidate);
                return (candidate, StabilizeOutcome::Initial);
            }
        };

        let distance_km = haversine_distance_km(&last, &candidate, self.config.earth_radius_km);

        // NaN distances compare false and are rejected
        if distance_km > self.config.movement_threshold_km {
            debug!(lat = candidate.lat, lon = candidate.lon, distance_km, "fix accepted");
            self.accept(candidate);
            (candidate, StabilizeOutcome::Accepted { distance_km })
        } else {
            debug!(lat = candidate.lat, lon = candidate.lon, distance_km, "sample within threshold");
            (last, StabilizeOutcome::Rejected { distance_km })
        }
    }

    fn accept(&mut self, fix: Coordinate) {
        self.last_accepted = Some(fix);
        self.history.push_back(fix);

        while self.history.len() > self.config.max_history_size {
            self.history.pop_front();
        }
    }

    /// Moving average over the history, or the origin when there is no fix.
    ///
    /// The `(0, 0)` fallback is kept for callers that never check for a
    /// missing fix; use [`try_smoothed`](Self::try_smoothed) to tell them apart.
    pub fn get_smoothed(&self) -> Coordinate {
        self.try_smoothed().unwrap_or(Coordinate::ORIGIN)
    }

    /// Moving average over the history, `None` before the first fix
    pub fn try_smoothed(&self) -> Option<Coordinate> {
        if self.history.is_empty() {
            return self.last_accepted;
        }

        let sum = self
            .history
            .iter()
            .fold(Vector2::zeros(), |acc, c| acc + Vector2::new(c.lat, c.lon));
        let mean = sum / self.history.len() as f64;

        Some(Coordinate::rounded_to(mean.x, mean.y, self.config.decimal_places))
    }

    /// Replace the fix with an authoritative position, ignoring the threshold.
    /// History is reset to this single point.
    pub fn force_update(&mut self, lat: f64, lon: f64) {
        let fix = Coordinate::rounded_to(lat, lon, self.config.decimal_places);
        debug!(lat = fix.lat, lon = fix.lon, "forced fix");

        self.last_accepted = Some(fix);
        self.history.clear();
        self.history.push_back(fix);
    }

    /// Return to the empty state
    pub fn reset(&mut self) {
        debug!("stabilizer reset");
        self.last_accepted = None;
        self.history.clear();
    }

    pub fn last_accepted(&self) -> Option<Coordinate> {
        self.last_accepted
    }

    /// Accepted fixes, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Coordinate> + '_ {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether at least one fix has been accepted since construction or reset
    pub fn is_tracking(&self) -> bool {
        self.last_accepted.is_some()
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }
}
