//! Stateful location filters

pub mod stabilizer;

pub use stabilizer::{GpsStabilizer, StabilizeOutcome};
