//! Optional input hardening
//!
//! The stabilizer itself never range-checks its input. Wrap it in a
//! [`ValidatingStabilizer`] to refuse non-finite or out-of-range samples.

pub mod data;

pub use data::{CoordinateValidator, ValidatingStabilizer, ValidationConfig, ValidationError};
