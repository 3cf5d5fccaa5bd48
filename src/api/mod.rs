//! Reporting API
//!
//! Snapshots of stabilizer state after each sample, and formatters that turn
//! them into text, JSON or CSV.

pub mod types;
pub mod formatting;

pub use types::{FixReport, OutputFormat, SampleStatus};
pub use formatting::FixFormatter;
