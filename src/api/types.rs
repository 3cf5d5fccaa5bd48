//! Report types shared by the formatters and the command-line tool

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::Coordinate;
use crate::processing::stabilizer::{GpsStabilizer, StabilizeOutcome};

/// What happened to one raw sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    Initial,
    Accepted,
    Rejected,
    Forced,
    /// Refused by the validation layer before reaching the stabilizer
    Invalid,
}

impl From<&StabilizeOutcome> for SampleStatus {
    fn from(outcome: &StabilizeOutcome) -> Self {
        match outcome {
            StabilizeOutcome::Initial => SampleStatus::Initial,
            StabilizeOutcome::Accepted { .. } => SampleStatus::Accepted,
            StabilizeOutcome::Rejected { .. } => SampleStatus::Rejected,
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleStatus::Initial => "initial",
            SampleStatus::Accepted => "accepted",
            SampleStatus::Rejected => "rejected",
            SampleStatus::Forced => "forced",
            SampleStatus::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Snapshot of a stabilizer after processing one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixReport {
    pub sequence_number: u64,
    pub session: String,
    /// Sample as received, before rounding
    pub raw: Coordinate,
    pub status: SampleStatus,
    /// Distance from the previous fix (km), when one existed
    pub distance_km: Option<f64>,
    /// Current fix, absent before the first accepted sample
    pub fix: Option<Coordinate>,
    pub smoothed: Coordinate,
    pub history_len: usize,
}

impl FixReport {
    /// Build a report from the stabilizer state after a sample was processed
    pub fn capture(
        sequence_number: u64,
        session: impl Into<String>,
        raw: Coordinate,
        status: SampleStatus,
        distance_km: Option<f64>,
        stabilizer: &GpsStabilizer,
    ) -> Self {
        Self {
            sequence_number,
            session: session.into(),
            raw,
            status,
            distance_km,
            fix: stabilizer.last_accepted(),
            smoothed: stabilizer.get_smoothed(),
            history_len: stabilizer.history_len(),
        }
    }
}

/// Output encodings supported by [`FixFormatter`](super::FixFormatter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{other}' (expected text, json or csv)")),
        }
    }
}
