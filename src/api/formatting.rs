//! Fix report output formatting
//!
//! Reports can be rendered as human-readable text, JSON lines or CSV rows.

use crate::api::types::{FixReport, OutputFormat};

/// Renders [`FixReport`]s in a chosen [`OutputFormat`]
#[derive(Debug, Clone)]
pub struct FixFormatter {
    pub format: OutputFormat,
    /// Decimal places for coordinates in text and CSV output
    pub precision: usize,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for FixFormatter {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            precision: 5,
            pretty: false,
        }
    }
}

impl FixFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Header line to emit before the first report, if the format has one
    pub fn header(&self) -> Option<String> {
        match self.format {
            OutputFormat::Csv => Some(
                "sequence,session,raw_lat,raw_lon,status,distance_km,fix_lat,fix_lon,smoothed_lat,smoothed_lon,history_len"
                    .to_string(),
            ),
            OutputFormat::Text | OutputFormat::Json => None,
        }
    }

    pub fn format(&self, report: &FixReport) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Text => Ok(self.format_text(report)),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Csv => Ok(self.format_csv(report)),
        }
    }

    fn format_text(&self, report: &FixReport) -> String {
        let p = self.precision;
        let fix = match report.fix {
            Some(fix) => format!("{:.p$}, {:.p$}", fix.lat, fix.lon),
            None => "none".to_string(),
        };
        let distance = match report.distance_km {
            Some(d) => format!(" ({:.1} m)", d * 1000.0),
            None => String::new(),
        };

        format!(
            "#{} [{}] raw {:.p$}, {:.p$} -> {}{} | fix {} | smoothed {:.p$}, {:.p$} | history {}",
            report.sequence_number,
            report.session,
            report.raw.lat,
            report.raw.lon,
            report.status,
            distance,
            fix,
            report.smoothed.lat,
            report.smoothed.lon,
            report.history_len,
        )
    }

    fn format_json(&self, report: &FixReport) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }

    fn format_csv(&self, report: &FixReport) -> String {
        let p = self.precision;
        let (fix_lat, fix_lon) = match report.fix {
            Some(fix) => (format!("{:.p$}", fix.lat), format!("{:.p$}", fix.lon)),
            None => (String::new(), String::new()),
        };
        let distance = report
            .distance_km
            .map(|d| format!("{:.6}", d))
            .unwrap_or_default();

        format!(
            "{},{},{:.p$},{:.p$},{},{},{},{},{:.p$},{:.p$},{}",
            report.sequence_number,
            escape_csv(&report.session),
            report.raw.lat,
            report.raw.lon,
            report.status,
            distance,
            fix_lat,
            fix_lon,
            report.smoothed.lat,
            report.smoothed.lon,
            report.history_len,
        )
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
