use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use gps_stabilizer::{
    ConfigError, Coordinate, CoordinateValidator, FixFormatter, FixReport, GpsStabilizer,
    OutputFormat, SampleStatus, StabilizerConfig, ValidatingStabilizer,
};

const DEFAULT_SESSION: &str = "default";

#[derive(Parser, Debug)]
#[command(about = "Stabilize JSON Lines GPS samples into jitter-free fixes")]
struct Args {
    /// JSON Lines file of samples; reads stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Stabilizer configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text, json or csv
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Decimal places for coordinates in text and csv output
    #[arg(long, default_value_t = 5)]
    precision: usize,

    /// Refuse non-finite and out-of-range samples
    #[arg(long)]
    validate: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// One line of input
#[derive(Debug, Deserialize)]
struct Sample {
    lat: f64,
    lon: f64,
    #[serde(default)]
    session: Option<String>,
    /// Treat the sample as an authoritative manual position
    #[serde(default)]
    force: bool,
}

impl Sample {
    fn session_id(&self) -> &str {
        self.session.as_deref().unwrap_or(DEFAULT_SESSION)
    }
}

enum Tracker {
    Plain(GpsStabilizer),
    Validating(ValidatingStabilizer),
}

impl Tracker {
    fn process(&mut self, sample: &Sample) -> (SampleStatus, Option<f64>) {
        match self {
            Tracker::Plain(stabilizer) => {
                if sample.force {
                    stabilizer.force_update(sample.lat, sample.lon);
                    return (SampleStatus::Forced, None);
                }
                let (_, outcome) = stabilizer.observe(sample.lat, sample.lon);
                (SampleStatus::from(&outcome), outcome.distance_km())
            }
            Tracker::Validating(stabilizer) => {
                if sample.force {
                    return match stabilizer.force_update(sample.lat, sample.lon) {
                        Ok(()) => (SampleStatus::Forced, None),
                        Err(_) => (SampleStatus::Invalid, None),
                    };
                }
                match stabilizer.observe(sample.lat, sample.lon) {
                    Ok((_, outcome)) => (SampleStatus::from(&outcome), outcome.distance_km()),
                    Err(_) => (SampleStatus::Invalid, None),
                }
            }
        }
    }

    fn stabilizer(&self) -> &GpsStabilizer {
        match self {
            Tracker::Plain(stabilizer) => stabilizer,
            Tracker::Validating(stabilizer) => stabilizer.inner(),
        }
    }
}

/// One stabilizer per session, created on first use, ordered by session id
struct SessionRegistry {
    /// Empty stabilizer cloned for each new session
    template: GpsStabilizer,
    validate: bool,
    sessions: BTreeMap<String, Tracker>,
}

impl SessionRegistry {
    fn new(config: StabilizerConfig, validate: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            template: GpsStabilizer::with_config(config)?,
            validate,
            sessions: BTreeMap::new(),
        })
    }

    fn tracker(&mut self, session: &str) -> &mut Tracker {
        let template = &self.template;
        let validate = self.validate;
        self.sessions.entry(session.to_string()).or_insert_with(|| {
            debug!(session, "new session");
            let stabilizer = template.clone();
            if validate {
                Tracker::Validating(ValidatingStabilizer::new(CoordinateValidator::new(), stabilizer))
            } else {
                Tracker::Plain(stabilizer)
            }
        })
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let config = match &args.config {
        Some(path) => StabilizerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StabilizerConfig::default(),
    };
    info!(
        threshold_km = config.movement_threshold_km,
        history = config.max_history_size,
        validate = args.validate,
        "starting stabilizer"
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };

    let formatter = FixFormatter::new()
        .with_format(args.format)
        .with_precision(args.precision);
    let mut out = BufWriter::new(io::stdout().lock());
    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }

    let mut registry = SessionRegistry::new(config, args.validate)?;
    let mut sequence: u64 = 0;
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }

        let sample: Sample = match serde_json::from_str(&line) {
            Ok(sample) => sample,
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping malformed sample");
                skipped += 1;
                continue;
            }
        };

        let session = sample.session_id();
        let tracker = registry.tracker(session);
        let (status, distance_km) = tracker.process(&sample);

        let report = FixReport::capture(
            sequence,
            session,
            Coordinate::new(sample.lat, sample.lon),
            status,
            distance_km,
            tracker.stabilizer(),
        );
        writeln!(out, "{}", formatter.format(&report)?)?;
        sequence += 1;
    }
    out.flush()?;

    for (session, tracker) in &registry.sessions {
        let stabilizer = tracker.stabilizer();
        info!(
            session = session.as_str(),
            fix = ?stabilizer.last_accepted(),
            smoothed = %stabilizer.get_smoothed(),
            history = stabilizer.history_len(),
            "session summary"
        );
    }
    info!(samples = sequence, skipped, "done");

    Ok(())
}
