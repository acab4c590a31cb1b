//! Gait CLI - Command-line interface for Gait Flux
//!
//! Commands:
//! - analyze: Score recording sessions (one JSON document or NDJSON lines)
//! - validate: Check recording sessions for data quality problems
//! - synth: Generate a synthetic walking session for demos and smoke tests

use clap::{Parser, Subcommand, ValueEnum};
use std::f64::consts::PI;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gait_flux::config::AnalysisConfig;
use gait_flux::pipeline::{parse_session, validate_session, GaitAnalyzer, SessionReport};
use gait_flux::types::{GaitScore, RecordingMode, RecordingSession, SensorSample};
use gait_flux::{GaitError, GAIT_FLUX_VERSION};
use tracing_subscriber::EnvFilter;

/// Gait - On-device engine for gait stability and rhythm scoring
#[derive(Parser)]
#[command(name = "gait")]
#[command(version = GAIT_FLUX_VERSION)]
#[command(about = "Score accelerometer recordings for gait stability and rhythm")]
#[command(long_about = None)]
struct Cli {
    /// Log analysis details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score recording sessions
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Force a sampling rate in Hz instead of the session hint
        #[arg(long)]
        sampling_rate: Option<f64>,

        /// Load analysis parameters from a JSON file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check recording sessions for data quality problems
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a synthetic walking session
    Synth {
        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Step frequency in Hz
        #[arg(long, default_value = "2.0")]
        step_hz: f64,

        /// Recording length in seconds
        #[arg(long, default_value = "30")]
        seconds: f64,

        /// Sampling rate in Hz
        #[arg(long, default_value = "100")]
        rate: f64,

        /// Vertical bounce amplitude in m/s²
        #[arg(long, default_value = "1.5")]
        amplitude: f64,

        /// Recording mode tag
        #[arg(long, default_value = "walking")]
        mode: ModeArg,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// A single session JSON document
    Json,
    /// Newline-delimited JSON (one session per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one score per line)
    Ndjson,
    /// JSON array of scores
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum ModeArg {
    Walking,
    Balance,
    Standing,
}

impl From<ModeArg> for RecordingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Walking => RecordingMode::Walking,
            ModeArg::Balance => RecordingMode::Balance,
            ModeArg::Standing => RecordingMode::Standing,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), GaitCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            input_format,
            output_format,
            sampling_rate,
            config,
        } => cmd_analyze(
            &input,
            &output,
            input_format,
            output_format,
            sampling_rate,
            config.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Synth {
            output,
            step_hz,
            seconds,
            rate,
            amplitude,
            mode,
        } => cmd_synth(&output, step_hz, seconds, rate, amplitude, mode.into()),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    sampling_rate: Option<f64>,
    config_path: Option<&Path>,
) -> Result<(), GaitCliError> {
    let mut config = config_path
        .map(AnalysisConfig::load_from_file)
        .unwrap_or_default();
    if sampling_rate.is_some() {
        config.sampling_rate_hz = sampling_rate;
    }
    let analyzer = GaitAnalyzer::with_config(config)?;

    let sessions = read_sessions(input, &input_format)?;
    if sessions.is_empty() {
        return Err(GaitCliError::NoSessions);
    }

    let scores: Vec<GaitScore> = sessions.iter().map(|s| analyzer.analyze(s)).collect();
    for score in scores.iter().filter(|s| s.is_insufficient()) {
        log::warn!("Session {} has insufficient data for scoring", score.session_id);
    }

    write_output(output, &format_output(&scores, &output_format)?)
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), GaitCliError> {
    let sessions = read_sessions(input, &input_format)?;
    let reports: Vec<SessionReport> = sessions.iter().map(validate_session).collect();
    let invalid = reports.iter().filter(|r| !r.is_valid()).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("Validation Report");
        println!("=================");
        for report in &reports {
            println!(
                "Session {}: {} samples, {:.1} s, rate {}",
                report.session_id,
                report.sample_count,
                report.duration_sec,
                report
                    .estimated_sampling_rate_hz
                    .map(|r| format!("{:.1} Hz", r))
                    .unwrap_or_else(|| "unknown".to_string())
            );
            for issue in &report.issues {
                println!("  - {}", issue);
            }
        }
        println!("\nTotal sessions:   {}", reports.len());
        println!("Invalid sessions: {}", invalid);
    }

    if invalid > 0 {
        Err(GaitCliError::ValidationFailed(invalid))
    } else {
        Ok(())
    }
}

fn cmd_synth(
    output: &Path,
    step_hz: f64,
    seconds: f64,
    rate: f64,
    amplitude: f64,
    mode: RecordingMode,
) -> Result<(), GaitCliError> {
    if !(rate > 0.0 && seconds > 0.0 && step_hz > 0.0) {
        return Err(GaitCliError::InvalidArgument(
            "step-hz, seconds and rate must be positive".to_string(),
        ));
    }

    let n = (rate * seconds) as usize;
    let samples: Vec<SensorSample> = (0..n)
        .map(|i| {
            let t = i as f64 / rate;
            let phase = 2.0 * PI * step_hz * t;
            SensorSample::new(
                (t * 1000.0).round() as i64,
                0.2 * (phase / 2.0).sin(),
                0.3 * (phase / 2.0).cos(),
                9.81 + amplitude * phase.cos(),
            )
        })
        .collect();

    let mut session = RecordingSession::new(mode, samples);
    session.sampling_rate_hz = Some(rate);

    write_output(output, &(serde_json::to_string(&session)? + "\n"))
}

fn read_input(input: &Path) -> Result<String, GaitCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(GaitCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_sessions(
    input: &Path,
    input_format: &InputFormat,
) -> Result<Vec<RecordingSession>, GaitCliError> {
    let data = read_input(input)?;
    match input_format {
        InputFormat::Json => Ok(vec![parse_session(&data)?]),
        InputFormat::Ndjson => data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| parse_session(line).map_err(GaitCliError::from))
            .collect(),
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), GaitCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn format_output(scores: &[GaitScore], format: &OutputFormat) -> Result<String, GaitCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for score in scores {
                lines.push(serde_json::to_string(score)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(scores)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(scores)?),
    }
}

#[derive(Debug)]
enum GaitCliError {
    Io(io::Error),
    Gait(GaitError),
    Json(serde_json::Error),
    NoInput,
    NoSessions,
    ValidationFailed(usize),
    InvalidArgument(String),
}

impl From<io::Error> for GaitCliError {
    fn from(e: io::Error) -> Self {
        GaitCliError::Io(e)
    }
}

impl From<GaitError> for GaitCliError {
    fn from(e: GaitError) -> Self {
        GaitCliError::Gait(e)
    }
}

impl From<serde_json::Error> for GaitCliError {
    fn from(e: serde_json::Error) -> Self {
        GaitCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<GaitCliError> for CliError {
    fn from(e: GaitCliError) -> Self {
        match e {
            GaitCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            GaitCliError::Gait(e) => {
                let hint = match &e {
                    GaitError::ConfigError(_) => "Check the analysis configuration values",
                    GaitError::ParseError(_) | GaitError::JsonError(_) => {
                        "Ensure input is a recording session with a samples array"
                    }
                    GaitError::EncodingError(_) => "The score could not be encoded as JSON",
                    GaitError::InvalidInput(_) | GaitError::InsufficientPeaks { .. } => {
                        "Run 'gait validate' on the input for details"
                    }
                };
                CliError {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            GaitCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            GaitCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a terminal and no input was piped".to_string(),
                hint: Some("Pipe a session in or pass --input <file>".to_string()),
            },
            GaitCliError::NoSessions => CliError {
                code: "NO_SESSIONS".to_string(),
                message: "No sessions found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            GaitCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} session(s) failed validation", count),
                hint: Some("Run 'gait validate' without --json for details".to_string()),
            },
            GaitCliError::InvalidArgument(msg) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message: msg,
                hint: None,
            },
        }
    }
}
