//! rawcp - Raw Copy
//!
//! Write a disk image to a device (or any file to any other) and verify
//! the result, powered by rawcopy.

use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use rawcopy::{
    CopyOptions, CopyResult, Error as RawcopyError, ImageReport, TargetMode,
    copy_image_with_progress, create_progress_bar,
};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// rawcp - Write images to devices and verify them
///
/// Copies raw bytes from SOURCE to TARGET, then hashes both sides with
/// SHA-256 over exactly the bytes copied and compares the checksums.
/// TARGET may be larger than SOURCE (e.g. a USB stick); trailing device
/// capacity is never hashed.
///
/// Exit status: 0 success, 1 invalid input, 2 copy failed,
/// 3 checksums do not match, 4 verification failed.
#[derive(Parser, Debug)]
#[command(name = "rawcp", version, about, long_about = None)]
struct Args {
    /// The source image file or device
    #[arg(short = 's', long)]
    source: PathBuf,

    /// The target device or image file
    #[arg(short = 't', long)]
    target: PathBuf,

    /// Buffer size in kilobytes
    #[arg(short = 'b', long = "buffer-size", value_name = "KIB", default_value_t = 1024)]
    buffer_size: usize,

    /// Skip checksum creation and comparison
    #[arg(long = "no-verify", alias = "nocheck")]
    no_verify: bool,

    /// What to do when the target already exists
    #[arg(short = 'e', long, value_enum, default_value = "overwrite")]
    on_existing: ExistingStrategy,

    /// Do not sync the target to disk before verifying
    #[arg(long)]
    no_sync: bool,

    /// Don't show progress
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Verbose output (debug logging, timing)
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExistingStrategy {
    /// Write over the existing file or device in place (default)
    Overwrite,
    /// Truncate an existing file first
    Truncate,
    /// Fail if the target exists
    Error,
}

impl From<ExistingStrategy> for TargetMode {
    fn from(s: ExistingStrategy) -> Self {
        match s {
            ExistingStrategy::Overwrite => TargetMode::Overwrite,
            ExistingStrategy::Truncate => TargetMode::Truncate,
            ExistingStrategy::Error => TargetMode::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Image(#[from] RawcopyError),

    #[error("Checksums do not match: source {source_digest}, target {target_digest}")]
    ChecksumMismatch {
        source_digest: String,
        target_digest: String,
    },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Image(source) => source.code().as_str(),
            Self::ChecksumMismatch { .. } => "checksum_mismatch",
            Self::JsonSerialize { .. } => "internal",
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Image(source) if source.code() == rawcopy::ErrorCode::InvalidInput => 1,
            Self::Image(source) if source.is_verification_error() => 4,
            Self::Image(_) | Self::JsonSerialize { .. } => 2,
            Self::ChecksumMismatch { .. } => 3,
        }
    }

    /// Whether the outcome was already printed as part of the report.
    fn is_reported(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. })
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) if !error.use_stderr() => error.exit(),
        Err(error) => {
            let _ = error.print();
            std::process::exit(1);
        }
    };

    init_tracing(args.verbose);

    if let Err(error) = run(&args) {
        match args.output {
            OutputMode::Human => {
                eprintln!("error[{}]: {}", error.code(), error);
                if error.is_reported() {
                    eprintln!(
                        "This means that something went wrong, or that your input has \
                         changed since the start of this program."
                    );
                }
            }
            OutputMode::Json if !error.is_reported() => {
                let payload = failure_json(&args, &error);
                if let Ok(serialized) = serde_json::to_string(&payload) {
                    println!("{serialized}");
                }
            }
            OutputMode::Json => {}
        }
        std::process::exit(error.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "rawcopy=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> CliResult<()> {
    let options = build_options(args);

    let pb = if args.output == OutputMode::Human && !args.quiet {
        // Block devices report a length of zero; the bar falls back to a spinner
        let total = args.source.metadata().map(|m| m.len()).unwrap_or(0);
        let pb = create_progress_bar(total);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = copy_image_with_progress(&args.source, &args.target, &options, |copied| {
        report_progress(pb.as_ref(), copied);
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = result?;

    match args.output {
        OutputMode::Human => print_report(args, &report),
        OutputMode::Json => print_json_value(&report_json(args, &report)?)?,
    }

    if let Some(verification) = report.verification.filter(|v| !v.matches) {
        return Err(CliError::ChecksumMismatch {
            source_digest: verification.source_digest.to_hex(),
            target_digest: verification.target_digest.to_hex(),
        });
    }

    Ok(())
}

fn build_options(args: &Args) -> CopyOptions {
    let mut options = CopyOptions::default()
        .with_buffer_size_kib(args.buffer_size)
        .with_target_mode(args.on_existing.into());

    if args.no_verify {
        options = options.without_verify();
    }
    if args.no_sync {
        options = options.without_fsync();
    }

    options
}

fn report_progress(pb: Option<&ProgressBar>, copied: CopyResult) {
    if let Some(pb) = pb {
        pb.set_position(copied.bytes_written);
    }
}

fn print_report(args: &Args, report: &ImageReport) {
    println!(
        "Copied {} ({} bytes read, {} bytes written)",
        format_bytes(report.copy.bytes_written),
        report.copy.bytes_read,
        report.copy.bytes_written
    );

    match report.verification {
        Some(verification) => {
            println!(
                "{}  {}",
                verification.source_digest,
                display_path(&args.source)
            );
            println!(
                "{}  {}",
                verification.target_digest,
                display_path(&args.target)
            );
            if verification.matches {
                println!("checksums match");
            } else {
                println!("checksums do NOT match");
            }
        }
        None => println!("Verification skipped"),
    }

    if args.verbose {
        println!("Completed in {:?}", report.duration);
        let secs = report.duration.as_secs_f64();
        if secs > 0.0 {
            let speed = report.copy.bytes_written as f64 / secs;
            println!("Speed: {}/s", format_bytes(speed as u64));
        }
    }
}

fn outcome(report: &ImageReport) -> &'static str {
    match report.verification {
        Some(v) if v.matches => "verified",
        Some(_) => "mismatch",
        None => "copied",
    }
}

fn report_json(args: &Args, report: &ImageReport) -> CliResult<Value> {
    let verification = serde_json::to_value(report.verification)
        .map_err(|source| CliError::JsonSerialize { source })?;

    Ok(json!({
        "schema_version": "1.0",
        "source": display_path(&args.source),
        "target": display_path(&args.target),
        "outcome": outcome(report),
        "bytes_read": report.copy.bytes_read,
        "bytes_written": report.copy.bytes_written,
        "duration_ms": report.duration.as_millis() as u64,
        "verification": verification,
    }))
}

fn failure_json(args: &Args, error: &CliError) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert("schema_version".to_owned(), Value::String("1.0".to_owned()));
    obj.insert("source".to_owned(), Value::String(display_path(&args.source)));
    obj.insert("target".to_owned(), Value::String(display_path(&args.target)));
    obj.insert("outcome".to_owned(), Value::String("failed".to_owned()));

    if let CliError::Image(source) = error {
        if let Some(copied) = source.copied() {
            obj.insert("bytes_read".to_owned(), Value::Number(copied.bytes_read.into()));
            obj.insert(
                "bytes_written".to_owned(),
                Value::Number(copied.bytes_written.into()),
            );
        }
    }

    obj.insert(
        "error_code".to_owned(),
        Value::String(error.code().to_owned()),
    );
    obj.insert("error_message".to_owned(), Value::String(error.to_string()));

    Value::Object(obj)
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
