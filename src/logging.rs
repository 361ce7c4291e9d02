//! Logging setup on tracing + tracing-subscriber
//!
//! Console output always goes to stderr: `select --json` and the report
//! tables own stdout. A rolling file (tracing-appender) is optional, and
//! `RUST_LOG` can refine individual targets.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{Level, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Holds the file writer's flush guard; keep it alive until exit.
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber for a full run.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = effective_level(&settings.level, verbose, quiet);

    let console = output_layer(io::stderr, settings.json_format, true);
    let (file, guard) = match settings.file.as_deref() {
        Some(path) => {
            let cadence = rotation(&settings.rotation);
            let (layer, guard) = file_layer(path, cadence, settings.max_files, settings.json_format)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(crate_filter(level)?)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(%level, file = ?settings.file, json = settings.json_format, "Logging initialized");
    Ok(LogGuards { _file_guard: guard })
}

/// Stderr-only logging for commands that never read the config file.
pub fn init_simple(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(crate_filter(level)?)
        .with(output_layer(io::stderr, false, true))
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))
}

/// Span wrapping one selection run so every event carries its seed label.
pub fn run_span(seed_label: &str) -> Span {
    tracing::info_span!("selection", seed = %seed_label)
}

/// `--quiet` wins, then `-v`/`-vv`, then the configured level.
fn effective_level(configured: &str, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => configured_level(configured),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Configured level name; "warning" is accepted, anything unknown is info.
fn configured_level(name: &str) -> Level {
    let name = name.trim();
    if name.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    name.parse().unwrap_or(Level::INFO)
}

/// `RUST_LOG` (or the chosen level) with this crate pinned to `level`.
fn crate_filter(level: Level) -> Result<EnvFilter> {
    let name = level.as_str().to_ascii_lowercase();
    let pinned = format!("{}={}", env!("CARGO_CRATE_NAME"), name);
    let directive = pinned
        .parse()
        .map_err(|e| Error::config_field_invalid("logging.level", format!("bad filter '{}': {}", pinned, e)))?;

    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&name))
        .add_directive(directive))
}

/// Rollover cadence by name; anything unrecognized rolls daily.
fn rotation(name: &str) -> Rotation {
    match name.trim().to_ascii_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Text or JSON formatting over any writer.
fn output_layer<S, W>(writer: W, json: bool, ansi: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else if ansi {
        fmt::layer().with_writer(writer).with_target(false).compact().boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    }
}

/// Rolling log file next to `log_file`, named after its file stem.
fn file_layer<S>(
    log_file: &str,
    rotation: Rotation,
    max_files: u32,
    json: bool,
) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let path = Path::new(log_file);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory).map_err(|e| Error::IoWrite {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let prefix = path.file_stem().and_then(|n| n.to_str()).unwrap_or("onboard");

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files.max(1) as usize)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Failed to create log file appender: {}", e)))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((output_layer(writer, json, false), guard))
}
