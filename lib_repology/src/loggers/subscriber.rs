//! # Tracing Subscriber Setup
//!
//! The library itself only emits `tracing` events. Binaries call
//! [`init_tracing`] once at startup to decide where those events go: stderr
//! (plain or JSON) and, optionally, a timestamped file per run.

use chrono::{DateTime, Local};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Failures while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The level string is not a valid filter directive (directive, parser message).
    #[error("invalid log filter {0:?}: {1}")]
    Filter(String, String),

    /// The log directory could not be created.
    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber is already installed.
    #[error("failed to install the tracing subscriber: {0}")]
    Init(String),
}

/// Where and how log events are written.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Prefix of the log file name.
    pub app_name: String,
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `lib_repology=debug`.
    pub level: String,
    /// Emit JSON lines on stderr instead of human readable text.
    pub json: bool,
    /// Also write plain-text logs to `<log_dir>/<app_name>_<timestamp>.log`.
    pub log_dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            app_name: "repology".to_string(),
            level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `options.level`. When file output is
/// enabled the returned guard must be kept alive until exit, otherwise
/// buffered lines are lost.
///
/// # Errors
/// Fails on an unparsable filter, an unwritable log directory, or when a
/// global subscriber is already installed.
pub fn init_tracing(options: &LogOptions) -> Result<Option<WorkerGuard>, LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&options.level)
            .map_err(|e| LoggerError::Filter(options.level.clone(), e.to_string()))?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();

    // stdout is reserved for command output
    if options.json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(fmt::layer().with_writer(std::io::stderr).boxed());
    }

    let mut guard = None;
    if let Some(dir) = &options.log_dir {
        fs::create_dir_all(dir)?;
        let file_name = log_file_name(&options.app_name, Local::now());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().with_ansi(false).with_writer(writer).boxed());
        guard = Some(worker_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))?;

    Ok(guard)
}

/// `<app_name>_<YYYY-mm-dd_HH-MM-SS>.log`
fn log_file_name(app_name: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.log", app_name, now.format("%Y-%m-%d_%H-%M-%S"))
}
