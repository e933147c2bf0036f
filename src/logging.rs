//! Logging init: stderr plus an optional append-only log file.
//!
//! Severities follow the crawler's own scale (`off` < `fatal` < `error` <
//! `warning` < `info` < `debug` < `all`) and map onto `tracing` levels.
//! Fatal entries are emitted at error level under [`FATAL_TARGET`], so a
//! `fatal` threshold shows them and nothing else.

use serde::Deserialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

/// Target that fatal entries are logged under
pub const FATAL_TARGET: &str = "spindel::fatal";

/// Minimum severity written to the log
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Fatal,
    Error,
    #[serde(alias = "warn")]
    #[value(alias = "warn")]
    Warning,
    #[default]
    Info,
    Debug,
    All,
}

impl LogLevel {
    const ORDERED: [LogLevel; 7] = [
        LogLevel::Off,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::All,
    ];

    /// Moves the threshold `steps` levels towards [`LogLevel::All`]
    pub fn raised(self, steps: u8) -> Self {
        let idx = Self::ORDERED.iter().position(|l| *l == self).unwrap_or(0);
        let raised = (idx + usize::from(steps)).min(Self::ORDERED.len() - 1);
        Self::ORDERED[raised]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::All => "ALL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    OpenFile { path: PathBuf, source: io::Error },

    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// `EnvFilter` directive for a threshold
pub fn filter_directive(level: LogLevel) -> String {
    match level {
        LogLevel::Off => "off".to_string(),
        LogLevel::Fatal => format!("off,{}=error", FATAL_TARGET),
        LogLevel::Error => "error".to_string(),
        LogLevel::Warning => "warn".to_string(),
        LogLevel::Info => "info".to_string(),
        LogLevel::Debug => "debug".to_string(),
        LogLevel::All => "trace".to_string(),
    }
}

/// `RUST_LOG` takes precedence over the configured threshold when set
fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Initializes logging to stderr and, when `file` is given, to that file
///
/// The file is opened in append mode and created if missing; entries are
/// written without ANSI colors. On failure nothing is installed, so the
/// caller can fall back to [`init_logging_stderr`].
pub fn init_logging(level: LogLevel, file: Option<&Path>) -> Result<(), LoggingError> {
    let file_layer = match file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                tracing_fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_fmt::layer().with_writer(io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    if let Some(path) = file {
        tracing::debug!("Logging to {}", path.display());
    }

    Ok(())
}

/// Initialize logging to stderr only (no file). Use when init_logging() fails
/// so the CLI doesn't crash.
pub fn init_logging_stderr(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
