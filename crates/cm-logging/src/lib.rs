// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized logging utilities for config-manager
//!
//! Binaries call [`CliLoggingArgs::init`] once at startup. Output goes to
//! stderr by default so that command output on stdout stays machine
//! readable; `--log-file`/`--log-dir` redirect it to a file. `RUST_LOG`
//! always overrides the configured level.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing::Level;

/// Output format for log messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable plaintext format
    #[default]
    Plaintext,
    /// Structured JSON format
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Plaintext => write!(f, "plaintext"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// CLI log level enum for clap integration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliLogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

/// Logging flags shared by every binary; use with `#[command(flatten)]`.
#[derive(Clone, Debug, Default, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliLoggingArgs {
    /// Log verbosity level
    #[arg(long, value_enum, global = true, help = "Log verbosity level (default: warn)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<CliLogLevel>,

    /// Log output format
    #[arg(long, value_enum, global = true, help = "Log output format (default: plaintext)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,

    /// Directory for log files
    #[arg(long, global = true, help = "Directory for log files")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Log filename
    #[arg(long, global = true, help = "Log file name or path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl CliLoggingArgs {
    /// Initialize logging: stderr unless a log file or directory was given.
    pub fn init(&self, component: &str) -> anyhow::Result<()> {
        let level = self.log_level.unwrap_or_default().into();
        let format = self.log_format.unwrap_or_default();

        match self.resolve_log_path(component) {
            Some(path) => init_to_file(component, level, format, &path),
            None => init_with_writer(component, level, format, io::stderr),
        }
    }

    /// File logging target, if any was requested.
    ///
    /// An absolute `log_file` is used as is; a relative one is placed under
    /// `log_dir`, or under [`standard_log_dir`] when no directory was given;
    /// a bare `log_dir` gets `<component>.log`.
    pub fn resolve_log_path(&self, component: &str) -> Option<PathBuf> {
        match (&self.log_file, &self.log_dir) {
            (Some(file), _) if file.is_absolute() => Some(file.clone()),
            (Some(file), Some(dir)) => Some(dir.join(file)),
            (Some(file), None) => Some(standard_log_dir().join(file)),
            (None, Some(dir)) => Some(dir.join(format!("{component}.log"))),
            (None, None) => None,
        }
    }
}

/// Platform log directory: `<data dir>/config-manager`
pub fn standard_log_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("config-manager")
}

/// Initialize logging to a file, creating parent directories as needed
pub fn init_to_file(
    component: &str,
    default_level: Level,
    format: LogFormat,
    log_path: &Path,
) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::OpenOptions::new().create(true).append(true).open(log_path)?;

    init_with_writer(component, default_level, format, log_file)
}

/// Initialize logging with a custom writer
///
/// # Arguments
/// * `component` - The component name (e.g., "cm")
/// * `default_level` - Default log level when RUST_LOG is not set
/// * `format` - Output format for log messages
/// * `writer` - Where to write log output
pub fn init_with_writer<W>(
    component: &str,
    default_level: Level,
    format: LogFormat,
    writer: W,
) -> anyhow::Result<()>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(component, default_level)));

    match format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).json();
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
        LogFormat::Plaintext => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_target(false);
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
    }

    Ok(())
}

fn default_directive(component: &str, level: Level) -> String {
    // crate targets use underscores
    format!("{},{}={}", level, component.replace('-', "_"), level)
}
