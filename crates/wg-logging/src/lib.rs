// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Logging setup shared by the wikigate binaries
//!
//! One place decides the filter, the output format and where log files go, so
//! every process can be tuned with the same flags and `RUST_LOG`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing::Level;

/// Directory name used below the platform's data directory
const PRODUCT: &str = "wikigate";

/// How log lines are rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plaintext,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Plaintext => "plaintext",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Verbosity accepted on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliLogLevel {
    Error,
    Warn,
    #[default]
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

impl fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Level renders upper case; flags are lower case
        f.write_str(&Level::from(*self).as_str().to_ascii_lowercase())
    }
}

/// Logging flags, meant to be flattened into a binary's clap arguments
///
/// Output goes to stdout unless `--log-file` or `--log-dir` is given.
#[derive(Clone, Debug, Default, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliLoggingArgs {
    /// Log verbosity (default: info)
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<CliLogLevel>,

    /// Log line format (default: plaintext)
    #[arg(long, value_enum)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,

    /// Write logs into this directory
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Write logs to this file; relative names go in --log-dir or the standard log directory
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl CliLoggingArgs {
    /// Install the global subscriber for `component`
    pub fn init(self, component: &str) -> anyhow::Result<()> {
        let level = Level::from(self.log_level.unwrap_or_default());
        let format = self.log_format.unwrap_or_default();

        match self.log_path(component) {
            Some(path) => init_to_file(component, level, format, &path),
            None => init(component, level, format),
        }
    }

    /// File the logs go to, `None` for stdout
    pub fn log_path(&self, component: &str) -> Option<PathBuf> {
        match (&self.log_file, &self.log_dir) {
            (Some(file), Some(dir)) => Some(dir.join(file)),
            (Some(file), None) => Some(standard_log_dir().join(file)),
            (None, Some(dir)) => Some(dir.join(format!("{component}.log"))),
            (None, None) => None,
        }
    }
}

/// Platform directory for wikigate log files
///
/// `~/Library/Logs/wikigate` on macOS, `<local data dir>/wikigate` elsewhere,
/// and the temp directory when neither is known.
pub fn standard_log_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let base = dirs::home_dir().map(|home| home.join("Library").join("Logs"));
    #[cfg(not(target_os = "macos"))]
    let base = dirs::data_local_dir();

    base.unwrap_or_else(std::env::temp_dir).join(PRODUCT)
}

/// Log to stdout
pub fn init(component: &str, default_level: Level, format: LogFormat) -> anyhow::Result<()> {
    init_with_writer(component, default_level, format, std::io::stdout)
}

/// Append logs to `log_path`, creating its directory first
pub fn init_to_file(
    component: &str,
    default_level: Level,
    format: LogFormat,
    log_path: &Path,
) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    init_with_writer(component, default_level, format, file)
}

/// Install the global subscriber writing to `writer`
///
/// `RUST_LOG` wins over `default_level` when set and valid.
pub fn init_with_writer<W>(
    component: &str,
    default_level: Level,
    format: LogFormat,
    writer: W,
) -> anyhow::Result<()>
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(component, default_level)));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_file(cfg!(debug_assertions))
        .with_line_number(cfg!(debug_assertions));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(layer.json()).try_init()?,
        LogFormat::Plaintext => registry.with(layer).try_init()?,
    }
    Ok(())
}

fn default_directives(component: &str, level: Level) -> String {
    // Event targets are module paths, so the package dash becomes an underscore
    format!("{level},{}={level}", component.replace('-', "_"))
}

/// Placeholder to log instead of a secret value
///
/// ```rust
/// use wg_logging::redact;
///
/// tracing::info!(jwt_secret = %redact("hunter2"), "auth configured");
/// ```
pub fn redact(_value: impl fmt::Display) -> &'static str {
    "[REDACTED]"
}
