//! Logging Configuration and Initialization
//!
//! Centralized logging setup for all snpsig components. Supports:
//!
//! - Multiple output targets (console, file, both)
//! - Multiple log formats (text, JSON)
//! - Configurable log levels
//! - Daily log file rotation
//! - Environment-based configuration (`SNPSIG_LOG_*` variables)
//!
//! Use the structured logging macros (`trace!`, `debug!`, `info!`, `warn!`,
//! `error!`) with fields rather than `println!`/`eprintln!`:
//!
//! ```rust
//! use tracing::{info, warn};
//!
//! info!(records = 42, "Parsed input file");
//! warn!(rsid = %"rs123", attempt = 1, "Fetch failed, retrying");
//! ```
//!
//! # Example
//!
//! ```no_run
//! use snpsig_common::logging::{LogConfig, init_logging};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!
//!     info!("Application started");
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Very detailed trace-level logging
    Trace,
    /// Debug-level logging for development
    Debug,
    /// Informational messages
    #[default]
    Info,
    /// Warning messages
    Warn,
    /// Error messages
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Output target for logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Output to console only
    #[default]
    Console,
    /// Output to file only
    File,
    /// Output to both console and file
    Both,
}

impl std::str::FromStr for LogOutput {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(anyhow::anyhow!("Invalid log output: {}", s)),
        }
    }
}

impl std::fmt::Display for LogOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogOutput::Console => write!(f, "console"),
            LogOutput::File => write!(f, "file"),
            LogOutput::Both => write!(f, "both"),
        }
    }
}

/// Log format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,

    /// Output target (console, file, or both)
    pub output: LogOutput,

    /// Log format (text or JSON)
    pub format: LogFormat,

    /// Directory for log files (only used when output includes file)
    pub log_dir: PathBuf,

    /// Log file name prefix (e.g., "snpsig" -> "snpsig.2024-01-18.log")
    pub log_file_prefix: String,

    /// Additional filter directives (e.g., "reqwest=warn,hyper=warn")
    /// for fine-tuning specific module log levels
    pub filter_directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            output: LogOutput::Console,
            format: LogFormat::Text,
            log_dir: PathBuf::from("./logs"),
            log_file_prefix: "snpsig".to_string(),
            filter_directives: None,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SNPSIG_LOG_LEVEL`: Log level (trace, debug, info, warn, error)
    /// - `SNPSIG_LOG_OUTPUT`: Output target (console, file, both)
    /// - `SNPSIG_LOG_FORMAT`: Log format (text, json)
    /// - `SNPSIG_LOG_DIR`: Directory for log files
    /// - `SNPSIG_LOG_FILE_PREFIX`: Prefix for log files
    /// - `SNPSIG_LOG_FILTER`: Additional filter directives
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("SNPSIG_LOG_LEVEL") {
            config.level = level.parse()?;
        }

        if let Ok(output) = std::env::var("SNPSIG_LOG_OUTPUT") {
            config.output = output.parse()?;
        }

        if let Ok(format) = std::env::var("SNPSIG_LOG_FORMAT") {
            config.format = format.parse()?;
        }

        if let Ok(dir) = std::env::var("SNPSIG_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        if let Ok(prefix) = std::env::var("SNPSIG_LOG_FILE_PREFIX") {
            config.log_file_prefix = prefix;
        }

        if let Ok(filter) = std::env::var("SNPSIG_LOG_FILTER") {
            config.filter_directives = Some(filter);
        }

        Ok(config)
    }
}

/// Initialize logging with the given configuration
///
/// Sets up the global tracing subscriber; call once at startup. Console
/// output goes to stderr, keeping stdout clean for the run summary.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    // Build the base filter
    let mut filter =
        EnvFilter::from_default_env().add_directive(config.level.to_tracing_level().into());

    // Add custom filter directives if provided
    if let Some(ref directives) = config.filter_directives {
        for directive in directives.split(',') {
            filter = filter.add_directive(
                directive
                    .parse()
                    .context("Failed to parse filter directive")?,
            );
        }
    }

    match config.output {
        LogOutput::Console => init_console_logging(config, filter),
        LogOutput::File => init_file_logging(config, filter),
        LogOutput::Both => init_both_logging(config, filter),
    }
}

/// Initialize console-only logging
fn init_console_logging(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        },
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.json())
                .try_init()?;
        },
    }

    Ok(())
}

/// Initialize file-only logging
fn init_file_logging(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

    // Daily rotating, non-blocking file appender
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.log_file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard must outlive the program to flush remaining logs
    std::mem::forget(guard);

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false);

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        },
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.json())
                .try_init()?;
        },
    }

    Ok(())
}

/// Initialize both console and file logging
fn init_both_logging(config: &LogConfig, filter: EnvFilter) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir).context("Failed to create log directory")?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.log_file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    std::mem::forget(guard);

    match config.format {
        LogFormat::Text => {
            let console_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE);

            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        },
        LogFormat::Json => {
            let console_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE);

            let file_layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        },
    }

    Ok(())
}
