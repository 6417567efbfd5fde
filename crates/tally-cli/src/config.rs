//! Configuration system for the tally CLI.
//!
//! Sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`TALLY_*`)
//! 3. A `.env` file in the working directory
//! 4. Built-in defaults
//!
//! A malformed value in the environment is a startup error; the binary
//! exits non-zero rather than running with a half-applied configuration.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;

/// Main tally configuration.
#[derive(Debug, Clone, Default)]
pub struct TallyConfig {
    pub logging: LoggingConfig,
    pub history: HistoryConfig,
    pub runtime: RuntimeConfig,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter for env_logger.
    pub level: LogLevel,
    /// Force debug-level logging regardless of `level`.
    pub debug: bool,
}

/// History bounds and autosave behavior.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Maximum calculations kept in memory.
    pub max_size: usize,
    /// Rewrite the autosave CSV after every calculation.
    pub autosave: bool,
    /// CSV file used by autosave and the `save`/`load` commands.
    pub autosave_path: PathBuf,
}

/// Evaluation settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Decimal places kept in results.
    pub precision: u32,
    /// Largest accepted operand magnitude.
    pub max_input_value: f64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            debug: false,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: 100,
            autosave: true,
            autosave_path: PathBuf::from("history/calculation_history.csv"),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            max_input_value: 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Load `.env` entries into the process environment. Must run before clap
/// parses env-backed arguments.
pub fn load_env_file() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded environment file: {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => return Err(err).context("failed to read .env file"),
    }
    Ok(())
}

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build the configuration from defaults plus environment overrides.
    pub fn load() -> Result<TallyConfig> {
        let mut config = TallyConfig::default();
        Self::apply_environment_variables(&mut config)?;
        Ok(config)
    }

    fn apply_environment_variables(config: &mut TallyConfig) -> Result<()> {
        if let Ok(level) = env::var("TALLY_LOG_LEVEL") {
            config.logging.level = parse_log_level(&level)
                .with_context(|| format!("invalid value for TALLY_LOG_LEVEL: {level}"))?;
        }
        if let Ok(flag) = env::var("TALLY_DEBUG") {
            config.logging.debug = parse_bool(&flag)
                .with_context(|| format!("invalid boolean for TALLY_DEBUG: {flag}"))?;
        }
        if let Ok(size) = env::var("TALLY_MAX_HISTORY_SIZE") {
            config.history.max_size = size
                .parse()
                .with_context(|| format!("invalid integer for TALLY_MAX_HISTORY_SIZE: {size}"))?;
        }
        if let Ok(flag) = env::var("TALLY_AUTO_SAVE") {
            config.history.autosave = parse_bool(&flag)
                .with_context(|| format!("invalid boolean for TALLY_AUTO_SAVE: {flag}"))?;
        }
        if let Ok(path) = env::var("TALLY_AUTOSAVE_PATH") {
            if !path.trim().is_empty() {
                config.history.autosave_path = PathBuf::from(path.trim());
            }
        }
        if let Ok(precision) = env::var("TALLY_PRECISION") {
            config.runtime.precision = precision
                .parse()
                .with_context(|| format!("invalid integer for TALLY_PRECISION: {precision}"))?;
        }
        if let Ok(limit) = env::var("TALLY_MAX_INPUT_VALUE") {
            config.runtime.max_input_value = limit
                .parse()
                .with_context(|| format!("invalid number for TALLY_MAX_INPUT_VALUE: {limit}"))?;
        }
        Ok(())
    }
}

fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
