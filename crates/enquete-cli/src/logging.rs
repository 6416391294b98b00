//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: facility failures, fatal errors
//! - `warn`: skipped rows, catalog fallbacks
//! - `info`: facility progress, record counts
//! - `debug`: stage transitions, API requests, SQL chunks
//! - `trace`: everything else
//!
//! Cell values only appear in row-level events when `--log-data` is given.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level; everything else stays
/// at `warn`.
const WORKSPACE_CRATES: [&str; 8] = [
    "enquete_cli",
    "enquete_config",
    "enquete_core",
    "enquete_db",
    "enquete_ingest",
    "enquete_map",
    "enquete_model",
    "enquete_transform",
];

/// How the importer logs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Let `RUST_LOG` override `level`.
    pub env_override: bool,
    pub ansi: bool,
    pub format: LogFormat,
    /// Log file, appended to; stderr when unset.
    pub file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            env_override: true,
            ansi: true,
            format: LogFormat::default(),
            file: None,
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let filter = build_env_filter(config.level, config.env_override);
    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), config.ansi),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer).with_target(false))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(writer).with_ansi(ansi).with_target(false))
            .init(),
    }
    Ok(())
}

/// Filter directives for `level`: workspace crates at `level`, the rest at
/// `warn` (or lower when `level` is).
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let default = if matches!(level.as_str(), "off" | "error") {
        level.as_str()
    } else {
        "warn"
    };
    let mut directives = default.to_string();
    for krate in WORKSPACE_CRATES {
        directives.push(',');
        directives.push_str(krate);
        directives.push('=');
        directives.push_str(&level);
    }
    directives
}

fn build_env_filter(level: LevelFilter, use_env: bool) -> EnvFilter {
    if use_env && let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(default_directives(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,enquete_cli=debug,"));
        assert!(directives.ends_with("enquete_transform=debug"));
        assert_eq!(directives.matches('=').count(), WORKSPACE_CRATES.len());
    }

    #[test]
    fn test_default_config_logs_info_to_stderr() {
        let config = LogConfig::default();
        assert_eq!(config.level, LevelFilter::INFO);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.env_override);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_error_level_quiets_dependencies() {
        assert!(default_directives(LevelFilter::ERROR).starts_with("error,"));
        assert!(default_directives(LevelFilter::OFF).starts_with("off,enquete_cli=off"));
    }
}
