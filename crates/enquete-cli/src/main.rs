//! Enquete import CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use enquete_cli::logging::{LogConfig, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{run_facilities, run_import};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        None => import(&cli.import),
        Some(Command::Import(args)) => import(args),
        Some(Command::Facilities(args)) => match run_facilities(args) {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn import(args: &cli::ImportArgs) -> i32 {
    match run_import(args) {
        Ok(report) => {
            if report.is_success() {
                0
            } else {
                1
            }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// `--log-level` wins over `-v`/`-q`; either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = cli
        .log_level
        .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from);
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };
    LogConfig {
        level,
        env_override: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        ansi,
        format: cli.log_format,
        file: cli.log_file.clone(),
    }
}

#[cfg(test)]
mod tests {
    use enquete_cli::logging::LogFormat;

    use super::*;

    #[test]
    fn test_log_level_overrides_verbosity() {
        let cli = Cli::try_parse_from(["enquete-import", "-q", "--log-level", "debug"]).unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level, LevelFilter::DEBUG);
        assert!(!config.env_override);
    }

    #[test]
    fn test_plain_invocation_defers_to_environment() {
        let cli = Cli::try_parse_from(["enquete-import", "--log-format", "json", "--color", "never"])
            .unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level, LevelFilter::INFO);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.env_override);
        assert!(!config.ansi);
    }
}
