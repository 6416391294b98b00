//! CLI argument definitions for the enquete importer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use enquete_cli::logging::LogFormat;
use enquete_core::{DEFAULT_TABLE, RowFailurePolicy};
use enquete_model::TableName;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "enquete-import",
    version,
    about = "Import enquete spreadsheets into facility tables",
    long_about = "Import survey responses from Google Sheets into PostgreSQL.\n\n\
                  Each configured facility reads its own spreadsheet, maps the header\n\
                  row through a mapping catalog and replaces its rows in the\n\
                  destination table. Running without a subcommand imports.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormat,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import the selected facilities (the default).
    Import(ImportArgs),

    /// List the selected facilities with their worksheet, tables and catalogs.
    Facilities(FacilitiesArgs),
}

/// Configuration file and facility selectors.
#[derive(Args, Clone, Debug)]
pub struct TargetArgs {
    /// Path to the configuration file.
    #[arg(long = "config", value_name = "PATH", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Import only this corporation (repeatable).
    #[arg(long = "corporation", value_name = "KEY")]
    pub corporations: Vec<String>,

    /// Import only this facility, as `facility` or `corporation.facility`
    /// (repeatable).
    #[arg(long = "facility", value_name = "KEY")]
    pub facilities: Vec<String>,

    /// Table for facilities that do not name one.
    #[arg(long = "table", value_name = "NAME", default_value = DEFAULT_TABLE, value_parser = parse_table)]
    pub table: TableName,
}

#[derive(Args, Clone, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Service-account key (default: client_secret.json next to the config).
    #[arg(long = "credentials", value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// What to do with a row that fails type coercion.
    #[arg(long = "on-row-error", value_enum, default_value = "abort-facility")]
    pub on_row_error: RowErrorArg,

    /// Read and convert rows without writing to the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Include cell values in row-level log events (respondent data).
    #[arg(long = "log-data")]
    pub log_data: bool,
}

#[derive(Args, Clone, Debug)]
pub struct FacilitiesArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RowErrorArg {
    /// Fail the facility; nothing is written for it.
    AbortFacility,
    /// Log the row and import the rest.
    SkipRow,
}

impl From<RowErrorArg> for RowFailurePolicy {
    fn from(arg: RowErrorArg) -> Self {
        match arg {
            RowErrorArg::AbortFacility => Self::AbortFacility,
            RowErrorArg::SkipRow => Self::SkipRow,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

fn parse_table(value: &str) -> Result<TableName, String> {
    TableName::new(value).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_imports_with_defaults() {
        let cli = Cli::try_parse_from(["enquete-import"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.import.target.table.as_str(), "enquetes");
        assert_eq!(cli.import.target.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.import.on_row_error, RowErrorArg::AbortFacility);
        assert!(!cli.import.dry_run);
    }

    #[test]
    fn test_repeatable_selectors() {
        let cli = Cli::try_parse_from([
            "enquete-import",
            "--corporation",
            "acme",
            "--facility",
            "tokyo",
            "--facility",
            "globex.sendai",
            "--table",
            "survey.enquetes",
            "--on-row-error",
            "skip-row",
        ])
        .unwrap();
        assert_eq!(cli.import.target.corporations, vec!["acme"]);
        assert_eq!(cli.import.target.facilities, vec!["tokyo", "globex.sendai"]);
        assert_eq!(cli.import.target.table.as_str(), "survey.enquetes");
        assert_eq!(
            RowFailurePolicy::from(cli.import.on_row_error),
            RowFailurePolicy::SkipRow
        );
    }

    #[test]
    fn test_invalid_table_is_rejected() {
        assert!(Cli::try_parse_from(["enquete-import", "--table", "enquetes; drop"]).is_err());
    }

    #[test]
    fn test_facilities_subcommand() {
        let cli = Cli::try_parse_from(["enquete-import", "facilities", "--corporation", "acme"])
            .unwrap();
        match cli.command {
            Some(Command::Facilities(args)) => {
                assert_eq!(args.target.corporations, vec!["acme"]);
            }
            _ => panic!("expected facilities subcommand"),
        }
    }
}
