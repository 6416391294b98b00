use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use enquete_config::load_config;
use enquete_core::{
    ImportOptions, Importer, RunReport, Selection, Target, plan_facilities,
};
use enquete_db::{DryRunConnector, PostgresConnector, SinkConnector};
use enquete_ingest::{GoogleSheetsClient, SheetSource};
use enquete_model::Config;
use tracing::{info, info_span};

use enquete_cli::summary::{print_plan, print_summary};

use crate::cli::{FacilitiesArgs, ImportArgs, TargetArgs};

/// Service-account key looked up next to the configuration file.
const DEFAULT_CREDENTIALS_FILE: &str = "client_secret.json";

pub fn run_import(args: &ImportArgs) -> Result<RunReport> {
    let span = info_span!("import", config = %args.target.config.display());
    let _guard = span.enter();

    let config = load(&args.target.config)?;
    let targets = select(&args.target, &config)?;

    let credentials = args
        .credentials
        .clone()
        .unwrap_or_else(|| default_credentials(&args.target.config));
    let source = GoogleSheetsClient::from_credentials_file(&credentials)
        .with_context(|| format!("load credentials {}", credentials.display()))?;

    let options = ImportOptions::new(args.target.table.clone())
        .with_row_failure(args.on_row_error.into())
        .with_log_data(args.log_data);

    let report = if args.dry_run {
        info!("dry run: the database is not touched");
        import(&config, &targets, source, DryRunConnector, options)
    } else {
        import(&config, &targets, source, PostgresConnector::new(), options)
    };
    print_summary(&report);
    Ok(report)
}

pub fn run_facilities(args: &FacilitiesArgs) -> Result<bool> {
    let config = load(&args.target.config)?;
    let targets = select(&args.target, &config)?;
    let plans = plan_facilities(&config, &targets, &args.target.table);
    print_plan(&plans);
    Ok(plans.iter().all(|plan| plan.is_resolvable()))
}

fn import<S, C>(
    config: &Config,
    targets: &[Target<'_>],
    source: S,
    connector: C,
    options: ImportOptions,
) -> RunReport
where
    S: SheetSource,
    C: SinkConnector,
{
    Importer::new(config, source, connector, options).run(targets)
}

fn load(path: &Path) -> Result<Config> {
    load_config(path).with_context(|| format!("load configuration {}", path.display()))
}

fn select<'c>(args: &TargetArgs, config: &'c Config) -> Result<Vec<Target<'c>>> {
    let selection = Selection {
        corporations: args.corporations.clone(),
        facilities: args.facilities.clone(),
    };
    let targets = selection.resolve(config).context("select facilities")?;
    info!(facilities = targets.len(), "facilities selected");
    Ok(targets)
}

fn default_credentials(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf)
        .join(DEFAULT_CREDENTIALS_FILE)
}
