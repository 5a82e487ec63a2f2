//! Futures Position Signals - Main Entry Point
//!
//! Runs every strategy over one trade date of position rankings and prints
//! the run with its summaries as JSON.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use futures_position_signals::config::load_with_env_overrides;
use futures_position_signals::strategy::{POWER_CHANGE, RETAIL_REVERSE, SPIDER_WEB};
use futures_position_signals::summary::OPPORTUNITY_TOP_N;
use futures_position_signals::term_structure::classify_position_proxies;
use futures_position_signals::{
    fetch_all, trade_opportunities, AnalysisOrchestrator, AnalysisRun, AppConfig, JsonFileSource,
    MarketOutlook, RawPositionTable, StrategySummary, TermStructureClassifier,
    TermStructureResult, TradeOpportunities,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level or filter directives; defaults to settings.log_level
    #[arg(long)]
    log_level: Option<String>,

    /// JSON file mapping contract id to raw ranking table
    #[arg(long, conflicts_with = "trade_date")]
    input: Option<PathBuf>,

    /// Directory of per-exchange ranking files (overrides fetch.data_dir)
    #[arg(long, env = "POSITION_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Trade date to load from the data directory (YYYYMMDD)
    #[arg(long)]
    trade_date: Option<String>,

    /// Skip the position-proxy term-structure pass
    #[arg(long)]
    no_term_structure: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    run: &'a AnalysisRun,
    summaries: Vec<StrategySummary>,
    outlook: MarketOutlook,
    opportunities: TradeOpportunities,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    term_structures: Vec<TermStructureResult>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config =
        load_with_env_overrides(args.config.as_deref()).context("loading configuration")?;

    // Initialize logging
    let level = resolve_log_level(args.log_level.as_deref(), &config);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the report
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!(log_level = level, "Starting futures position signals");

    let orchestrator = AnalysisOrchestrator::new(&config.engine);

    let run = if let Some(input) = &args.input {
        info!(path = %input.display(), "reading contract map");
        let bytes = tokio::fs::read(input)
            .await
            .with_context(|| format!("reading {}", input.display()))?;
        let raw: BTreeMap<String, RawPositionTable> =
            serde_json::from_slice(&bytes).context("parsing contract map")?;
        orchestrator.run_analysis(&raw)
    } else if let Some(date) = &args.trade_date {
        let trade_date = NaiveDate::parse_from_str(date, "%Y%m%d")
            .with_context(|| format!("invalid trade date {date}, expected YYYYMMDD"))?;
        let dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.fetch.data_dir));
        let sources = JsonFileSource::all(&dir);
        let outcomes = fetch_all(
            &sources,
            trade_date,
            config.fetch.max_workers,
            config.fetch.timeout(),
        )
        .await;
        orchestrator.run_fetched(outcomes)
    } else {
        bail!("either --input or --trade-date is required");
    };

    let term_structures = if args.no_term_structure {
        Vec::new()
    } else {
        let classifier = TermStructureClassifier::new(&config.term_structure);
        classify_position_proxies(&classifier, &run.results)
    };

    let report = Report {
        run: &run,
        summaries: [POWER_CHANGE, SPIDER_WEB, RETAIL_REVERSE]
            .iter()
            .map(|name| StrategySummary::from_run(&run, name))
            .collect(),
        outlook: MarketOutlook::from_run(&run),
        opportunities: trade_opportunities(&run, POWER_CHANGE, SPIDER_WEB, OPPORTUNITY_TOP_N),
        term_structures,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(
        analyzed = run.len(),
        skipped = run.skipped_count(),
        unavailable = run.unavailable_exchanges.len(),
        "Analysis complete"
    );

    Ok(())
}

/// Command-line level first, then the configured one
fn resolve_log_level<'a>(cli_level: Option<&'a str>, config: &'a AppConfig) -> &'a str {
    cli_level.unwrap_or(&config.settings.log_level)
}
