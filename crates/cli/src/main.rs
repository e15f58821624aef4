//! Poolrank CLI - rank pools by token holder count
//! Composition root: configuration, DI wiring, report printing

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use poolrank_core::application::{
    EnrichmentConfig, HolderEnricher, PipelineConfig, QueryPoller, RankingPipeline,
};
use poolrank_core::domain::EnrichmentReport;
use poolrank_core::port::TokioSleeper;
use poolrank_infra_http::dune::DEFAULT_QUERY_ID;
use poolrank_infra_http::{DuneClient, DuneConfig, MoralisClient, MoralisConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "poolrank")]
#[command(about = "Rank pools by token holder count", long_about = None)]
#[command(version)]
struct Cli {
    /// Query time window in days
    #[arg(default_value_t = 7)]
    days: u32,

    /// Chain name passed to the analytics query
    #[arg(long, default_value = "gnosis")]
    chain: String,

    /// Chain identifier passed to the token data provider
    #[arg(long, default_value = "gnosis")]
    provider_chain: String,

    /// Saved analytics query to execute
    #[arg(long, default_value_t = DEFAULT_QUERY_ID)]
    query_id: u64,

    /// Execution performance tier
    #[arg(long, default_value = "medium")]
    performance: String,

    /// Abort polling after this many status checks
    #[arg(long, default_value_t = 120)]
    max_polls: u32,

    /// Skip the metadata indexing check before each holder fetch
    #[arg(long)]
    skip_index_check: bool,

    /// Cap on holder entries requested per pool
    #[arg(long)]
    holder_limit: Option<u32>,

    /// Enrich these addresses instead of running the analytics query
    #[arg(long, value_delimiter = ',')]
    addresses: Vec<String>,

    /// Run the analytics query and print the raw rows, skipping enrichment
    #[arg(long, conflicts_with = "addresses")]
    query_only: bool,

    /// Analytics API key
    #[arg(long, env = "DUNE_API_KEY", hide_env_values = true)]
    dune_api_key: String,

    /// Token data provider API key
    #[arg(long, env = "MORALIS_API_KEY", hide_env_values = true)]
    moralis_api_key: String,
}

#[derive(Tabled)]
struct RankedRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Pool")]
    address: String,
    #[tabled(rename = "Holders")]
    holders: u64,
}

fn init_logging() {
    let log_format = std::env::var("POOLRANK_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("poolrank=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

fn print_report(report: &EnrichmentReport) {
    println!();
    println!("{}", "Pools ranked by fewest holders".cyan().bold());
    println!();

    if report.ranked.is_empty() {
        println!("{}", "No pools could be ranked".yellow());
    } else {
        let rows: Vec<RankedRow> = report
            .ranked
            .iter()
            .enumerate()
            .map(|(index, standing)| RankedRow {
                rank: index + 1,
                address: standing.address.to_string(),
                holders: standing.holders,
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    if !report.skipped.is_empty() {
        println!();
        println!("{}", "Skipped addresses".yellow().bold());
        for skipped in &report.skipped {
            println!("  {} {}: {}", "✗".red(), skipped.address, skipped.reason);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env first so clap can pick up env-sourced arguments from it
    dotenvy::dotenv().ok();

    // 2. Initialize logging
    init_logging();

    // 3. Parse arguments (fails fast when an API key is missing)
    let cli = Cli::parse();
    info!("Poolrank v{} starting...", VERSION);

    // 4. Setup dependencies (DI wiring)
    let sleeper = Arc::new(TokioSleeper);

    let dune = Arc::new(DuneClient::new(
        DuneConfig::new(cli.dune_api_key.clone())
            .with_query_id(cli.query_id)
            .with_performance(cli.performance.clone()),
    ));
    let moralis = Arc::new(MoralisClient::new(
        MoralisConfig::new(cli.moralis_api_key.clone()).with_chain(cli.provider_chain.clone()),
    ));

    let poller = QueryPoller::new(dune, sleeper.clone()).with_max_polls(cli.max_polls);
    let enricher = HolderEnricher::new(moralis, sleeper).with_config(EnrichmentConfig {
        check_indexing: !cli.skip_index_check,
        holder_limit: cli.holder_limit,
        ..Default::default()
    });
    let pipeline = RankingPipeline::new(
        poller,
        enricher,
        PipelineConfig {
            chain: cli.chain.clone(),
            window_days: cli.days,
            ..Default::default()
        },
    );

    // 5. Run the requested mode
    if cli.query_only {
        let rows = pipeline.query_rows().await?;
        println!("{}", format!("{} result rows", rows.len()).cyan().bold());
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
        return Ok(());
    }

    let report = if cli.addresses.is_empty() {
        pipeline.run().await?
    } else {
        // Fixed address list: skip the analytics stage entirely
        info!(addresses = cli.addresses.len(), "Enriching fixed address list");
        pipeline.enrich(&cli.addresses).await
    };

    print_report(&report);
    Ok(())
}
