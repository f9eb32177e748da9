//! serp-harvest main entry point
//!
//! This is the command-line interface for the search-result link harvester.

use anyhow::Context;
use clap::Parser;
use serp_harvest::config::{load_config_with_hash, Config};
use serp_harvest::output::file_sinks;
use serp_harvest::pipeline::PipelineRunner;
use serp_harvest::source::LineFileKeywords;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// serp-harvest: concurrent search-result link harvester
///
/// serp-harvest turns a list of keywords into search URLs, fetches every
/// result page concurrently with retries, and extracts the outbound links
/// of the ad and organic result regions.
#[derive(Parser, Debug)]
#[command(name = "serp-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent search-result link harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print the search URLs without fetching
    #[arg(long)]
    dry_run: bool,

    /// Keyword file, overriding `input.keywords-path`
    #[arg(long, value_name = "FILE")]
    keywords: Option<PathBuf>,

    /// Output directory, overriding `output.directory`
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let keywords_path = cli
        .keywords
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.input.keywords_path));
    let source = LineFileKeywords::new(keywords_path).with_header(config.input.skip_header);

    if cli.dry_run {
        handle_dry_run(&config, &source)
    } else {
        handle_harvest(&config, &source, cli.output_dir.as_deref()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("serp_harvest=info,warn"),
            1 => EnvFilter::new("serp_harvest=debug,info"),
            2 => EnvFilter::new("serp_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and prints the derived URLs
fn handle_dry_run(config: &Config, source: &LineFileKeywords) -> anyhow::Result<()> {
    let runner = PipelineRunner::from_config(config)?;
    let jobs = runner.jobs(source)?;

    println!("=== serp-harvest Dry Run ===\n");

    println!("Fetcher Configuration:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Max redirects: {}", config.fetcher.max_redirects);
    println!("  Retry schedule: {:?}ms", config.retry.schedule_ms);
    println!(
        "  Max concurrent fetches: {}",
        config.dispatcher.max_concurrent_fetches
    );

    println!("\nRegions ({}):", config.extractor.regions.len());
    for region in &config.extractor.regions {
        println!("  - {} ({})", region.name, region.selector);
    }

    println!("\nSearch URLs ({}) from {}:", jobs.len(), source.path().display());
    for job in &jobs {
        println!("  - {} -> {}", job.keyword, job.url);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: &Config,
    source: &LineFileKeywords,
    output_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let runner = PipelineRunner::from_config(config)?;
    let mut sink = file_sinks(&config.output, output_dir).context("Failed to prepare output")?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling outstanding fetches");
            trigger.cancel();
        }
    });

    tracing::info!("Reading keywords from {}", source.path().display());
    let report = runner.run(source, &mut sink, &cancel).await?;

    println!("{}", report.summary);
    tracing::info!("Harvest completed");
    Ok(())
}
