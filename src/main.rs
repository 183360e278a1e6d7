//! Sumi-Glean main entry point
//!
//! This is the command-line interface for the Sumi-Glean text harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_glean::config::{build_config, Config, ConfigOverrides, Protocol};
use sumi_glean::crawler::run_crawl;
use sumi_glean::output::{print_statistics, save_results, FsSink};
use tracing_subscriber::EnvFilter;

/// Sumi-Glean: a single-domain text harvester
///
/// Sumi-Glean crawls one domain up to a maximum link depth, extracts the text
/// of the configured HTML elements from every page and saves it as JSON.
#[derive(Parser, Debug)]
#[command(name = "sumi-glean")]
#[command(version = "1.0.0")]
#[command(about = "A single-domain text harvester", long_about = None)]
struct Cli {
    /// Domain to crawl; links outside it are ignored [default: go-colly.org]
    #[arg(long)]
    domain: Option<String>,

    /// Scheme used for the seed URL [default: https]
    #[arg(long, value_enum)]
    protocol: Option<Protocol>,

    /// Maximum link depth followed from the seed page [default: 5]
    #[arg(long = "maxExplorationDepth", alias = "max-exploration-depth")]
    max_exploration_depth: Option<u32>,

    /// Comma separated list of elements whose text is extracted
    #[arg(long)]
    tags: Option<String>,

    /// Directory the JSON output is written to [default: ./outputs]
    #[arg(long = "outputFolderPath", alias = "output-folder-path")]
    output_folder_path: Option<PathBuf>,

    /// Maximum number of pages fetched at the same time [default: 16]
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            domain: self.domain.clone(),
            protocol: self.protocol,
            max_exploration_depth: self.max_exploration_depth,
            tags: self.tags.clone(),
            output_folder_path: self.output_folder_path.clone(),
            concurrency: self.concurrency,
            request_timeout_secs: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = match build_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("invalid configuration");
        }
    };

    handle_crawl(&config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_glean=info,warn"),
            1 => EnvFilter::new("sumi_glean=debug,info"),
            2 => EnvFilter::new("sumi_glean=trace,debug"),
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

/// Handles the main crawl operation and saves its results
async fn handle_crawl(config: &Config, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} (max depth {}, {} workers)",
        config.base_url(),
        config.max_exploration_depth,
        config.concurrency
    );
    tracing::debug!("Extracting tags: {}", config.tags);

    let outcome = match run_crawl(config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context("crawl failed");
        }
    };

    let timestamp = chrono::Utc::now().timestamp();
    let path = save_results(
        &FsSink::new(),
        &outcome.state,
        &config.output_folder_path,
        &config.domain,
        timestamp,
    )
    .with_context(|| {
        format!(
            "failed to save results to {}",
            config.output_folder_path.display()
        )
    })?;

    tracing::info!(
        "Saved data for the domain: {} to the file path: {}",
        config.domain,
        path.display()
    );

    if !quiet {
        print_statistics(&outcome.stats);
    }

    Ok(())
}
