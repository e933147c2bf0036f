//! Spindel main entry point
//!
//! This is the command-line interface for the Spindel same-site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use spindel::config::{load_config_with_hash, validate, Config};
use spindel::crawler::{CrawlReport, Crawler};
use spindel::logging::{init_logging, init_logging_stderr, LogLevel, FATAL_TARGET};
use spindel::output::print_report;
use spindel::url::LinkBase;
use std::path::PathBuf;
use std::process::ExitCode;

/// Spindel: a same-site concurrent web crawler
///
/// Spindel starts from one seed URL and follows every link that stays on the
/// seed's host, fetching and parsing pages in two parallel worker pools
/// until no work is left.
#[derive(Parser, Debug)]
#[command(name = "spindel")]
#[command(version)]
#[command(about = "A same-site concurrent web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (overrides the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent fetch workers
    #[arg(long, value_name = "N")]
    fetch_workers: Option<usize>,

    /// Number of concurrent parse workers
    #[arg(long, value_name = "N")]
    parse_workers: Option<usize>,

    /// Attempts per URL on transport failures
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// What relative links are resolved against
    #[arg(long, value_enum)]
    link_base: Option<LinkBase>,

    /// Minimum severity to log
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Append log entries to this file as well as stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print every visited URL in the summary
    #[arg(long)]
    list_urls: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything below errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) => {
            print_report(&report, cli.list_urls);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Logging may not be set up yet if the configuration failed.
            init_logging_stderr(LogLevel::Error);
            tracing::error!(target: FATAL_TARGET, "FATAL: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<CrawlReport> {
    let (config, config_hash) = resolve_config(cli)?;

    setup_logging(cli, &config);

    if let Some(hash) = config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    let crawler = Crawler::from_config(&config).context("Failed to set up crawler")?;

    let tracker = crawler.tracker();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing pages already queued");
            tracker.cancel();
        }
    });

    let report = crawler.run().await.context("Crawl failed")?;
    Ok(report)
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match (&cli.config, &cli.seed) {
        (Some(path), _) => {
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?;
            (config, Some(hash))
        }
        (None, Some(seed)) => (Config::for_seed(seed), None),
        (None, None) => bail!("a seed URL or --config is required"),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(n) = cli.fetch_workers {
        config.crawler.fetch_workers = n;
    }
    if let Some(n) = cli.parse_workers {
        config.crawler.parse_workers = n;
    }
    if let Some(n) = cli.max_attempts {
        config.crawler.max_attempts = n;
    }
    if let Some(link_base) = cli.link_base {
        config.crawler.link_base = link_base;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }

    validate(&config).context("Invalid configuration")?;

    Ok((config, hash))
}

/// Sets up the tracing subscriber from the configured level and verbosity flags
fn setup_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        LogLevel::Error
    } else {
        config.logging.level.raised(cli.verbose)
    };

    if let Err(e) = init_logging(level, config.logging.file.as_deref()) {
        init_logging_stderr(level);
        tracing::warn!("Logging to stderr only: {}", e);
    }
}
