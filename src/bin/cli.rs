//! dcgall CLI
//!
//! Thin driver around the library: loads a crawler configuration from a
//! TOML file and runs the crawl to completion. All crawl semantics live
//! in the library; the CLI only wires configuration and logging.

use std::path::PathBuf;

use clap::Parser;
use dcgall::{crawler::GalleryCrawler, error::Result, models::CrawlerConfig};

/// dcgall - DCInside gallery article crawler
#[derive(Parser, Debug)]
#[command(name = "dcgall", version, about = "Crawls gallery articles into a JSONL archive")]
struct Cli {
    /// Path to the crawler configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the output JSONL path from the config file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip comment extraction regardless of the config file
    #[arg(long)]
    no_comments: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = CrawlerConfig::load(&cli.config)?;
    log::info!("Loaded configuration from {}", cli.config.display());

    if let Some(output) = cli.output {
        config.jsonl_path = output;
    }
    if cli.no_comments {
        config.is_crawl_comments = false;
    }

    let jsonl_path = config.jsonl_path.clone();
    let crawler = GalleryCrawler::new(config)?;
    let summary = crawler.run().await?;

    log::info!(
        "Done: {} articles appended to {} ({} duplicates skipped, {} failures)",
        summary.collected,
        jsonl_path.display(),
        summary.duplicates_skipped,
        summary.parse_failures
    );

    Ok(())
}
