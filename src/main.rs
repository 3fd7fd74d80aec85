// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr, filtered with RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Build the fetcher and reporter the crawl should use
// 4. Run the crawl until it goes idle, then exit
//
// stdout carries only the crawl diagnostics (one line per fetch), so it can
// be piped somewhere else; logs never mix into it.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, FetcherKind};
use link_crawler::crawl::{self, StdoutReporter};
use link_crawler::fetch::{Fetcher, FixtureFetcher, HttpFetcher};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Per-request timeout for the http fetcher
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    setup_tracing();

    // A crawl always ends on its idle timeout, so only setup errors get a
    // distinct exit code
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.crawl_config();
    config.validate().context("invalid crawl settings")?;

    let fetcher = build_fetcher(&cli, config.seed_host())?;
    let reporter = Arc::new(StdoutReporter::new(cli.output_format()));

    tracing::info!(
        seed = %config.seed,
        max_depth = config.max_depth,
        idle_timeout = ?config.idle_timeout,
        fetcher = ?cli.fetcher,
        "starting crawl"
    );

    let summary = crawl::run_crawl(&config, fetcher, reporter).await;

    tracing::info!(
        dispatched = summary.dispatched,
        visited = summary.visited,
        in_flight = summary.in_flight_at_shutdown,
        elapsed = ?summary.elapsed,
        "crawl finished"
    );

    Ok(())
}

fn build_fetcher(cli: &Cli, seed_host: Option<String>) -> Result<Arc<dyn Fetcher>> {
    match cli.fetcher {
        FetcherKind::Fixture => Ok(Arc::new(FixtureFetcher::golang())),
        FetcherKind::Http => {
            let mut fetcher =
                HttpFetcher::new(HTTP_TIMEOUT).context("could not build the HTTP client")?;

            if cli.same_host {
                let host = seed_host.context("--same-host needs a seed URL with a host")?;
                fetcher = fetcher.restrict_to_host(host);
            }

            Ok(Arc::new(fetcher))
        }
    }
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
