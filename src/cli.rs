// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Every argument has a
// default, so running `link-crawler` with no arguments crawls the built-in
// golang.org fixture to depth 4.
//
// Rust concepts:
// - Derive macros: Parser and ValueEnum generate the parsing code
// - Conversions: Cli is turned into the library's CrawlConfig
// =============================================================================

use clap::{Parser, ValueEnum};
use link_crawler::config::{
    DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_DEPTH, DEFAULT_QUEUE_CAPACITY, DEFAULT_SEED,
};
use link_crawler::crawl::OutputFormat;
use link_crawler::{CrawlConfig, ShutdownMode};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version = "0.1.0",
    about = "Crawl a site to a fixed depth, visiting every URL at most once",
    long_about = "link-crawler fetches the seed URL, follows every link it finds one level \
                  deeper at a time, and stops once no new page has been queued for the idle \
                  timeout. Each fetch prints one line: the page that was found or the error."
)]
pub struct Cli {
    /// URL to start crawling from
    #[arg(default_value = DEFAULT_SEED)]
    pub seed: String,

    /// How many link hops to follow (the seed itself counts as one)
    ///
    /// Zero or a negative number schedules the seed without fetching it
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, allow_negative_numbers = true)]
    pub max_depth: i64,

    /// Stop after this many milliseconds without a new task
    #[arg(long, default_value_t = DEFAULT_IDLE_TIMEOUT.as_millis() as u64)]
    pub idle_timeout_ms: u64,

    /// Pending tasks held before workers have to wait
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Where pages come from
    #[arg(long, value_enum, default_value_t = FetcherKind::Fixture)]
    pub fetcher: FetcherKind,

    /// Only follow links on the seed's host (http fetcher)
    #[arg(long)]
    pub same_host: bool,

    /// Wait for in-flight fetches to finish after the idle timeout
    #[arg(long)]
    pub drain: bool,

    /// Print one JSON object per fetch instead of text lines
    #[arg(long)]
    pub json: bool,
}

/// The available Fetcher implementations
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherKind {
    /// Built-in golang.org link graph, no network access
    Fixture,
    /// Real HTTP requests
    Http,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            seed: self.seed.clone(),
            max_depth: self.max_depth,
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            queue_capacity: self.queue_capacity,
            shutdown: if self.drain {
                ShutdownMode::Drain
            } else {
                ShutdownMode::Abandon
            },
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_defaults() {
        let cli = Cli::parse_from(["link-crawler"]);
        assert_eq!(cli.crawl_config(), CrawlConfig::default());
        assert_eq!(cli.fetcher, FetcherKind::Fixture);
        assert_eq!(cli.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "link-crawler",
            "https://example.com/",
            "--max-depth",
            "2",
            "--idle-timeout-ms",
            "500",
            "--fetcher",
            "http",
            "--drain",
            "--json",
        ]);

        let config = cli.crawl_config();
        assert_eq!(config.seed, "https://example.com/");
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.idle_timeout, Duration::from_millis(500));
        assert_eq!(config.shutdown, ShutdownMode::Drain);
        assert_eq!(cli.fetcher, FetcherKind::Http);
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_negative_max_depth() {
        let cli = Cli::parse_from(["link-crawler", "--max-depth", "-1"]);
        assert_eq!(cli.crawl_config().max_depth, -1);
        assert_eq!(cli.seed, DEFAULT_SEED);
    }
}
