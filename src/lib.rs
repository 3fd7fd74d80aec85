// src/lib.rs
// =============================================================================
// link-crawler: a bounded-depth concurrent web crawler.
//
// Starting from a seed URL, every page is fetched, its links are scheduled
// one level shallower, and each distinct URL is visited at most once. The
// crawl ends when no new task has shown up for an idle interval.
//
// Modules:
// - config: CrawlConfig and its defaults
// - crawl: The queue, workers and dispatch loop
// - fetch: The Fetcher trait plus fixture and HTTP implementations
// =============================================================================

pub mod config;
pub mod crawl;
pub mod fetch;

pub use config::{ConfigError, CrawlConfig, ShutdownMode};
pub use crawl::{run_crawl, CrawlSummary};
pub use fetch::{FetchError, Fetcher, Page};
