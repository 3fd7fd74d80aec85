// src/fetch/mod.rs
// =============================================================================
// This module defines how the crawler gets pages.
//
// The crawl engine never talks to the network directly. Instead it asks a
// `Fetcher` for a URL and gets back either a `Page` (the body plus the links
// found on it) or a `FetchError`.
//
// Submodules:
// - fixture: A canned link graph, used by default and in tests
// - http: A real fetcher built on reqwest + scraper
//
// Rust concepts:
// - Traits: The `Fetcher` capability, with one implementation per backend
// - BoxFuture: An async method on a trait object (dyn Fetcher)
// - thiserror: Deriving std::error::Error for our error enum
// =============================================================================

mod fixture;
mod http;

pub use fixture::FixtureFetcher;
pub use http::{extract_page_links, page_title, HttpFetcher};

use futures::future::BoxFuture;
use thiserror::Error;

/// What a successful fetch returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// Text reported for the page in the crawl diagnostics
    pub body: String,
    /// Absolute URLs found on the page, in document order
    pub links: Vec<String>,
}

impl Page {
    pub fn new(body: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            body: body.into(),
            links,
        }
    }
}

/// Why a URL could not be fetched.
///
/// Every variant carries the URL so a worker can report the failure without
/// keeping any extra context around.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher has no page for this URL
    #[error("not found: {url}")]
    NotFound { url: String },

    /// The server answered, but not with a 2xx status
    #[error("{url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The request itself failed (DNS, TLS, timeout, ...). reqwest's own
    /// message already names the URL
    #[error("request failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            FetchError::NotFound { url }
            | FetchError::Status { url, .. }
            | FetchError::Request { url, .. } => url,
        }
    }
}

/// The capability the crawl engine needs: turn a URL into a `Page`.
///
/// Implementations must not rely on any state of the caller. They are shared
/// between all workers (behind an `Arc`), so they must be `Send + Sync`.
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why BoxFuture instead of `async fn` in the trait?
//    - The dispatcher stores the fetcher as Arc<dyn Fetcher>
//    - Trait objects need a concrete return type, and every async block has
//      its own anonymous type
//    - Boxing the future (BoxFuture = Pin<Box<dyn Future + Send>>) gives all
//      implementations the same return type
//
// 2. What does #[source] do?
//    - It tells thiserror which field is the underlying cause
//    - Callers can walk the chain with std::error::Error::source()
//
// 3. Why `|` in the match arms of url()?
//    - Or-patterns let several variants share one arm when they bind the
//      same names with the same types
// -----------------------------------------------------------------------------
