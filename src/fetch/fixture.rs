// src/fetch/fixture.rs
// =============================================================================
// A fetcher that serves pages from an in-memory link graph.
//
// It is the default fetcher of the CLI (so the crawler can be tried without
// touching the network) and the fetcher every test uses. Any URL not in the
// graph fails with FetchError::NotFound.
// =============================================================================

use super::{FetchError, Fetcher, Page};
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;

/// Canned pages keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, Page>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the page served for `url`.
    pub fn with_page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        let links = links.iter().map(|link| link.to_string()).collect();
        self.pages.insert(url.to_string(), Page::new(body, links));
        self
    }

    /// The golang.org graph: four pages, plus a link to /cmd/ that is
    /// never served.
    pub fn golang() -> Self {
        Self::new()
            .with_page(
                "http://golang.org/",
                "The Go Programming Language",
                &["http://golang.org/pkg/", "http://golang.org/cmd/"],
            )
            .with_page(
                "http://golang.org/pkg/",
                "Packages",
                &[
                    "http://golang.org/",
                    "http://golang.org/cmd/",
                    "http://golang.org/pkg/fmt/",
                    "http://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "http://golang.org/pkg/fmt/",
                "Package fmt",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
            .with_page(
                "http://golang.org/pkg/os/",
                "Package os",
                &["http://golang.org/", "http://golang.org/pkg/"],
            )
    }
}

impl Fetcher for FixtureFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>> {
        let result = match self.pages.get(url) {
            Some(page) => Ok(page.clone()),
            None => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
        };
        future::ready(result).boxed()
    }
}
