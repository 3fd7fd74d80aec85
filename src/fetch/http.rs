// src/fetch/http.rs
// =============================================================================
// A fetcher that downloads real pages over HTTP.
//
// How it works:
// 1. GET the URL with a shared reqwest client (10 second timeout)
// 2. Treat any non-2xx status as a failure
// 3. Parse the HTML and collect every <a href> as an absolute URL
// 4. Report the page <title> as the body
//
// Links are resolved against the page URL, so "/docs" on
// https://example.com/page becomes https://example.com/docs.
//
// Rust concepts:
// - Client reuse: reqwest::Client pools connections internally
// - Option chaining: and_then / map to filter links without nested ifs
// - Send bounds: scraper::Html is not Send, so it never lives across .await
// =============================================================================

use super::{FetchError, Fetcher, Page};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Fetches pages with reqwest and extracts links with scraper.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    // When set, only links on this host are returned
    host: Option<String>,
}

impl HttpFetcher {
    /// Builds a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, host: None })
    }

    /// Keeps only links whose host equals `host`.
    pub fn restrict_to_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    // Downloads one page and turns it into a Page
    //
    // Parameters:
    //   url: the absolute URL to GET
    //
    // Returns:
    //   Ok(Page) with the <title> text as body and the page's links
    //   Err(FetchError::Status) for any non-2xx answer
    //   Err(FetchError::Request) when the request or body download fails
    async fn fetch_page(&self, url: &str) -> Result<Page, FetchError> {
        // Send the request; DNS, connection and timeout errors end up here
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        // Only 2xx pages are crawled (redirects were already followed)
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        // Download the body as text
        let html = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        // Parsing happens after the last .await, see the note on Send above
        let links = extract_page_links(&html, url, self.host.as_deref());
        Ok(Page::new(page_title(&html), links))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>> {
        self.fetch_page(url).boxed()
    }
}

// Extracts the absolute http(s) links of an HTML page
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links)
//   host: when Some, links to any other host are dropped
//
// Returns: Vec of absolute URLs in document order, without duplicates.
// Fragments are stripped, so "/docs#intro" and "/docs" are the same page.
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='/docs#top'>Top</a>"
//   page_url = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_page_links(html: &str, page_url: &str, host: Option<&str>) -> Vec<String> {
    let mut links = Vec::new();

    // Parse the page URL once; every relative href is resolved against it
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(page_url, "invalid base URL, skipping link extraction");
            return links;
        }
    };

    // All <a> tags that have an href attribute
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    let document = Html::parse_document(html);

    // Links already pushed, so each one is returned once
    let mut seen = HashSet::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        // Skip anchors, mailto:, javascript: and anything that isn't http(s)
        let Some(link) = resolve_link(&base, href) else {
            continue;
        };

        // Stay on the requested host, if any
        if let Some(host) = host {
            if link.host_str() != Some(host) {
                continue;
            }
        }

        let link = link.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// The trimmed text of the page's <title>, or an empty string.
pub fn page_title(html: &str) -> String {
    let selector = match Selector::parse("title") {
        Ok(selector) => selector,
        Err(_) => return String::new(),
    };

    Html::parse_document(html)
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

// Resolves a (possibly relative) href to an absolute crawlable URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Same-page anchors and non-HTTP schemes are never crawled
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `let ... else`?
//    - let Some(x) = value else { continue; };
//    - Binds x if the pattern matches, otherwise runs the else block
//    - The else block must leave the scope (return, continue, break)
//
// 2. Why does base.join() handle absolute links too?
//    - join() follows the same rules as a browser
//    - "https://other.com" joined to anything is just "https://other.com/"
//
// 3. Why a HashSet next to the Vec?
//    - The Vec keeps document order
//    - The HashSet answers "have we already seen this link?" in O(1)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_page_links(html, "https://example.com", None);
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_page_links(html, "https://example.com/page", None);
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_skip_anchor_and_mailto() {
        let html = "<a href=\"#top\">Top</a> <a href=\"mailto:test@example.com\">Email</a>";
        let links = extract_page_links(html, "https://example.com", None);
        assert!(links.is_empty());
    }

    #[test]
    fn test_duplicates_and_fragments_collapse() {
        let html = r#"
            <a href="/docs">Docs</a>
            <a href="/docs#install">Install</a>
            <a href="https://example.com/docs">Docs again</a>
        "#;
        let links = extract_page_links(html, "https://example.com/", None);
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_restrict_to_host() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/about">About</a>
        "#;
        let links = extract_page_links(html, "https://example.com/", Some("example.com"));
        assert_eq!(links, vec!["https://example.com/about"]);
    }

    #[test]
    fn test_invalid_base_url() {
        let links = extract_page_links(r#"<a href="/docs">Docs</a>"#, "not a url", None);
        assert!(links.is_empty());
    }

    #[test]
    fn test_page_title() {
        let html = "<html><head><title>\n  Packages \n</title></head></html>";
        assert_eq!(page_title(html), "Packages");
        assert_eq!(page_title("<p>no title</p>"), "");
    }

    // Serves the same canned HTTP response to every connection on a local
    // port and returns the base URL ("http://127.0.0.1:<port>/")
    async fn serve(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                // Read (and ignore) the request head
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/", addr)
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_page_reports_title_and_links() {
        let base = serve(
            "200 OK",
            "<html><head><title> Hi </title></head><body><a href='/x'>x</a></body></html>",
        )
        .await;

        let page = fetcher().fetch(&base).await.unwrap();

        assert_eq!(page, Page::new("Hi", vec![format!("{}x", base)]));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_status_error() {
        let base = serve("404 Not Found", "<html><body>gone</body></html>").await;

        let err = fetcher().fetch(&base).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(err.url(), base);
    }

    #[tokio::test]
    async fn test_fetch_closed_port_is_request_error() {
        // Bind to get a free port, then close it again
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let err = fetcher().fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Request { .. }));
        assert_eq!(err.url(), url);
        // The message names the URL once (reqwest already includes it)
        assert!(err.to_string().starts_with("request failed: "));
        assert!(err.to_string().matches(url.as_str()).count() <= 1);
    }
}
