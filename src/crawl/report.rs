// src/crawl/report.rs
// =============================================================================
// Where the per-fetch diagnostics go.
//
// Every fetch attempt produces exactly one event: the page was found, or the
// fetch failed. Workers hand those events to a Reporter. The CLI prints them
// on stdout (as text or JSON lines); tests record them in memory.
//
// Rust concepts:
// - Trait objects: Arc<dyn Reporter> shared by all workers
// - serde: #[serde(tag = "...")] to write an enum as a flat JSON object
// =============================================================================

use crate::fetch::FetchError;
use serde::Serialize;
use std::sync::Mutex;

/// One diagnostic, in a form that can be printed or serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// The page was fetched
    Found { url: String, body: String },
    /// The fetch failed; `error` is the error's message
    Failed { url: String, error: String },
}

impl CrawlEvent {
    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Found { url, .. } | CrawlEvent::Failed { url, .. } => url,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, CrawlEvent::Found { .. })
    }
}

/// Receives the outcome of every fetch attempt.
///
/// Called concurrently from many workers, so no ordering between calls is
/// promised.
pub trait Reporter: Send + Sync {
    fn found(&self, url: &str, body: &str);
    fn failed(&self, error: &FetchError);
}

/// How StdoutReporter formats its lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `found: {url} "{body}"` or the error message
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Prints one line per fetch attempt on stdout.
#[derive(Debug, Clone, Default)]
pub struct StdoutReporter {
    format: OutputFormat,
}

impl StdoutReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an event as the line that would be printed.
    pub fn render(&self, event: &CrawlEvent) -> String {
        match self.format {
            OutputFormat::Text => match event {
                // {:?} quotes and escapes the body
                CrawlEvent::Found { url, body } => format!("found: {} {:?}", url, body),
                CrawlEvent::Failed { error, .. } => error.clone(),
            },
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "could not serialize crawl event");
                    String::new()
                }
            },
        }
    }

    fn emit(&self, event: CrawlEvent) {
        let line = self.render(&event);
        if !line.is_empty() {
            println!("{}", line);
        }
    }
}

impl Reporter for StdoutReporter {
    fn found(&self, url: &str, body: &str) {
        self.emit(CrawlEvent::Found {
            url: url.to_string(),
            body: body.to_string(),
        });
    }

    fn failed(&self, error: &FetchError) {
        self.emit(CrawlEvent::Failed {
            url: error.url().to_string(),
            error: error.to_string(),
        });
    }
}

/// Keeps every event in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<CrawlEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the events reported so far
    pub fn events(&self) -> Vec<CrawlEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: CrawlEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl Reporter for MemoryReporter {
    fn found(&self, url: &str, body: &str) {
        self.push(CrawlEvent::Found {
            url: url.to_string(),
            body: body.to_string(),
        });
    }

    fn failed(&self, error: &FetchError) {
        self.push(CrawlEvent::Failed {
            url: error.url().to_string(),
            error: error.to_string(),
        });
    }
}
