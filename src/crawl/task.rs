// src/crawl/task.rs
// One unit of crawl work.

/// A URL waiting to be fetched, and how many more link hops may be followed
/// from it.
///
/// A task with `depth_remaining <= 0` is still scheduled (its URL counts as
/// visited) but is never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth_remaining: i64,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth_remaining: i64) -> Self {
        Self {
            url: url.into(),
            depth_remaining,
        }
    }

    /// Whether this task should be fetched at all
    pub fn is_fetchable(&self) -> bool {
        self.depth_remaining > 0
    }

    /// The task for a link found on this task's page
    pub fn child(&self, link: impl Into<String>) -> Self {
        Self::new(link, self.depth_remaining - 1)
    }
}
