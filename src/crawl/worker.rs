// src/crawl/worker.rs
// =============================================================================
// What happens to a single task once the dispatcher hands it out.
//
// 1. Tasks with no depth left are dropped without fetching
// 2. The page is fetched; a failure is reported and the task ends
// 3. A success is reported, then every link on the page is added to the
//    queue one level shallower
//
// Failures are never retried and never stop other workers. The failed URL
// stays in the visited set, so nothing schedules it again.
// =============================================================================

use super::{CrawlTask, DedupQueue, Reporter};
use crate::fetch::Fetcher;

/// Runs one crawl task to completion.
pub async fn crawl(
    task: CrawlTask,
    fetcher: &dyn Fetcher,
    queue: &DedupQueue,
    reporter: &dyn Reporter,
) {
    if !task.is_fetchable() {
        tracing::trace!(url = %task.url, "depth exhausted");
        return;
    }

    let page = match fetcher.fetch(&task.url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!(url = %task.url, error = %e, "fetch failed");
            reporter.failed(&e);
            return;
        }
    };

    reporter.found(&task.url, &page.body);

    for link in page.links {
        queue.add(task.child(link)).await;
    }
}
