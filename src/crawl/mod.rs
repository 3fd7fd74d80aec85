// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Pieces:
// - task: CrawlTask, a URL plus how many more link hops may follow it
// - queue: The deduplicating work queue (each URL is scheduled at most once)
// - worker: Fetches one task and feeds its links back into the queue
// - dispatch: The loop that spawns a worker per task and stops when idle
// - report: Where "found" and failure diagnostics are written
//
// Control flow:
//   dispatcher pulls a task -> spawns a worker -> worker calls the Fetcher
//   -> worker adds child tasks to the queue -> dispatcher pulls those
//
// The queue is the only shared state. Everything else a worker touches is
// owned by that worker.
// =============================================================================

mod dispatch;
mod queue;
mod report;
mod task;
mod worker;

pub use dispatch::{run_crawl, CrawlSummary, Dispatcher};
pub use queue::{dedup_queue, DedupQueue, PendingTasks};
pub use report::{CrawlEvent, MemoryReporter, OutputFormat, Reporter, StdoutReporter};
pub use task::CrawlTask;
pub use worker::crawl;
