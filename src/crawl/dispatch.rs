// src/crawl/dispatch.rs
// =============================================================================
// The dispatch loop: the only long-lived piece of the crawler.
//
// How it works:
// 1. Wait for either the next pending task or the idle timer
// 2. A task is spawned as its own tokio task and the idle timer restarts
// 3. When the timer fires, the crawl is over
//
// There is no "all done" signal. Workers keep feeding the queue while they
// find new links; once nothing has been dequeued for a whole idle interval
// the crawl is considered finished. Workers still running at that point are
// aborted (ShutdownMode::Abandon) or awaited (ShutdownMode::Drain).
//
// Rust concepts:
// - tokio::select!: Wait on several futures, act on whichever is ready first
// - JoinSet: Owns spawned tasks so they can be reaped or aborted together
// - Pinned Sleep: A timer that can be reset without allocating a new one
// =============================================================================

use super::{dedup_queue, worker, CrawlTask, DedupQueue, PendingTasks, Reporter};
use crate::config::{CrawlConfig, ShutdownMode};
use crate::fetch::Fetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{sleep, Instant};

/// What a finished crawl looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Tasks handed to a worker (including ones with no depth left)
    pub dispatched: usize,
    /// Distinct URLs ever scheduled
    pub visited: usize,
    /// Workers still running when the idle timeout fired
    pub in_flight_at_shutdown: usize,
    pub elapsed: Duration,
}

/// Owns the queue's receiving end and spawns one worker per task.
pub struct Dispatcher {
    queue: DedupQueue,
    pending: PendingTasks,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn Reporter>,
    idle_timeout: Duration,
    shutdown: ShutdownMode,
}

impl Dispatcher {
    pub fn new(
        config: &CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let (queue, pending) = dedup_queue(config.queue_capacity);

        Self {
            queue,
            pending,
            fetcher,
            reporter,
            idle_timeout: config.idle_timeout,
            shutdown: config.shutdown,
        }
    }

    /// A handle for scheduling tasks (the seed, typically) before `run`.
    pub fn queue(&self) -> &DedupQueue {
        &self.queue
    }

    // Dispatches tasks until the queue stays silent for the idle timeout
    //
    // Each dequeued task gets its own tokio task (a worker) and restarts the
    // idle timer. Finished workers are reaped as they complete. When the
    // timer fires, the queue is closed and the remaining workers are aborted
    // or awaited, depending on the shutdown mode.
    //
    // Returns: a CrawlSummary describing the whole run
    pub async fn run(mut self) -> CrawlSummary {
        let started = Instant::now();

        // Every spawned worker lives here until it is reaped
        let mut workers = JoinSet::new();
        let mut dispatched = 0;

        // The idle timer; pinned so it can be polled by reference and reset
        let idle = sleep(self.idle_timeout);
        tokio::pin!(idle);

        loop {
            tokio::select! {
                // A ready task always wins over the timer
                biased;

                next = self.pending.next() => {
                    // Unreachable while self.queue holds a sender, kept for
                    // completeness
                    let Some(task) = next else { break };

                    // Silence is measured from the last dequeue
                    idle.as_mut().reset(Instant::now() + self.idle_timeout);
                    dispatched += 1;
                    tracing::debug!(url = %task.url, depth = task.depth_remaining, "dispatching");

                    // Each worker gets its own handles to the shared pieces
                    let fetcher = Arc::clone(&self.fetcher);
                    let reporter = Arc::clone(&self.reporter);
                    let queue = self.queue.clone();
                    workers.spawn(async move {
                        worker::crawl(task, fetcher.as_ref(), &queue, reporter.as_ref()).await;
                    });
                }

                // Reap finished workers so the JoinSet doesn't grow forever.
                // This does not touch the idle timer
                Some(joined) = workers.join_next(), if !workers.is_empty() => {
                    log_join_error(joined);
                }

                () = &mut idle => {
                    tracing::debug!(timeout = ?self.idle_timeout, "idle timeout elapsed");
                    break;
                }
            }
        }

        // Blocked and future add() calls give up instead of waiting on us
        self.pending.close();

        // Abandon: abort whatever is still running. Drain: let it finish
        let in_flight_at_shutdown = workers.len();
        if self.shutdown == ShutdownMode::Abandon {
            workers.abort_all();
        }
        while let Some(joined) = workers.join_next().await {
            log_join_error(joined);
        }

        // All workers are gone, so nothing holds the visited-set lock
        CrawlSummary {
            dispatched,
            visited: self.queue.visited_count().await,
            in_flight_at_shutdown,
            elapsed: started.elapsed(),
        }
    }
}

/// Seeds a dispatcher with `config.seed` and runs it to completion.
pub async fn run_crawl(
    config: &CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn Reporter>,
) -> CrawlSummary {
    let dispatcher = Dispatcher::new(config, fetcher, reporter);

    // The queue has room for at least one task, so this never waits
    dispatcher
        .queue()
        .add(CrawlTask::new(config.seed.clone(), config.max_depth))
        .await;

    dispatcher.run().await
}

// Aborted workers are expected at shutdown; only panics are worth a warning
fn log_join_error(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::warn!(error = %e, "crawl worker panicked");
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `biased;` do in select!?
//    - Normally select! picks a random ready branch (for fairness)
//    - biased; checks branches top to bottom instead
//    - Here it means a waiting task is always dispatched before the timer
//      is allowed to end the crawl
//
// 2. Why reset the Sleep instead of creating a new one each loop?
//    - The timer measures silence since the last dequeue
//    - Reaping a finished worker must not restart it, only a new task does
//
// 3. Why close the receiver before waiting for workers?
//    - A worker may be stuck in add() waiting for room in a full queue
//    - Closing makes that send fail right away, so the worker can finish
//      and nobody waits forever
// -----------------------------------------------------------------------------
