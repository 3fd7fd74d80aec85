// src/crawl/queue.rs
// =============================================================================
// The deduplicating work queue shared by every crawl worker.
//
// How it works:
// 1. A worker calls add(task) for every link it finds
// 2. add() checks the visited set; a URL seen before is silently ignored
// 3. A new URL is recorded as visited and the task is sent on a bounded
//    channel
// 4. The dispatcher is the only reader of that channel (PendingTasks)
//
// The check, the insert and the send happen while one mutex is held, so two
// workers adding the same URL at the same time can never both succeed. A URL
// stays visited forever, even if fetching it later fails.
//
// Backpressure:
// - The channel is bounded; when it is full, add() waits for room
// - Only workers call add(), and the dispatcher never waits on a worker,
//   so the dispatcher keeps draining and a waiting add() always finishes
//
// Rust concepts:
// - Arc: Shared ownership of the queue between many tasks
// - tokio::sync::Mutex: A lock that can be held across .await
// - mpsc channel: Many producers (workers), one consumer (dispatcher)
// =============================================================================

use super::CrawlTask;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Handle used to schedule tasks. Cheap to clone; all clones share the same
/// visited set and channel.
#[derive(Debug, Clone)]
pub struct DedupQueue {
    inner: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    visited: Mutex<HashSet<String>>,
    sender: mpsc::Sender<CrawlTask>,
}

/// The receiving end of the queue, owned by the dispatcher.
#[derive(Debug)]
pub struct PendingTasks {
    receiver: mpsc::Receiver<CrawlTask>,
}

/// Creates a queue that holds at most `capacity` pending tasks.
///
/// A capacity of zero is treated as one (a channel needs room for at least
/// one message).
pub fn dedup_queue(capacity: usize) -> (DedupQueue, PendingTasks) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));

    let queue = DedupQueue {
        inner: Arc::new(Shared {
            visited: Mutex::new(HashSet::new()),
            sender,
        }),
    };

    (queue, PendingTasks { receiver })
}

impl DedupQueue {
    // Schedules a task unless its URL was scheduled before
    //
    // Parameters:
    //   task: the URL to crawl and the depth it has left
    //
    // Returns:
    //   true  = the task is now on the queue
    //   false = the URL was already visited, or the dispatcher has stopped
    //           (in that case the URL is still recorded as visited)
    //
    // Waits while the queue is full. Depth plays no part in the check: the
    // first task to reach a URL wins.
    pub async fn add(&self, task: CrawlTask) -> bool {
        // One lock covers the check, the insert and the send
        let mut visited = self.inner.visited.lock().await;

        // insert() returns false when the URL was already there
        if !visited.insert(task.url.clone()) {
            tracing::trace!(url = %task.url, "already visited");
            return false;
        }

        // Still holding the lock: nobody else can see this URL as visited
        // before its task is actually queued
        match self.inner.sender.send(task).await {
            Ok(()) => true,
            Err(mpsc::error::SendError(task)) => {
                // The receiver was closed at shutdown; the task goes nowhere
                tracing::debug!(url = %task.url, "crawl has stopped, dropping task");
                false
            }
        }
    }

    /// Number of distinct URLs ever scheduled.
    pub async fn visited_count(&self) -> usize {
        self.inner.visited.lock().await.len()
    }

    /// Whether `url` has been scheduled.
    #[cfg(test)]
    pub async fn is_visited(&self, url: &str) -> bool {
        self.inner.visited.lock().await.contains(url)
    }
}

impl PendingTasks {
    /// Waits for the next task. Returns None only once every DedupQueue
    /// handle is gone.
    pub async fn next(&mut self) -> Option<CrawlTask> {
        self.receiver.recv().await
    }

    /// Takes a task if one is ready, without waiting.
    #[cfg(test)]
    pub fn try_next(&mut self) -> Option<CrawlTask> {
        self.receiver.try_recv().ok()
    }

    /// Stops accepting tasks. Any add() waiting for room gives up, and later
    /// adds only record their URL.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::sync::Mutex and not std::sync::Mutex?
//    - add() keeps the lock while it waits for room in the channel
//    - Waiting is an .await, and a std MutexGuard must not be held across
//      an .await (it would block the whole thread and is not Send)
//    - tokio's Mutex is designed for exactly this
//
// 2. What does HashSet::insert return?
//    - true if the value was not there before, false otherwise
//    - So one call both checks and records the URL
//
// 3. Why return the task inside SendError?
//    - When a channel is closed, send() hands the value back to you
//    - That way nothing is lost silently; we log it and drop it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_enqueues_new_url() {
        let (queue, mut pending) = dedup_queue(4);

        assert!(queue.add(CrawlTask::new("http://a/", 2)).await);
        assert_eq!(pending.try_next(), Some(CrawlTask::new("http://a/", 2)));
        assert_eq!(pending.try_next(), None);
    }

    #[tokio::test]
    async fn test_add_is_idempotent_regardless_of_depth() {
        let (queue, mut pending) = dedup_queue(4);

        assert!(queue.add(CrawlTask::new("http://a/", 2)).await);
        assert!(!queue.add(CrawlTask::new("http://a/", 2)).await);
        assert!(!queue.add(CrawlTask::new("http://a/", 9)).await);

        assert_eq!(pending.try_next(), Some(CrawlTask::new("http://a/", 2)));
        assert_eq!(pending.try_next(), None);
        assert_eq!(queue.visited_count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_schedule_each_url_once() {
        let (queue, mut pending) = dedup_queue(256);

        // 8 tasks each adding the same 20 URLs
        let mut handles = Vec::new();
        for _ in 0..8 {
            let queue = queue.clone();
            handles.push(tokio::spawn(async move {
                let mut added = 0;
                for i in 0..20 {
                    if queue.add(CrawlTask::new(format!("http://site/{i}"), 1)).await {
                        added += 1;
                    }
                }
                added
            }));
        }

        let mut total_added = 0;
        for handle in handles {
            total_added += handle.await.unwrap();
        }
        assert_eq!(total_added, 20);

        let mut urls = HashSet::new();
        while let Some(task) = pending.try_next() {
            assert!(urls.insert(task.url), "URL dequeued twice");
        }
        assert_eq!(urls.len(), 20);
    }

    #[tokio::test]
    async fn test_full_queue_waits_for_room() {
        let (queue, mut pending) = dedup_queue(1);
        assert!(queue.add(CrawlTask::new("http://a/", 1)).await);

        let producer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.add(CrawlTask::new("http://b/", 1)).await })
        };

        // Draining makes room for the blocked add
        assert_eq!(pending.next().await.unwrap().url, "http://a/");
        assert!(producer.await.unwrap());
        assert_eq!(pending.next().await.unwrap().url, "http://b/");
    }

    #[tokio::test]
    async fn test_add_after_close_records_but_drops() {
        let (queue, mut pending) = dedup_queue(2);
        pending.close();

        assert!(!queue.add(CrawlTask::new("http://a/", 1)).await);
        assert!(queue.is_visited("http://a/").await);
        assert_eq!(pending.try_next(), None);
    }

    #[test]
    fn test_zero_capacity_is_usable() {
        // Must not panic: tokio channels reject a capacity of zero
        let (_queue, _pending) = dedup_queue(0);
    }
}
