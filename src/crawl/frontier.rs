// src/crawl/frontier.rs
// =============================================================================
// The shared state that crawl workers coordinate through.
//
// - Frontier: pending CrawlTasks, grouped by depth, with drain accounting
// - VisitedSet: every URL some worker has already claimed
//
// Drain accounting:
//   For every depth we count tasks that were enqueued but not yet marked
//   done. A task only counts as done after the worker has finished with it,
//   including enqueueing the links it discovered. So an empty count map
//   means the queue is empty and nobody is about to add to it. That is the
//   session's completion condition.
//
// Depth levels:
//   Only tasks of the shallowest unfinished depth are handed out. Depth d+1
//   starts once every depth-d task is done, so a URL is always claimed at
//   its shortest distance from the seed, whatever order pages finish in.
//
// Locks are only held for a push, a pop or a set insert. Nothing here is
// ever locked across an .await.
// =============================================================================

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::pin::pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{timeout_at, Instant};

// One unit of work: fetch `url`, which is `depth` link hops from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: usize,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

// A poisoned lock only means another worker panicked mid-push; the data is
// still a valid queue/set, so keep going.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct Levels {
    // Tasks not yet handed out, per depth
    queued: BTreeMap<usize, VecDeque<CrawlTask>>,
    // Tasks enqueued but not marked done, per depth; zero entries are removed
    pending: BTreeMap<usize, usize>,
}

impl Levels {
    fn push(&mut self, task: CrawlTask) {
        *self.pending.entry(task.depth).or_insert(0) += 1;
        self.queued.entry(task.depth).or_default().push_back(task);
    }

    // Next task of the shallowest unfinished depth, if one is waiting
    fn pop_current(&mut self) -> Option<CrawlTask> {
        let depth = *self.pending.keys().next()?;
        let queue = self.queued.get_mut(&depth)?;
        let task = queue.pop_front();
        if queue.is_empty() {
            self.queued.remove(&depth);
        }
        task
    }

    // Returns true if this finished the task's depth level
    fn finish(&mut self, depth: usize) -> bool {
        let Some(count) = self.pending.get_mut(&depth) else {
            debug_assert!(false, "mark_done without a matching enqueue");
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.pending.remove(&depth);
            return true;
        }
        false
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    levels: Mutex<Levels>,
    // Woken when a task is pushed, a depth level finishes or the frontier drains
    activity: Notify,
    // Woken when the last pending task is marked done
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task. Always succeeds.
    pub fn enqueue(&self, task: CrawlTask) {
        lock(&self.levels).push(task);
        self.activity.notify_one();
    }

    /// Waits up to `wait` for a task
    ///
    /// Returns None if nothing could be handed out in time, or right away
    /// once the frontier is drained.
    pub async fn dequeue(&self, wait: Duration) -> Option<CrawlTask> {
        let deadline = Instant::now() + wait;
        loop {
            // Register interest before checking, so a push between the check
            // and the await still wakes us
            let mut notified = pin!(self.activity.notified());
            notified.as_mut().enable();

            {
                let mut levels = lock(&self.levels);
                if let Some(task) = levels.pop_current() {
                    return Some(task);
                }
                if levels.pending.is_empty() {
                    return None;
                }
            }

            if timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }

    /// Acknowledges a dequeued task, whatever happened to it
    pub fn mark_done(&self, task: &CrawlTask) {
        let (level_finished, drained) = {
            let mut levels = lock(&self.levels);
            let finished = levels.finish(task.depth);
            (finished, levels.pending.is_empty())
        };
        if drained {
            self.drained.notify_waiters();
        }
        if level_finished {
            // Either the next depth is open now, or there is nothing left
            self.activity.notify_waiters();
        }
    }

    /// True once every enqueued task has been marked done
    pub fn is_drained(&self) -> bool {
        lock(&self.levels).pending.is_empty()
    }

    /// Number of tasks enqueued but not yet marked done
    pub fn pending(&self) -> usize {
        lock(&self.levels).pending.values().sum()
    }

    /// Resolves once the frontier is drained
    pub async fn await_drain(&self) {
        loop {
            let mut notified = pin!(self.drained.notified());
            notified.as_mut().enable();
            if self.is_drained() {
                return;
            }
            notified.await;
        }
    }
}

// URLs already claimed by a worker in this session
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller
    ///
    /// Returns true exactly once per URL; every later call returns false.
    pub fn claim(&self, url: &str) -> bool {
        let mut urls = lock(&self.urls);
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        lock(&self.urls).len()
    }
}
