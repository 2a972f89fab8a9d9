// src/crawl/session.rs
// =============================================================================
// This module runs a crawl session with a pool of concurrent workers.
//
// How it works:
// 1. Put the seed URL in the frontier at depth 0
// 2. Spawn `workers` tasks that all run the same loop:
//      dequeue -> depth check -> claim -> fetch -> extract -> filter ->
//      merge words -> enqueue in-scope links at depth + 1 -> mark done
// 3. Wait until the frontier is drained (nothing queued, nothing in flight)
// 4. Return the sorted word set
//
// The frontier hands out one depth level at a time, so every URL is claimed
// at its shortest depth. The word set does not depend on the worker count or
// on how fast individual pages respond.
//
// Failures are per URL: a page that cannot be fetched contributes nothing
// and the session carries on. A session never fails once it has started.
//
// All state (frontier, visited set, words) lives in one Session value that
// is created per crawl and dropped when it ends.
// =============================================================================

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::aggregator::Aggregator;
use super::fetch::{FetchError, Fetcher};
use super::frontier::{CrawlTask, Frontier, VisitedSet};
use super::scope::{DomainScope, ScopeError};
use crate::config::CrawlConfig;
use crate::extract::{self, crawlable};

// What happened to one dequeued task
#[derive(Debug)]
enum TaskOutcome {
    Skipped(SkipReason),
    Failed(FetchError),
    Crawled { words: usize, links: usize },
}

#[derive(Debug)]
enum SkipReason {
    TooDeep,
    AlreadyVisited,
    NotCrawlable,
}

// Everything the workers of one session share
struct Session {
    config: Arc<CrawlConfig>,
    fetcher: Arc<dyn Fetcher>,
    scope: DomainScope,
    frontier: Frontier,
    visited: VisitedSet,
    words: Aggregator,
}

// Summary of a finished session, mostly for logging and tests
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub words: Vec<String>,
    pub pages_claimed: usize,
}

// Runs crawl sessions against a fetcher
#[derive(Clone)]
pub struct Crawler {
    config: Arc<CrawlConfig>,
    fetcher: Arc<dyn Fetcher>,
}

impl Crawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
        }
    }

    /// Crawls every configured target and returns the union of their words
    ///
    /// Each target gets its own session (own scope and visited set).
    pub async fn run(&self) -> Vec<String> {
        let mut all = HashSet::new();
        for target in &self.config.targets {
            match self.crawl(target).await {
                Ok(report) => all.extend(report.words),
                Err(e) => warn!("skipping target {}: {}", target, e),
            }
        }
        let mut words: Vec<String> = all.into_iter().collect();
        words.sort();
        words
    }

    /// Runs one session starting from `seed`
    pub async fn crawl(&self, seed: &Url) -> Result<CrawlReport, ScopeError> {
        let scope = DomainScope::for_seed(self.config.mode, seed)?;
        info!(
            "crawling {} (mode {:?}, base domain {}, depth {}, {} workers)",
            seed,
            scope.mode(),
            scope.base_domain(),
            self.config.max_depth,
            self.config.workers
        );

        let session = Arc::new(Session {
            config: Arc::clone(&self.config),
            fetcher: Arc::clone(&self.fetcher),
            scope,
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            words: Aggregator::new(),
        });

        session.frontier.enqueue(CrawlTask::new(seed.as_str(), 0));

        let workers = (0..self.config.workers).map(|id| {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.work(id).await })
        });
        let handles: Vec<_> = workers.collect();

        session.frontier.await_drain().await;
        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!("crawl worker stopped abnormally: {}", e);
            }
        }

        let report = CrawlReport {
            words: session.words.collect(),
            pages_claimed: session.visited.len(),
        };
        info!(
            "finished {}: {} page(s) claimed, {} word(s)",
            seed,
            report.pages_claimed,
            report.words.len()
        );
        Ok(report)
    }
}

impl Session {
    // The worker loop. Exits once the frontier is drained.
    async fn work(&self, id: usize) {
        loop {
            let task = match self.frontier.dequeue(self.config.idle_wait).await {
                Some(task) => task,
                None if self.frontier.is_drained() => break,
                // Another worker is still busy and may enqueue more links
                None => continue,
            };

            match self.process(&task).await {
                TaskOutcome::Crawled { words, links } => {
                    debug!(
                        worker = id,
                        depth = task.depth,
                        words,
                        links,
                        pending = self.frontier.pending(),
                        "crawled {}",
                        task.url
                    )
                }
                TaskOutcome::Skipped(reason) => {
                    debug!(worker = id, ?reason, "skipped {}", task.url)
                }
                TaskOutcome::Failed(e) => {
                    debug!(worker = id, "failed {}: {}", task.url, e)
                }
            }

            self.frontier.mark_done(&task);
        }
        debug!(worker = id, "frontier drained, worker exiting");
    }

    async fn process(&self, task: &CrawlTask) -> TaskOutcome {
        if task.depth > self.config.max_depth {
            return TaskOutcome::Skipped(SkipReason::TooDeep);
        }

        let Some(url) = Url::parse(&task.url).ok().and_then(crawlable) else {
            return TaskOutcome::Skipped(SkipReason::NotCrawlable);
        };

        if !self.visited.claim(url.as_str()) {
            return TaskOutcome::Skipped(SkipReason::AlreadyVisited);
        }

        let body = match self.fetch(url.as_str()).await {
            Ok(body) => body,
            Err(e) => return TaskOutcome::Failed(e),
        };

        // Parsing happens outside every lock; only the merge below locks
        let page = extract::extract_page(&body, &url);
        let mut raw = page.words;
        raw.extend(extract::extract_url_tokens(url.as_str()));
        let words = self.config.filter.apply(raw);
        let word_count = words.len();
        self.words.merge(words);

        let mut queued = 0;
        for link in page.links {
            if self.scope.allows(&link) {
                self.frontier.enqueue(CrawlTask::new(link, task.depth + 1));
                queued += 1;
            }
        }

        TaskOutcome::Crawled {
            words: word_count,
            links: queued,
        }
    }

    // The engine enforces the timeout too, in case a fetcher ignores it
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let limit = self.config.fetch_timeout;
        match tokio::time::timeout(limit, self.fetcher.fetch(url, limit)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(limit)),
        }
    }
}
