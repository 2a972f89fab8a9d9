// src/crawl/mod.rs
// =============================================================================
// This module handles crawling.
//
// Features:
// - A pool of concurrent workers sharing one frontier
// - Each URL is fetched at most once per session (VisitedSet)
// - Scope control by registrable domain (single / domain / subdomain)
// - Configurable depth limit
// - Best effort: failed pages are skipped, the crawl always finishes
//
// Submodules:
// - frontier: task queue with drain tracking, and the visited set
// - scope: which discovered links may be followed
// - fetch: the Fetcher trait and the HTTP implementation
// - aggregator: the shared word set
// - session: the worker loop tying it all together
// =============================================================================

mod aggregator;
mod fetch;
mod frontier;
mod scope;
mod session;

pub use fetch::HttpFetcher;
pub use scope::CrawlMode;
pub use session::Crawler;
