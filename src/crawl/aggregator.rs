// src/crawl/aggregator.rs
// =============================================================================
// The session-wide word set that every worker merges its results into.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct Aggregator {
    words: Mutex<HashSet<String>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set union under the lock
    pub fn merge(&self, words: HashSet<String>) {
        let mut all = self.words.lock().unwrap_or_else(PoisonError::into_inner);
        if all.is_empty() {
            *all = words;
        } else {
            all.extend(words);
        }
    }

    /// All words, sorted, so output never depends on arrival order
    pub fn collect(&self) -> Vec<String> {
        let words = self.words.lock().unwrap_or_else(PoisonError::into_inner);
        let mut sorted: Vec<String> = words.iter().cloned().collect();
        sorted.sort();
        sorted
    }
}
