// src/extract/mod.rs
// =============================================================================
// This module turns fetched content into raw tokens and discovered links.
//
// Submodules:
// - urls: Tokens from a URL's path segments and query string
// - markup: Tokens and links from an HTML document
// - script: Tokens from inline JavaScript variable declarations
//
// Everything here is a pure function: no shared state, no I/O. The crawl
// workers call `extract_page` once per fetched page.
//
// A "token" is a maximal run of word characters (letters, digits, underscore).
// =============================================================================

mod markup;
mod script;
mod urls;

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub use markup::extract_page;
pub use urls::{crawlable, extract_url_tokens};

// Adds every word-character run found in `text` to `tokens`
pub fn tokenize_into(text: &str, tokens: &mut HashSet<String>) {
    for m in word_pattern().find_iter(text) {
        tokens.insert(m.as_str().to_string());
    }
}

// `\w` in the regex crate is Unicode-aware, so "café" stays one token
fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}
