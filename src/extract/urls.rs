// src/extract/urls.rs
// =============================================================================
// Token extraction from a single URL.
//
// How it works:
// 1. Split the path on '/' and percent-decode every non-empty segment
// 2. Tokenize each decoded segment
// 3. Decode the query string into key/value pairs and tokenize both sides
//
// Query pairs whose value is empty (`?debug=` or a bare `?debug`) contribute
// nothing, not even their key.
// =============================================================================

use std::borrow::Cow;
use std::collections::HashSet;
use url::Url;

use super::tokenize_into;

// Extracts tokens from an absolute URL string
//
// Returns an empty set if the string is not a parseable URL
//
// Example:
//   url = "https://example.com/api/v2/user%20list?sort=name"
//   result = {"api", "v2", "user", "list", "sort", "name"}
pub fn extract_url_tokens(url: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    if let Ok(parsed) = Url::parse(url) {
        add_url_tokens(&parsed, &mut tokens);
    }
    tokens
}

// Same as extract_url_tokens, for a URL that is already parsed
pub(super) fn add_url_tokens(url: &Url, tokens: &mut HashSet<String>) {
    // path() works for cannot-be-a-base URLs too ("javascript:void(0)")
    for segment in url.path().split('/').filter(|s| !s.is_empty()) {
        tokenize_into(&percent_decode(segment), tokens);
    }

    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        tokenize_into(&key, tokens);
        tokenize_into(&value, tokens);
    }
}

// Canonical form of a crawlable URL: http/https only, no fragment
//
// Returns None for any other scheme (mailto:, javascript:, ftp:, ...)
pub fn crawlable(mut url: Url) -> Option<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

// crawlable(), as the string that is queued and claimed
pub fn normalize_url(url: Url) -> Option<String> {
    crawlable(url).map(String::from)
}

// Invalid UTF-8 after decoding is replaced rather than rejected
fn percent_decode(segment: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(segment.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(segment),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}
