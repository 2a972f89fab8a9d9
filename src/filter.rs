// src/filter.rs
// =============================================================================
// This module decides which raw tokens make it into the wordlist.
//
// Rules, applied to every token independently:
// - Pure numbers ("2024", "404", "٣٤") are dropped. A number is a run of
//   decimal digits from any script; numeral letters like "Ⅻ" are kept
// - Hash-like noise ("deadbeef42") is dropped when drop_obfuscated is set
// - Tokens shorter than min_length or longer than max_length are dropped
// - Non-ASCII tokens are dropped when the charset is Ascii
//
// Lengths are counted in characters, not bytes.
// =============================================================================

use clap::ValueEnum;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

// Shortest token the obfuscation heuristic looks at
const OBFUSCATION_MIN_LEN: usize = 6;

// Tokens with a larger share of hex digits than this are treated as noise
const OBFUSCATION_HEX_RATIO: f64 = 0.8;

// Which characters a kept token may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Charset {
    /// Only 7-bit ASCII tokens
    Ascii,
    /// Any characters
    Unicode,
}

// The filtering rules for one run
#[derive(Debug, Clone)]
pub struct WordFilter {
    pub min_length: usize,
    pub max_length: usize,
    pub charset: Charset,
    pub drop_obfuscated: bool,
}

impl Default for WordFilter {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 100,
            charset: Charset::Unicode,
            drop_obfuscated: false,
        }
    }
}

impl WordFilter {
    /// Returns true if `word` belongs in the wordlist
    pub fn accepts(&self, word: &str) -> bool {
        if is_numeric(word) {
            return false;
        }
        if self.drop_obfuscated && looks_obfuscated(word) {
            return false;
        }
        let len = word.chars().count();
        if len < self.min_length || len > self.max_length {
            return false;
        }
        if self.charset == Charset::Ascii && !word.is_ascii() {
            return false;
        }
        true
    }

    /// Keeps the accepted tokens; duplicates collapse
    pub fn apply<I, S>(&self, words: I) -> HashSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str> + Into<String>,
    {
        words
            .into_iter()
            .filter(|w| self.accepts(w.as_ref()))
            .map(Into::into)
            .collect()
    }
}

// `\d` is Unicode decimal digits (Nd) only, unlike `char::is_numeric`
fn is_numeric(word: &str) -> bool {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS
        .get_or_init(|| Regex::new(r"^\d+$").expect("digit pattern is valid"))
        .is_match(word)
}

// Hex-looking tokens are usually hashes, ids or encoded blobs
fn looks_obfuscated(word: &str) -> bool {
    let len = word.chars().count();
    if len < OBFUSCATION_MIN_LEN {
        return false;
    }
    let hex = word.chars().filter(char::is_ascii_hexdigit).count();
    hex as f64 / len as f64 > OBFUSCATION_HEX_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(min: usize, max: usize, charset: Charset, drop_obfuscated: bool) -> WordFilter {
        WordFilter {
            min_length: min,
            max_length: max,
            charset,
            drop_obfuscated,
        }
    }

    #[test]
    fn test_numbers_are_dropped() {
        let f = WordFilter::default();
        assert!(!f.accepts("404"));
        assert!(!f.accepts("2024"));
        assert!(f.accepts("v2"));
    }

    #[test]
    fn test_numbers_in_other_scripts() {
        let f = WordFilter::default();
        // Arabic-Indic digits are decimal digits
        assert!(!f.accepts("٣٤"));
        assert!(!f.accepts("１２"));
        // Roman numeral twelve is a letter number, not a decimal one
        assert!(f.accepts("Ⅻ"));
        assert!(f.accepts("ⅫⅠ"));
    }

    #[test]
    fn test_obfuscation_boundary() {
        let f = filter(1, 100, Charset::Unicode, true);
        // 5 of 6 characters are hex digits (83%)
        assert!(!f.accepts("abcdez"));
        // 4 of 6 (67%)
        assert!(f.accepts("abcdzz"));
        // Short tokens are never treated as obfuscated
        assert!(f.accepts("beef"));
        // Case does not matter
        assert!(!f.accepts("DeadBeef42"));
    }

    #[test]
    fn test_obfuscated_kept_when_flag_off() {
        let f = filter(1, 100, Charset::Unicode, false);
        assert!(f.accepts("deadbeef"));
    }

    #[test]
    fn test_mixed_token_below_ratio_is_kept() {
        // 123abc: 6 of 6 are hex digits, so it only survives with the flag off
        assert!(filter(1, 100, Charset::Ascii, false).accepts("123abc"));
        assert!(!filter(1, 100, Charset::Ascii, true).accepts("123abc"));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let f = filter(3, 5, Charset::Unicode, false);
        assert!(!f.accepts("ab"));
        assert!(f.accepts("abc"));
        assert!(f.accepts("abcde"));
        assert!(!f.accepts("abcdef"));
    }

    #[test]
    fn test_length_counts_characters() {
        let f = filter(1, 4, Charset::Unicode, false);
        assert!(f.accepts("café"));
    }

    #[test]
    fn test_ascii_charset() {
        let f = filter(1, 100, Charset::Ascii, false);
        assert!(f.accepts("admin"));
        assert!(!f.accepts("café"));
        assert!(filter(1, 100, Charset::Unicode, false).accepts("café"));
    }

    #[test]
    fn test_apply_is_a_fixed_point() {
        let f = filter(3, 10, Charset::Ascii, true);
        let raw = ["login", "42", "ab", "deadbeef99", "über", "password_reset", "login", "token"];
        let once = f.apply(raw);
        let twice = f.apply(once.clone());
        assert_eq!(once, twice);
        let expected: HashSet<String> = ["login", "token"].iter().map(|s| s.to_string()).collect();
        assert_eq!(once, expected);
    }
}
