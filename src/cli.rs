// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The parsed Cli is turned into a validated CrawlConfig in config.rs;
// nothing here checks whether the values make sense together.
// =============================================================================

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::crawl::CrawlMode;
use crate::filter::Charset;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "crawl-wordlist",
    version = "0.1.0",
    about = "Extract a wordlist from a webpage or recursively crawl a domain",
    long_about = "crawl-wordlist collects the words found in a page's text, form fields, \
                  URLs and inline scripts, optionally following links within the same \
                  domain. The deduplicated, sorted result is meant as input for \
                  reconnaissance wordlists."
)]
pub struct Cli {
    /// Target URL (e.g., https://example.com)
    ///
    /// Required unless --input-file is given
    #[arg(required_unless_present = "input_file", conflicts_with = "input_file")]
    pub url: Option<String>,

    /// File with one target URL per line ('#' starts a comment)
    #[arg(short, long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Crawl mode
    #[arg(long, value_enum, default_value_t = CrawlMode::Single)]
    pub mode: CrawlMode,

    /// Recursion depth for crawling (the seed is depth 0)
    #[arg(long, default_value_t = 2)]
    pub depth: usize,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 5)]
    pub threads: usize,

    /// Minimum word length
    #[arg(long, default_value_t = 1)]
    pub min_length: usize,

    /// Maximum word length
    #[arg(long, default_value_t = 100)]
    pub max_length: usize,

    /// Character filter
    #[arg(long, value_enum, default_value_t = Charset::Unicode)]
    pub filter: Charset,

    /// Drop hex-like words (hashes, ids, encoded blobs)
    #[arg(long)]
    pub drop_obfuscated: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::List)]
    pub output_format: OutputFormat,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Longest single wait for new work before an idle worker re-checks the
    /// queue, in seconds. This never stops a worker: workers exit only once
    /// every queued page has been processed
    #[arg(long, default_value_t = 3, value_name = "SECS")]
    pub idle_wait: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = concat!("crawl-wordlist/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

// How the final wordlist is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A single bracketed list: ['a', 'b']
    List,
    /// One word per line
    Lines,
    /// A JSON array of strings
    Json,
}
