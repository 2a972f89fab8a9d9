// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate them into a CrawlConfig (bad input stops us here)
// 3. Run the crawler and collect the sorted wordlist
// 4. Print the words and exit with proper code (0 = success, 2 = error)
//
// The wordlist goes to stdout; the summary line and all logging go to
// stderr, so `crawl-wordlist ... --output-format lines > words.txt` works.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - validated crawl settings
mod crawl;    // src/crawl/ - frontier, workers, scope, fetching
mod extract;  // src/extract/ - tokens and links from pages
mod filter;   // src/filter.rs - which tokens are kept

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, OutputFormat};
use config::CrawlConfig;
use crawl::{Crawler, HttpFetcher};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CrawlConfig::try_from(&cli).context("invalid arguments")?;
    let fetcher = HttpFetcher::new(&config.user_agent).context("could not set up the HTTP client")?;

    let crawler = Crawler::new(config, Arc::new(fetcher));
    let words = crawler.run().await;

    eprintln!("\n[+] Extracted {} words:\n", words.len());
    println!("{}", render(&words, cli.output_format)?);

    Ok(0)
}

// RUST_LOG wins over -v when both are set
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "crawl_wordlist=warn",
        1 => "crawl_wordlist=info",
        2 => "crawl_wordlist=debug",
        _ => "crawl_wordlist=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Formats the wordlist for stdout
fn render(words: &[String], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::List => {
            // Tokens are word characters only, so they never need escaping
            let quoted: Vec<String> = words.iter().map(|w| format!("'{}'", w)).collect();
            format!("[{}]", quoted.join(", "))
        }
        OutputFormat::Lines => words.join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(words)?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<String> {
        vec!["admin".to_string(), "login".to_string()]
    }

    #[test]
    fn test_render_list() {
        assert_eq!(render(&words(), OutputFormat::List).unwrap(), "['admin', 'login']");
        assert_eq!(render(&[], OutputFormat::List).unwrap(), "[]");
    }

    #[test]
    fn test_render_lines() {
        assert_eq!(render(&words(), OutputFormat::Lines).unwrap(), "admin\nlogin");
    }

    #[test]
    fn test_render_json() {
        let json = render(&words(), OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, words());
    }
}
