// src/config.rs
// =============================================================================
// This module turns the parsed command line into a CrawlConfig.
//
// All validation happens here, before any request is made. A CrawlConfig
// that exists is a CrawlConfig that makes sense; the crawl engine never
// re-checks it and never mutates it.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::crawl::CrawlMode;
use crate::filter::WordFilter;

// Invalid input on the command line or in the input file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no target URL given")]
    NoTargets,
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme in '{0}' (only http and https can be crawled)")]
    UnsupportedScheme(String),
    #[error("URL has no host: {0}")]
    MissingHost(String),
    #[error("--min-length ({min}) is greater than --max-length ({max})")]
    LengthRange { min: usize, max: usize },
    #[error("--max-length must be at least 1")]
    ZeroMaxLength,
    #[error("--threads must be at least 1")]
    ZeroWorkers,
    #[error("--{0} must be at least 1 second")]
    ZeroTimeout(&'static str),
    #[error("could not read input file {path}: {source}")]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Immutable settings for one run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URLs; each one is crawled in its own session
    pub targets: Vec<Url>,
    pub mode: CrawlMode,
    /// Deepest link hop that is still fetched (seed = 0)
    pub max_depth: usize,
    pub workers: usize,
    pub filter: WordFilter,
    pub fetch_timeout: Duration,
    pub idle_wait: Duration,
    pub user_agent: String,
}

impl TryFrom<&Cli> for CrawlConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let raw_targets = match (&cli.url, &cli.input_file) {
            (Some(url), _) => vec![url.clone()],
            (None, Some(path)) => read_targets(path)?,
            (None, None) => Vec::new(),
        };
        if raw_targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        let targets = raw_targets
            .iter()
            .map(|t| parse_target(t))
            .collect::<Result<Vec<_>, _>>()?;

        if cli.max_length == 0 {
            return Err(ConfigError::ZeroMaxLength);
        }
        if cli.min_length > cli.max_length {
            return Err(ConfigError::LengthRange {
                min: cli.min_length,
                max: cli.max_length,
            });
        }
        if cli.threads == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if cli.timeout == 0 {
            return Err(ConfigError::ZeroTimeout("timeout"));
        }
        if cli.idle_wait == 0 {
            return Err(ConfigError::ZeroTimeout("idle-wait"));
        }

        Ok(Self {
            targets,
            mode: cli.mode,
            max_depth: cli.depth,
            workers: cli.threads,
            filter: WordFilter {
                min_length: cli.min_length,
                max_length: cli.max_length,
                charset: cli.filter,
                drop_obfuscated: cli.drop_obfuscated,
            },
            fetch_timeout: Duration::from_secs(cli.timeout),
            idle_wait: Duration::from_secs(cli.idle_wait),
            user_agent: cli.user_agent.clone(),
        })
    }
}

// One URL per line; blank lines and '#' comments are skipped
fn read_targets(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_target_lines(&content))
}

fn parse_target_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

// Seeds are stored without their fragment, the same way discovered links are
fn parse_target(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingHost(raw.to_string()));
    }
    url.set_fragment(None);
    Ok(url)
}
