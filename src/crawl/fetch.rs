// src/crawl/fetch.rs
// =============================================================================
// This module downloads pages for the crawler.
//
// Key functionality:
// - The Fetcher trait: "give me the body of this URL within this timeout"
// - HttpFetcher: the real implementation over a shared reqwest Client
// - FetchError: why a page could not be fetched
//
// The crawl engine only talks to the trait, so tests can swap in an
// in-memory fetcher and count exactly which URLs were requested.
//
// Every failure kind is handled the same way by the crawler (skip the URL),
// but keeping them apart makes the debug log readable.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

// Why a single page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// No complete response within the per-request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// DNS failure, refused connection, TLS handshake error, ...
    #[error("connection failed: {0}")]
    Connect(String),
    /// The body could not be read or decoded as text
    #[error("could not read body: {0}")]
    Body(String),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the response body as text
    ///
    /// One attempt, no retries. Implementations must give up after `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

// Fetcher backed by reqwest
//
// We reuse one Client for all requests (connection pooling); cloning the
// fetcher is cheap because Client is reference counted internally.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::Body(e.to_string())
            }
        })
    }
}

// Sorts reqwest errors into our categories
fn categorize_error(error: reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_redirect() {
        FetchError::Other("too many redirects".to_string())
    } else if error.is_body() || error.is_decode() {
        FetchError::Body(error.to_string())
    } else {
        FetchError::Other(error.to_string())
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why #[async_trait]?
//    - The crawler stores the fetcher as Arc<dyn Fetcher> and shares it
//      between worker tasks
//    - async_trait boxes the returned future so the trait stays object-safe
//    - The boxed future is Send, so workers can be spawned with tokio::spawn
//
// 2. Why is the timeout a parameter and not a Client setting?
//    - The crawl configuration owns the timeout; the fetcher just obeys it
//    - reqwest's RequestBuilder::timeout() covers connect, headers and body
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new("crawl-wordlist-test").is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP 404");
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(10)).to_string(),
            "request timed out after 10s"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let fetcher = HttpFetcher::new("crawl-wordlist-test").unwrap();
        // Port 9 on localhost (discard) is closed on any sane test machine
        let result = fetcher
            .fetch("http://127.0.0.1:9/", Duration::from_secs(2))
            .await;
        assert!(result.is_err());
    }
}
