// src/crawl/scope.rs
// =============================================================================
// This module decides whether a discovered link may be crawled.
//
// The decision depends on the crawl mode and on the seed's registrable
// domain, i.e. the domain someone can actually register:
//
//   www.example.co.uk  -> registrable "example.co.uk", subdomain "www"
//   example.com        -> registrable "example.com",   subdomain ""
//
// A naive "last two labels" split gets "co.uk" wrong, so we ask the public
// suffix list (the `psl` crate) instead. Its private section counts too, so
// alice.github.io and bob.github.io are two different sites.
//
// | mode      | link is followed if                                  |
// |-----------|------------------------------------------------------|
// | single    | never                                                |
// | domain    | same registrable domain and no subdomain label       |
// | subdomain | same registrable domain, any subdomain               |
// =============================================================================

use clap::ValueEnum;
use thiserror::Error;
use tracing::trace;
use url::{Host, Url};

// How far a crawl may wander from the seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CrawlMode {
    /// Only the seed page itself
    Single,
    /// The seed's registrable domain, without subdomains
    Domain,
    /// The seed's registrable domain and all of its subdomains
    Subdomain,
}

// Why a link could not be placed in or out of scope
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL has no host: {0}")]
    NoHost(String),
}

// A host split into its registrable domain and the labels in front of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostParts {
    pub registrable: String,
    pub subdomain: String,
}

// Splits the host of `url` using public-suffix rules
//
// IP addresses and hosts without a registrable domain ("localhost") are
// treated as their own registrable domain with no subdomain.
pub fn split_host(url: &Url) -> Result<HostParts, ScopeError> {
    let host = url
        .host()
        .ok_or_else(|| ScopeError::NoHost(url.to_string()))?;

    let name = match host {
        Host::Domain(name) => name.trim_end_matches('.'),
        ip => {
            return Ok(HostParts {
                registrable: ip.to_string(),
                subdomain: String::new(),
            })
        }
    };

    let parts = match psl::domain_str(name) {
        Some(registrable) => HostParts {
            registrable: registrable.to_string(),
            subdomain: name[..name.len() - registrable.len()]
                .trim_end_matches('.')
                .to_string(),
        },
        None => HostParts {
            registrable: name.to_string(),
            subdomain: String::new(),
        },
    };
    Ok(parts)
}

// Scope of one crawl session, fixed once from the seed URL
#[derive(Debug, Clone)]
pub struct DomainScope {
    mode: CrawlMode,
    base_domain: String,
}

impl DomainScope {
    pub fn for_seed(mode: CrawlMode, seed: &Url) -> Result<Self, ScopeError> {
        let parts = split_host(seed)?;
        Ok(Self {
            mode,
            base_domain: parts.registrable,
        })
    }

    pub fn mode(&self) -> CrawlMode {
        self.mode
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Checks one link against the decision table
    pub fn check(&self, link: &str) -> Result<bool, ScopeError> {
        if self.mode == CrawlMode::Single {
            return Ok(false);
        }

        let url = Url::parse(link).map_err(|source| ScopeError::InvalidUrl {
            url: link.to_string(),
            source,
        })?;
        let parts = split_host(&url)?;

        let same_domain = parts.registrable == self.base_domain;
        Ok(match self.mode {
            CrawlMode::Single => false,
            CrawlMode::Domain => same_domain && parts.subdomain.is_empty(),
            CrawlMode::Subdomain => same_domain,
        })
    }

    /// Like check(), with malformed links counted as out of scope
    pub fn allows(&self, link: &str) -> bool {
        match self.check(link) {
            Ok(allowed) => allowed,
            Err(e) => {
                trace!("dropping link: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(mode: CrawlMode, seed: &str) -> DomainScope {
        DomainScope::for_seed(mode, &Url::parse(seed).unwrap()).unwrap()
    }

    fn parts(url: &str) -> HostParts {
        split_host(&Url::parse(url).unwrap()).unwrap()
    }

    #[test]
    fn test_split_multi_label_suffix() {
        let p = parts("https://www.example.co.uk/");
        assert_eq!(p.registrable, "example.co.uk");
        assert_eq!(p.subdomain, "www");
    }

    #[test]
    fn test_split_nested_subdomain() {
        let p = parts("https://api.eu.example.com/v1");
        assert_eq!(p.registrable, "example.com");
        assert_eq!(p.subdomain, "api.eu");
    }

    #[test]
    fn test_split_ip_and_localhost() {
        let p = parts("http://127.0.0.1:8080/");
        assert_eq!(p.registrable, "127.0.0.1");
        assert_eq!(p.subdomain, "");

        let p = parts("http://localhost:3000/");
        assert_eq!(p.registrable, "localhost");
        assert_eq!(p.subdomain, "");
    }

    #[test]
    fn test_seed_subdomain_sets_registrable_base() {
        let s = scope(CrawlMode::Domain, "https://a.example.com/");
        assert_eq!(s.base_domain(), "example.com");
    }

    #[test]
    fn test_domain_mode_table() {
        let s = scope(CrawlMode::Domain, "https://a.example.com/");
        assert!(!s.allows("https://b.example.com/page"));
        assert!(!s.allows("https://example.org/"));
        assert!(s.allows("https://example.com/page"));
    }

    #[test]
    fn test_subdomain_mode_table() {
        let s = scope(CrawlMode::Subdomain, "https://a.example.com/");
        assert!(s.allows("https://b.example.com/page"));
        assert!(s.allows("https://example.com/"));
        assert!(!s.allows("https://example.org/"));
    }

    #[test]
    fn test_single_mode_follows_nothing() {
        let s = scope(CrawlMode::Single, "https://example.com/");
        assert!(!s.allows("https://example.com/other"));
    }

    #[test]
    fn test_suffix_is_not_a_shared_domain() {
        let s = scope(CrawlMode::Subdomain, "https://shop.example.co.uk/");
        assert!(s.allows("https://blog.example.co.uk/"));
        assert!(!s.allows("https://other.co.uk/"));
    }

    #[test]
    fn test_private_suffix_hosts_are_separate_sites() {
        // github.io is on the private section of the list, so every user
        // page is a registrable domain of its own
        let p = parts("https://alice.github.io/blog");
        assert_eq!(p.registrable, "alice.github.io");
        assert_eq!(p.subdomain, "");

        let s = scope(CrawlMode::Subdomain, "https://alice.github.io/");
        assert!(s.allows("https://docs.alice.github.io/"));
        assert!(!s.allows("https://bob.github.io/"));
    }

    #[test]
    fn test_malformed_link_is_rejected() {
        let s = scope(CrawlMode::Subdomain, "https://example.com/");
        assert!(matches!(s.check("::not a url"), Err(ScopeError::InvalidUrl { .. })));
        assert!(!s.allows("::not a url"));
    }
}
