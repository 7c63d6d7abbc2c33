use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractors::aggregator::AggregatedFact;

/// A URL waiting in the frontier. Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    pub url: Url,
    pub depth: u32,
    pub priority: i32,
    pub domain: String,
}

impl CandidateUrl {
    pub fn new(url: Url, depth: u32, priority: i32) -> Option<Self> {
        let domain = url.host_str()?.to_lowercase();
        Some(Self {
            url,
            depth,
            priority,
            domain,
        })
    }

    /// Seed candidate: depth 0, priority 0. A missing scheme defaults to `http://`.
    pub fn seed(raw: &str) -> Option<Self> {
        let with_scheme = ensure_scheme(raw);
        let url = Url::parse(&with_scheme).ok()?;
        Self::new(url, 0, 0)
    }

    /// Dedup identity: lower-cased host + path. Scheme and query variants of
    /// the same page count as the same URL.
    pub fn identity(&self) -> String {
        url_identity(&self.url)
    }
}

pub fn url_identity(url: &Url) -> String {
    format!(
        "{}{}",
        url.host_str().unwrap_or_default().to_lowercase(),
        url.path().to_lowercase()
    )
}

pub fn ensure_scheme(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    }
}

/// Outcome classification for one fetched URL.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Ok(String),
    HttpError(u16),
    DnsError,
    Timeout,
    ConnectionError,
}

impl FetchStatus {
    /// Timeouts and connection failures may succeed on retry; everything else
    /// is terminal.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchStatus::Timeout | FetchStatus::ConnectionError)
    }
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub status: FetchStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub id: String,
    pub start_url: String,
    pub facts: Vec<AggregatedFact>,
    pub pages_crawled: usize,
    pub crawl_duration_ms: u64,
    pub success: bool,
    pub error_message: Option<String>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_scheme_and_query() {
        let a = CandidateUrl::seed("http://Example.com/About?utm=x").unwrap();
        let b = CandidateUrl::seed("https://example.com/about").unwrap();
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn seed_defaults_missing_scheme_to_http() {
        let c = CandidateUrl::seed("example.com/team").unwrap();
        assert_eq!(c.url.scheme(), "http");
        assert_eq!(c.domain, "example.com");
        assert_eq!(c.depth, 0);
        assert_eq!(c.priority, 0);
    }

    #[test]
    fn transient_classification() {
        assert!(FetchStatus::Timeout.is_transient());
        assert!(FetchStatus::ConnectionError.is_transient());
        assert!(!FetchStatus::DnsError.is_transient());
        assert!(!FetchStatus::HttpError(404).is_transient());
    }
}
