use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::crawler::types::{FetchResult, FetchStatus};
use crate::models::Result;

/// Transport-level failure. Anything that is not an HTTP response.
#[derive(Debug, Clone)]
pub enum TransportError {
    Timeout,
    Connection(String),
}

/// Injected network capability. The crawler never opens sockets itself, and
/// tests substitute scripted transports.
#[async_trait]
pub trait FetchTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<(u16, String), TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<(u16, String), TransportError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;
        Ok((status, body))
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(error.to_string())
    }
}

/// Fetches one URL: DNS pre-check, deadline-bounded request, outcome
/// classification, and bounded retry of transient failures.
pub struct Fetcher {
    transport: Arc<dyn FetchTransport>,
    timeout: Duration,
    max_retries: u32,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn FetchTransport>, timeout_seconds: u64, max_retries: u32) -> Self {
        Self {
            transport,
            timeout: Duration::from_secs(timeout_seconds),
            max_retries,
        }
    }

    /// Classification rules: a non-resolvable domain fails immediately (it
    /// will not resolve on retry); a non-200 status is an explicit answer,
    /// not retried; timeouts and connection failures retry up to
    /// `max_retries` attempts with `2^attempt`-second backoff. The attempt
    /// counter is per-URL.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        if !self.resolves(url).await {
            error!("DNS resolution failed for {}", url);
            return FetchResult {
                url: url.to_string(),
                status: FetchStatus::DnsError,
            };
        }

        let mut attempt = 0u32;
        loop {
            let status = match self.transport.get(url, self.timeout).await {
                Ok((200, body)) => {
                    info!("Successfully fetched {}", url);
                    return FetchResult {
                        url: url.to_string(),
                        status: FetchStatus::Ok(body),
                    };
                }
                Ok((code, _)) => {
                    error!("Error fetching {}: HTTP status {}", url, code);
                    return FetchResult {
                        url: url.to_string(),
                        status: FetchStatus::HttpError(code),
                    };
                }
                Err(TransportError::Timeout) => {
                    error!("Timeout error fetching {}", url);
                    FetchStatus::Timeout
                }
                Err(TransportError::Connection(message)) => {
                    error!("Connection error for {}: {}", url, message);
                    FetchStatus::ConnectionError
                }
            };

            attempt += 1;
            if attempt >= self.max_retries {
                warn!("Failed to fetch {} after {} attempts", url, attempt);
                return FetchResult {
                    url: url.to_string(),
                    status,
                };
            }

            let wait = Duration::from_secs(2u64.pow(attempt))
                + Duration::from_millis(fastrand::u64(0..=1000));
            info!("Retrying {} in {:.1}s...", url, wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }

    async fn resolves(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str().map(|h| h.to_string()) else {
            return false;
        };
        let port = parsed.port_or_known_default().unwrap_or(80);
        let result = match tokio::net::lookup_host((host.as_str(), port)).await {
            Ok(mut addrs) => {
                let resolved = addrs.next().is_some();
                debug!("Resolved {}: {}", host, resolved);
                resolved
            }
            Err(_) => false,
        };
        result
    }
}
