use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;

/// Two-level admission control: a request must pass the global window and its
/// domain's own window before it may fetch. Admission delays the caller until
/// capacity is available; it never fails a request. Domain windows are created
/// lazily on first use and persist for the limiter's lifetime.
pub struct RateLimiter {
    global: Arc<Mutex<SlidingWindow>>,
    domains: Mutex<HashMap<String, Arc<Mutex<SlidingWindow>>>>,
    domain_requests: usize,
    domain_period: Duration,
}

/// At most `capacity` grants per trailing `period`.
struct SlidingWindow {
    capacity: usize,
    period: Duration,
    grants: VecDeque<Instant>,
}

impl SlidingWindow {
    fn new(capacity: usize, period: Duration) -> Self {
        Self {
            capacity,
            period,
            grants: VecDeque::new(),
        }
    }

    /// Record a grant if the window has room, otherwise report when the
    /// oldest grant ages out.
    fn try_grant(&mut self, now: Instant) -> Option<Instant> {
        while let Some(front) = self.grants.front() {
            if *front + self.period <= now {
                self.grants.pop_front();
            } else {
                break;
            }
        }
        if self.grants.len() < self.capacity {
            self.grants.push_back(now);
            None
        } else {
            self.grants.front().map(|front| *front + self.period)
        }
    }
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            global: Arc::new(Mutex::new(SlidingWindow::new(
                config.global_requests.max(1),
                Duration::from_secs(config.global_period_seconds),
            ))),
            domains: Mutex::new(HashMap::new()),
            domain_requests: config.domain_requests.max(1),
            domain_period: Duration::from_secs(config.domain_period_seconds),
        }
    }

    /// Wait until both the global window and the domain's window admit one
    /// request. Grants hand off in arrival order per window.
    pub async fn acquire(&self, domain: &str) {
        Self::admit(&self.global).await;
        let bucket = self.domain_bucket(domain).await;
        Self::admit(&bucket).await;
        debug!("Rate limit check passed for domain: {}", domain);
    }

    async fn domain_bucket(&self, domain: &str) -> Arc<Mutex<SlidingWindow>> {
        let mut domains = self.domains.lock().await;
        domains
            .entry(domain.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SlidingWindow::new(
                    self.domain_requests,
                    self.domain_period,
                )))
            })
            .clone()
    }

    async fn admit(window: &Mutex<SlidingWindow>) {
        loop {
            let ready_at = {
                let mut window = window.lock().await;
                window.try_grant(Instant::now())
            };
            // The lock is dropped before sleeping so other callers can check.
            match ready_at {
                None => return,
                Some(ready_at) => tokio::time::sleep_until(ready_at).await,
            }
        }
    }

    pub async fn tracked_domains(&self) -> usize {
        self.domains.lock().await.len()
    }
}
