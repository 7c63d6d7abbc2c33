use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{Config, CrawlConfig};
use crate::crawler::fetcher::{FetchTransport, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::link_scorer::LinkScorer;
use crate::crawler::page::ParsedPage;
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::types::{CandidateUrl, CrawlResult, FetchResult, FetchStatus};
use crate::extractors::aggregator::Aggregator;
use crate::extractors::ContactPipeline;
use crate::models::Result;

/// Drives a crawl: pop from the frontier, gate on the rate limiter, fetch,
/// then feed the HTML to the link scorer (more candidates) and the extraction
/// pipeline (facts into the aggregator).
///
/// Fetches run concurrently up to the configured width, but every mutation of
/// the frontier, visited-set, page counters, and aggregator happens on this
/// task, between completions.
pub struct CrawlOrchestrator {
    crawl_config: CrawlConfig,
    rate_limiter: Arc<RateLimiter>,
    fetcher: Arc<Fetcher>,
    link_scorer: LinkScorer,
    pipeline: ContactPipeline,
}

impl CrawlOrchestrator {
    pub fn new(config: &Config, transport: Arc<dyn FetchTransport>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limits));
        let fetcher = Arc::new(Fetcher::new(
            transport,
            config.crawl.timeout_seconds,
            config.crawl.max_retries,
        ));
        Self {
            crawl_config: config.crawl.clone(),
            rate_limiter,
            fetcher,
            link_scorer: LinkScorer::new(),
            pipeline: ContactPipeline::new(),
        }
    }

    /// Crawl each seed independently. A seed that fails entirely yields an
    /// empty result record, never an aborted batch.
    pub async fn crawl_all(&self, seeds: &[String]) -> Vec<CrawlResult> {
        info!("🚀 Starting batch crawl of {} URLs", seeds.len());
        let mut results = Vec::new();
        for seed in seeds {
            match self.crawl(seed).await {
                Ok(result) => {
                    info!(
                        "✅ Successfully crawled {}: {} facts",
                        seed,
                        result.facts.len()
                    );
                    results.push(result);
                }
                Err(error) => {
                    error!("❌ Failed to crawl {}: {}", seed, error);
                    results.push(failed_result(seed, &error.to_string()));
                }
            }
        }
        info!(
            "🏁 Batch crawl complete: {}/{} successful",
            results.iter().filter(|r| r.success).count(),
            seeds.len()
        );
        results
    }

    pub async fn crawl(&self, start_url: &str) -> Result<CrawlResult> {
        let started = Instant::now();
        let seed = CandidateUrl::seed(start_url)
            .ok_or_else(|| format!("Invalid start URL: {}", start_url))?;
        info!(
            "🕷️  Starting crawl of {} (domain: {})",
            start_url, seed.domain
        );

        let mut frontier = Frontier::new(
            seed.domain.clone(),
            self.crawl_config.max_depth,
            self.crawl_config.max_pages_per_domain,
        );
        frontier.push(seed);

        let mut aggregator = Aggregator::new();
        let mut in_flight: JoinSet<(CandidateUrl, FetchResult)> = JoinSet::new();
        let mut pages_crawled = 0usize;

        loop {
            while in_flight.len() < self.crawl_config.concurrency {
                let Some(candidate) = frontier.pop() else {
                    break;
                };
                let rate_limiter = Arc::clone(&self.rate_limiter);
                let fetcher = Arc::clone(&self.fetcher);
                in_flight.spawn(async move {
                    rate_limiter.acquire(&candidate.domain).await;
                    let result = fetcher.fetch(candidate.url.as_str()).await;
                    (candidate, result)
                });
            }

            // Frontier drained and nothing in flight: the crawl is done.
            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((candidate, result)) => match result.status {
                    FetchStatus::Ok(html) => {
                        pages_crawled += 1;
                        self.process_page(&html, &candidate, &mut frontier, &mut aggregator);
                    }
                    status => {
                        warn!("Skipping {}: {:?}", candidate.url, status);
                    }
                },
                Err(join_error) => {
                    error!("Fetch task failed: {}", join_error);
                }
            }
        }

        let facts = aggregator.into_facts();
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "🎯 Crawl complete for {}: {} pages, {} facts in {}ms",
            start_url,
            pages_crawled,
            facts.len(),
            duration_ms
        );

        Ok(CrawlResult {
            id: Uuid::new_v4().to_string(),
            start_url: start_url.to_string(),
            facts,
            pages_crawled,
            crawl_duration_ms: duration_ms,
            success: true,
            error_message: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    fn process_page(
        &self,
        html: &str,
        candidate: &CandidateUrl,
        frontier: &mut Frontier,
        aggregator: &mut Aggregator,
    ) {
        let page = ParsedPage::parse(html);

        if candidate.depth < self.crawl_config.max_depth {
            self.link_scorer
                .discover(&page.anchors(), &candidate.url, candidate.depth, frontier);
        }

        let facts = self
            .pipeline
            .extract_page(&page, html, candidate.url.as_str());
        debug!("Extracted {} facts from {}", facts.len(), candidate.url);
        aggregator.add_all(facts);
    }
}

fn failed_result(start_url: &str, message: &str) -> CrawlResult {
    CrawlResult {
        id: Uuid::new_v4().to_string(),
        start_url: start_url.to_string(),
        facts: Vec::new(),
        pages_crawled: 0,
        crawl_duration_ms: 0,
        success: false,
        error_message: Some(message.to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}
