use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::crawler::types::CandidateUrl;

/// Priority queue of candidate URLs plus the visited-set and per-domain page
/// counters. Owns crawl-budget enforcement: a candidate outside the seed
/// domain, past the depth limit, already seen, or over the page budget is
/// silently dropped at push time.
pub struct Frontier {
    seed_domain: String,
    max_depth: u32,
    max_pages_per_domain: usize,
    heap: BinaryHeap<Reverse<QueuedCandidate>>,
    enqueued: HashSet<String>,
    visited: HashSet<String>,
    page_counts: HashMap<String, usize>,
    seq: u64,
}

/// Heap entry ordered by (priority, insertion sequence) so equal priorities
/// dequeue FIFO. Priority is fixed at enqueue time.
struct QueuedCandidate {
    priority: i32,
    seq: u64,
    candidate: CandidateUrl,
}

impl PartialEq for QueuedCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueuedCandidate {}

impl PartialOrd for QueuedCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

impl Frontier {
    pub fn new(seed_domain: String, max_depth: u32, max_pages_per_domain: usize) -> Self {
        Self {
            seed_domain,
            max_depth,
            max_pages_per_domain,
            heap: BinaryHeap::new(),
            enqueued: HashSet::new(),
            visited: HashSet::new(),
            page_counts: HashMap::new(),
            seq: 0,
        }
    }

    /// Insert a candidate if it passes every admission check. A rejected
    /// candidate is not an error.
    pub fn push(&mut self, candidate: CandidateUrl) {
        if candidate.domain != self.seed_domain {
            debug!(
                "Frontier rejected off-domain candidate: {} (seed domain: {})",
                candidate.url, self.seed_domain
            );
            return;
        }
        if candidate.depth > self.max_depth {
            debug!("Frontier rejected over-depth candidate: {}", candidate.url);
            return;
        }
        let identity = candidate.identity();
        if self.visited.contains(&identity) || self.enqueued.contains(&identity) {
            return;
        }
        if self.pages_crawled(&candidate.domain) >= self.max_pages_per_domain {
            debug!(
                "Frontier rejected candidate over page budget: {}",
                candidate.url
            );
            return;
        }

        self.enqueued.insert(identity);
        self.heap.push(Reverse(QueuedCandidate {
            priority: candidate.priority,
            seq: self.seq,
            candidate,
        }));
        self.seq += 1;
    }

    /// Dequeue the best candidate (numerically smallest priority). Marks it
    /// visited and counts the page immediately, so an abandoned in-flight
    /// fetch can never be crawled a second time through another path.
    pub fn pop(&mut self) -> Option<CandidateUrl> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let candidate = entry.candidate;
            if self.pages_crawled(&candidate.domain) >= self.max_pages_per_domain {
                // Budget filled up since this entry was enqueued.
                continue;
            }
            let identity = candidate.identity();
            self.enqueued.remove(&identity);
            self.mark_visited(&identity);
            *self.page_counts.entry(candidate.domain.clone()).or_insert(0) += 1;
            return Some(candidate);
        }
        None
    }

    /// Idempotent.
    pub fn mark_visited(&mut self, identity: &str) {
        self.visited.insert(identity.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn pages_crawled(&self, domain: &str) -> usize {
        self.page_counts.get(domain).copied().unwrap_or(0)
    }

    pub fn seed_domain(&self) -> &str {
        &self.seed_domain
    }
}
