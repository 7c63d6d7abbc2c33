use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::extractors::{ExtractedFact, FactType};

/// One deduplicated fact: the highest-confidence sighting of a
/// (type, value) pair across a crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedFact {
    #[serde(rename = "type")]
    pub fact_type: FactType,
    pub value: String,
    pub confidence: f32,
    pub source_url: String,
}

/// Merges facts as they arrive. Grouping key is the exact (type, value)
/// string, case-sensitive — no case-folding or near-duplicate merging across
/// the key. Merging keeps the maximum confidence, so the result is
/// independent of arrival order.
pub struct Aggregator {
    best: HashMap<(FactType, String), ExtractedFact>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            best: HashMap::new(),
        }
    }

    pub fn add(&mut self, fact: ExtractedFact) {
        let key = (fact.fact_type, fact.value.clone());
        self.best
            .entry(key)
            .and_modify(|existing| {
                if fact.confidence > existing.confidence {
                    *existing = fact.clone();
                }
            })
            .or_insert(fact);
    }

    pub fn add_all<I>(&mut self, facts: I)
    where
        I: IntoIterator<Item = ExtractedFact>,
    {
        for fact in facts {
            self.add(fact);
        }
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Output order is unspecified (set semantics).
    pub fn into_facts(self) -> Vec<AggregatedFact> {
        self.best
            .into_values()
            .map(|fact| AggregatedFact {
                fact_type: fact.fact_type,
                value: fact.value,
                confidence: fact.confidence,
                source_url: fact.source_url,
            })
            .collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over a collected fact list.
pub fn aggregate<I>(facts: I) -> Vec<AggregatedFact>
where
    I: IntoIterator<Item = ExtractedFact>,
{
    let mut aggregator = Aggregator::new();
    aggregator.add_all(facts);
    aggregator.into_facts()
}
