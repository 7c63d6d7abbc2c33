use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::extractors::{Extractor, FactType, RawFact};

/// RFC-approximate email matching. Known limitation: no MX or deliverability
/// check.
pub struct EmailExtractor {
    email_regex: Regex,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b")
                .unwrap(),
        }
    }
}

impl Extractor for EmailExtractor {
    fn name(&self) -> &'static str {
        "email"
    }

    fn extract(&self, text: &str) -> Vec<RawFact> {
        let mut seen = HashSet::new();
        let facts: Vec<RawFact> = self
            .email_regex
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|email| seen.insert(email.clone()))
            .map(|email| RawFact {
                fact_type: FactType::Email,
                value: email,
                confidence: 1.0,
            })
            .collect();
        debug!("Matched {} emails", facts.len());
        facts
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}
