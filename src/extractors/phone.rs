use regex::Regex;
use std::collections::HashSet;

use crate::extractors::{Extractor, FactType, RawFact};

const PHONE_CONFIDENCE: f32 = 0.7;

/// Loose numeric pattern tolerant of international prefixes and separator
/// styles. Matches are normalized to digits (and a leading `+`) and must
/// carry at least ten digits.
pub struct PhoneExtractor {
    phone_regex: Regex,
}

impl PhoneExtractor {
    pub fn new() -> Self {
        Self {
            phone_regex: Regex::new(r"\+?[\d\s.-]+\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").unwrap(),
        }
    }

    fn normalize(&self, raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect()
    }
}

impl Extractor for PhoneExtractor {
    fn name(&self) -> &'static str {
        "phone"
    }

    fn extract(&self, text: &str) -> Vec<RawFact> {
        let mut seen = HashSet::new();
        self.phone_regex
            .find_iter(text)
            .map(|m| self.normalize(m.as_str()))
            .filter(|phone| phone.trim_start_matches('+').len() >= 10)
            .filter(|phone| seen.insert(phone.clone()))
            .map(|phone| RawFact {
                fact_type: FactType::Phone,
                value: phone,
                confidence: PHONE_CONFIDENCE,
            })
            .collect()
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}
