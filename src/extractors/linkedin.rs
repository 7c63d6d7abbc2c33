use regex::Regex;
use std::collections::HashSet;

use crate::extractors::{Extractor, FactType, RawFact};

const LINKEDIN_CONFIDENCE: f32 = 0.8;

/// LinkedIn profile and company page links. Runs over raw markup, since
/// profile URLs usually live in hrefs rather than visible text.
pub struct LinkedInExtractor {
    linkedin_regex: Regex,
}

impl LinkedInExtractor {
    pub fn new() -> Self {
        Self {
            linkedin_regex: Regex::new(
                r"(?:https?://)?(?:www\.)?linkedin\.com/(in|company)/([a-zA-Z0-9\-_]+)",
            )
            .unwrap(),
        }
    }
}

impl Extractor for LinkedInExtractor {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn extract(&self, text: &str) -> Vec<RawFact> {
        let mut seen = HashSet::new();
        self.linkedin_regex
            .captures_iter(text)
            .filter_map(|captures| {
                let kind = captures.get(1)?.as_str();
                let handle = captures.get(2)?.as_str();
                Some(format!("https://linkedin.com/{}/{}", kind, handle))
            })
            .filter(|profile| seen.insert(profile.clone()))
            .map(|profile| RawFact {
                fact_type: FactType::LinkedIn,
                value: profile,
                confidence: LINKEDIN_CONFIDENCE,
            })
            .collect()
    }
}

impl Default for LinkedInExtractor {
    fn default() -> Self {
        Self::new()
    }
}
