use fancy_regex::Regex;
use tracing::warn;

use crate::extractors::{Extractor, FactType, RawFact};

const NAME_CONFIDENCE: f32 = 0.6;

/// Capitalized-word-sequence heuristic: two or more title-cased tokens,
/// optionally preceded by an honorific. Deliberately lower confidence than
/// structured-data names.
pub struct NameExtractor {
    name_regex: Regex,
}

impl NameExtractor {
    pub fn new() -> Self {
        Self {
            // The lookahead keeps label words like "Email Us" or "Contact
            // Sales" from being read as people.
            name_regex: Regex::new(
                r"\b(?!(?:Email|Contact|sent by)\b)(?:Dr\.|Mr\.|Ms\.|Mrs\.|Prof\.)?\s*([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)\b",
            )
            .unwrap(),
        }
    }
}

impl Extractor for NameExtractor {
    fn name(&self) -> &'static str {
        "name"
    }

    fn extract(&self, text: &str) -> Vec<RawFact> {
        let mut facts = Vec::new();
        for captures in self.name_regex.captures_iter(text) {
            let captures = match captures {
                Ok(captures) => captures,
                Err(error) => {
                    warn!("Name pattern failed mid-scan: {}", error);
                    break;
                }
            };
            if let Some(name) = captures.get(1) {
                facts.push(RawFact {
                    fact_type: FactType::Name,
                    value: name.as_str().trim().to_string(),
                    confidence: NAME_CONFIDENCE,
                });
            }
        }
        facts
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}
