use serde_json::Value;
use tracing::warn;

use crate::crawler::page::ParsedPage;
use crate::extractors::{run_guarded, ExtractorRegistry, FactType, RawFact};

/// Structured-markup sources report at these confidences.
const VCARD_CONFIDENCE: f32 = 0.9;
const JSON_LD_CONFIDENCE: f32 = 0.95;

const HIGH_CONTEXT: &[&str] = &[
    "about",
    "team",
    "contact",
    "leadership",
    "management",
    "staff",
    "employees",
    "board",
    "executives",
];
const MEDIUM_CONTEXT: &[&str] = &[
    "directory",
    "people",
    "department",
    "faculty",
    "personnel",
    "crew",
    "members",
    "positions",
    "roles",
];
const LOW_CONTEXT: &[&str] = &[
    "company",
    "organization",
    "group",
    "division",
    "unit",
    "leaders",
    "managers",
];

#[derive(Debug, Clone, Copy)]
enum ContextWeight {
    High,
    Medium,
    Low,
}

impl ContextWeight {
    fn factor(self) -> f32 {
        match self {
            ContextWeight::High => 1.2,
            ContextWeight::Medium => 1.1,
            ContextWeight::Low => 1.0,
        }
    }
}

/// Scans keyword-weighted document regions with the plain-text strategies,
/// and reads embedded structured markup (hCard, JSON-LD) as a direct
/// high-confidence source. Runs before the whole-page strategies.
pub struct ContextualExtractor;

impl ContextualExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_document(
        &self,
        page: &ParsedPage,
        registry: &ExtractorRegistry,
    ) -> Vec<RawFact> {
        let mut facts = Vec::new();

        for region in page.containers() {
            if let Some(weight) = classify(&region.descriptor) {
                facts.extend(self.extract_region(&region.text, weight, registry));
            }
        }

        // A heading like "Our Team" promotes whatever follows it.
        for (heading, sibling_text) in page.header_led_regions() {
            if mentions_context_keyword(&heading.to_lowercase()) {
                facts.extend(self.extract_region(&sibling_text, ContextWeight::High, registry));
            }
        }

        facts.extend(self.structured_facts(page));
        facts
    }

    fn extract_region(
        &self,
        text: &str,
        weight: ContextWeight,
        registry: &ExtractorRegistry,
    ) -> Vec<RawFact> {
        let mut facts = Vec::new();
        for name in ["email", "name", "phone", "title"] {
            let Some(extractor) = registry.get(name) else {
                continue;
            };
            for mut fact in run_guarded(extractor, text) {
                fact.confidence = (fact.confidence * weight.factor()).min(1.0);
                facts.push(fact);
            }
        }
        facts
    }

    fn structured_facts(&self, page: &ParsedPage) -> Vec<RawFact> {
        let mut facts = Vec::new();

        for vcard in page.vcards() {
            let mut push = |fact_type, value: Option<String>| {
                if let Some(value) = value {
                    facts.push(RawFact {
                        fact_type,
                        value,
                        confidence: VCARD_CONFIDENCE,
                    });
                }
            };
            push(FactType::Name, vcard.full_name);
            push(FactType::Organization, vcard.organization);
            push(FactType::Email, vcard.email);
            push(FactType::Phone, vcard.telephone);
        }

        for block in page.json_ld_blocks() {
            match serde_json::from_str::<Value>(&block) {
                Ok(data) => facts.extend(json_ld_facts(&data)),
                Err(error) => {
                    warn!("Failed to parse JSON-LD data: {}", error);
                }
            }
        }

        facts
    }
}

impl Default for ContextualExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(descriptor: &str) -> Option<ContextWeight> {
    if HIGH_CONTEXT.iter().any(|kw| descriptor.contains(kw)) {
        Some(ContextWeight::High)
    } else if MEDIUM_CONTEXT.iter().any(|kw| descriptor.contains(kw)) {
        Some(ContextWeight::Medium)
    } else if LOW_CONTEXT.iter().any(|kw| descriptor.contains(kw)) {
        Some(ContextWeight::Low)
    } else {
        None
    }
}

fn mentions_context_keyword(text: &str) -> bool {
    HIGH_CONTEXT
        .iter()
        .chain(MEDIUM_CONTEXT)
        .chain(LOW_CONTEXT)
        .any(|kw| text.contains(kw))
}

fn json_ld_facts(data: &Value) -> Vec<RawFact> {
    // A top-level array describes its first entity.
    let data = match data {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Vec::new(),
        },
        other => other,
    };

    let type_name = data.get("@type").and_then(Value::as_str).unwrap_or("");
    if type_name != "Person" && type_name != "Organization" {
        return Vec::new();
    }

    let mut facts = Vec::new();
    let mut push = |fact_type, key: &str| {
        if let Some(value) = data.get(key).and_then(Value::as_str) {
            facts.push(RawFact {
                fact_type,
                value: value.to_string(),
                confidence: JSON_LD_CONFIDENCE,
            });
        }
    };
    push(FactType::Name, "name");
    push(FactType::Email, "email");
    push(FactType::Phone, "telephone");
    push(FactType::Title, "jobTitle");
    facts
}
