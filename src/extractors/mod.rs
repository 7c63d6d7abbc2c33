pub mod aggregator;
pub mod contextual;
pub mod email;
pub mod linkedin;
pub mod name;
pub mod phone;
pub mod title;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crawler::page::ParsedPage;
use contextual::ContextualExtractor;
use email::EmailExtractor;
use linkedin::LinkedInExtractor;
use name::NameExtractor;
use phone::PhoneExtractor;
use title::TitleExtractor;

/// Content shorter than this is not worth running a strategy over.
const MIN_CONTENT_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactType {
    Email,
    Name,
    Phone,
    Title,
    LinkedIn,
    Organization,
}

impl std::fmt::Display for FactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FactType::Email => "email",
            FactType::Name => "name",
            FactType::Phone => "phone",
            FactType::Title => "title",
            FactType::LinkedIn => "linkedin",
            FactType::Organization => "organization",
        };
        write!(f, "{}", label)
    }
}

/// A fact as one strategy reported it, before the page's source URL is
/// attached.
#[derive(Debug, Clone)]
pub struct RawFact {
    pub fact_type: FactType,
    pub value: String,
    pub confidence: f32,
}

/// A fact tied to the page it came from. Never mutated after creation; the
/// aggregator merges by building new records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFact {
    #[serde(rename = "type")]
    pub fact_type: FactType,
    pub value: String,
    pub confidence: f32,
    pub source_url: String,
}

/// One extraction strategy. Operates on plain text, independent of every
/// other strategy, and never fails outward: bad input yields zero facts.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, text: &str) -> Vec<RawFact>;
}

/// Explicit ordered name → strategy registry.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.name() == name)
            .map(|extractor| extractor.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(|extractor| extractor.as_ref())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run_guarded(extractor: &dyn Extractor, text: &str) -> Vec<RawFact> {
    if text.trim().len() < MIN_CONTENT_LENGTH {
        return Vec::new();
    }
    extractor.extract(text)
}

/// Page-level extraction pipeline: contextual/structured strategy first (it
/// has the highest average confidence), then the plain-text strategies over
/// the page text, metadata, and anchor texts, plus direct promotion of
/// `mailto:` hrefs.
pub struct ContactPipeline {
    registry: ExtractorRegistry,
    contextual: ContextualExtractor,
}

impl ContactPipeline {
    pub fn new() -> Self {
        let mut registry = ExtractorRegistry::new();
        registry.register(Box::new(EmailExtractor::new()));
        registry.register(Box::new(NameExtractor::new()));
        registry.register(Box::new(PhoneExtractor::new()));
        registry.register(Box::new(TitleExtractor::new()));
        registry.register(Box::new(LinkedInExtractor::new()));
        Self {
            registry,
            contextual: ContextualExtractor::new(),
        }
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn extract_page(
        &self,
        page: &ParsedPage,
        raw_html: &str,
        source_url: &str,
    ) -> Vec<ExtractedFact> {
        let mut raw = Vec::new();

        raw.extend(self.contextual.extract_document(page, &self.registry));

        let text = page.text();
        let metas = page.meta_contents();
        let anchors = page.anchors();
        for name in ["email", "name", "phone", "title"] {
            let Some(extractor) = self.registry.get(name) else {
                continue;
            };
            raw.extend(run_guarded(extractor, &text));
            for meta in &metas {
                raw.extend(run_guarded(extractor, meta));
            }
            for anchor in &anchors {
                raw.extend(run_guarded(extractor, &anchor.text));
            }
        }

        // Profile links live in hrefs, so this strategy sees the raw markup.
        if let Some(linkedin) = self.registry.get("linkedin") {
            raw.extend(run_guarded(linkedin, raw_html));
        }

        for anchor in &anchors {
            if let Some(target) = anchor.href.strip_prefix("mailto:") {
                let address = target.split('?').next().unwrap_or_default();
                if !address.is_empty() {
                    raw.push(RawFact {
                        fact_type: FactType::Email,
                        value: address.to_lowercase(),
                        confidence: 1.0,
                    });
                }
            }
        }

        debug!("Extracted {} raw facts from {}", raw.len(), source_url);
        raw.into_iter()
            .map(|fact| ExtractedFact {
                fact_type: fact.fact_type,
                value: fact.value,
                confidence: fact.confidence,
                source_url: source_url.to_string(),
            })
            .collect()
    }
}

impl Default for ContactPipeline {
    fn default() -> Self {
        Self::new()
    }
}
