use tracing::debug;
use url::Url;

use crate::crawler::frontier::Frontier;
use crate::crawler::page::Anchor;
use crate::crawler::types::CandidateUrl;

/// URL path / anchor text keywords that mark pages likely to carry contact
/// information.
const RELEVANCE_KEYWORDS: &[&str] = &[
    "our-story",
    "join-us",
    "company-info",
    "about-company",
    "employees",
    "get-in-touch",
    "people",
    "divisions",
    "team",
    "board",
    "contact-us",
    "directors",
    "leadership",
    "about-team",
    "history",
    "social",
    "departments",
    "news",
    "reach-us",
    "offices",
    "executives",
    "work-with-us",
    "awards",
    "directory",
    "company",
    "what-we-do",
    "media",
    "careers",
    "meet-the-team",
    "press",
    "corporate",
    "insights",
    "staff",
    "publications",
    "events",
    "blog",
    "support",
    "founder",
    "who-we-are",
    "management",
    "about-us",
    "mission",
    "locations",
    "values",
    "help",
    "our-team",
    "contact",
];

/// Targets that are not HTML documents.
const SKIPPED_EXTENSIONS: &[&str] = &[
    ".json", ".css", ".png", ".jpg", ".svg", ".ico", ".js", ".gif", ".pdf", ".xml",
];

/// Scores outbound links for contact relevance and feeds the survivors back
/// into the frontier. Lower priority number means earlier dequeue, so a link
/// scoring `s` is enqueued at `100 - s`; links scoring zero or below are
/// never enqueued.
pub struct LinkScorer;

impl LinkScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn discover(
        &self,
        anchors: &[Anchor],
        base_url: &Url,
        parent_depth: u32,
        frontier: &mut Frontier,
    ) {
        let mut enqueued = 0usize;
        for anchor in anchors {
            let Some(resolved) = self.resolve(&anchor.href, base_url) else {
                continue;
            };
            if !self.is_document_url(&resolved) {
                continue;
            }
            let same_domain = resolved
                .host_str()
                .map(|host| host.eq_ignore_ascii_case(frontier.seed_domain()))
                .unwrap_or(false);
            if !same_domain {
                continue;
            }

            let score = self.relevance_score(resolved.path(), &anchor.text);
            if score <= 0 {
                continue;
            }

            if let Some(candidate) = CandidateUrl::new(resolved, parent_depth + 1, 100 - score) {
                frontier.push(candidate);
                enqueued += 1;
            }
        }
        debug!("Link scorer enqueued {} candidates from {}", enqueued, base_url);
    }

    /// +5 for a relevance keyword in the path, +3 for one in the anchor text,
    /// plus up to +3 favoring shallower paths.
    pub fn relevance_score(&self, path: &str, anchor_text: &str) -> i32 {
        let mut score = 0;

        let path = path.to_lowercase();
        if RELEVANCE_KEYWORDS.iter().any(|kw| path.contains(kw)) {
            score += 5;
        }

        let anchor_text = anchor_text.to_lowercase();
        if RELEVANCE_KEYWORDS.iter().any(|kw| anchor_text.contains(kw)) {
            score += 3;
        }

        let path_depth = path.matches('/').count() as i32;
        score += (3 - path_depth).max(0);

        score
    }

    fn resolve(&self, href: &str, base_url: &Url) -> Option<Url> {
        if href.starts_with("mailto:") {
            return None;
        }
        match Url::parse(href) {
            Ok(url) => Some(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => base_url.join(href).ok(),
            Err(_) => None,
        }
    }

    fn is_document_url(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }
        let path = url.path().to_lowercase();
        !SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
    }
}

impl Default for LinkScorer {
    fn default() -> Self {
        Self::new()
    }
}
