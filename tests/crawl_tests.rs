mod common;

use std::sync::Arc;

use contact_crawler::config::{Config, CrawlConfig, RateLimitConfig};
use contact_crawler::crawler::CrawlOrchestrator;
use contact_crawler::extractors::FactType;

use common::ScriptedTransport;

/// Sequential fetching and generous rate limits keep request order
/// deterministic.
fn test_config(max_depth: u32, max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawl = CrawlConfig {
        max_depth,
        max_pages_per_domain: max_pages,
        concurrency: 1,
        timeout_seconds: 5,
        max_retries: 1,
        user_agent: "test-agent/1.0".to_string(),
    };
    config.rate_limits = RateLimitConfig {
        global_requests: 1000,
        global_period_seconds: 1,
        domain_requests: 1000,
        domain_period_seconds: 1,
    };
    config
}

const ROOT: &str = r#"<html><body>
    <a href="/team">Our Team</a>
    <a href="/privacy">Privacy</a>
</body></html>"#;

const TEAM: &str = r#"<html><body>
    <section class="team">
        <p>Jane Doe, CTO</p>
        <a href="mailto:jane@example.com">Email Jane</a>
    </section>
</body></html>"#;

const PRIVACY: &str = r#"<html><body><p>Boring legalese.</p></body></html>"#;

#[tokio::test]
async fn relevant_links_are_crawled_first_and_contacts_collected() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("http://127.0.0.1/", ROOT)
            .page("http://127.0.0.1/team", TEAM)
            .page("http://127.0.0.1/privacy", PRIVACY),
    );
    let orchestrator = CrawlOrchestrator::new(&test_config(2, 50), transport.clone());

    let result = orchestrator.crawl("http://127.0.0.1").await.unwrap();

    assert!(result.success);
    assert_eq!(result.pages_crawled, 3);
    // The keyword-scored /team link outranks /privacy in the frontier.
    assert_eq!(
        transport.requested(),
        vec![
            "http://127.0.0.1/".to_string(),
            "http://127.0.0.1/team".to_string(),
            "http://127.0.0.1/privacy".to_string(),
        ]
    );

    let email = result
        .facts
        .iter()
        .find(|f| f.fact_type == FactType::Email && f.value == "jane@example.com")
        .expect("email fact missing");
    assert_eq!(email.confidence, 1.0);
    assert!(result
        .facts
        .iter()
        .any(|f| f.fact_type == FactType::Name && f.value == "Jane Doe"));
    assert!(result
        .facts
        .iter()
        .any(|f| f.fact_type == FactType::Title && f.value == "CTO" && f.confidence == 1.0));
}

#[tokio::test]
async fn page_budget_caps_the_crawl() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("http://127.0.0.1/", ROOT)
            .page("http://127.0.0.1/team", TEAM)
            .page("http://127.0.0.1/privacy", PRIVACY),
    );
    let orchestrator = CrawlOrchestrator::new(&test_config(2, 2), transport.clone());

    let result = orchestrator.crawl("http://127.0.0.1").await.unwrap();

    assert_eq!(result.pages_crawled, 2);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn depth_limit_stops_link_discovery() {
    let team_with_deep_link = r#"<html><body>
        <a href="/team/more-people">More People</a>
    </body></html>"#;
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("http://127.0.0.1/", ROOT)
            .page("http://127.0.0.1/team", team_with_deep_link)
            .page("http://127.0.0.1/privacy", PRIVACY),
    );
    let orchestrator = CrawlOrchestrator::new(&test_config(1, 50), transport.clone());

    orchestrator.crawl("http://127.0.0.1").await.unwrap();

    assert!(!transport
        .requested()
        .contains(&"http://127.0.0.1/team/more-people".to_string()));
}

#[tokio::test]
async fn off_domain_links_are_never_fetched() {
    let root = r#"<html><body>
        <a href="http://other.com/about-us">About them</a>
        <a href="/team">Our Team</a>
    </body></html>"#;
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("http://127.0.0.1/", root)
            .page("http://127.0.0.1/team", TEAM),
    );
    let orchestrator = CrawlOrchestrator::new(&test_config(2, 50), transport.clone());

    orchestrator.crawl("http://127.0.0.1").await.unwrap();

    assert!(transport
        .requested()
        .iter()
        .all(|url| url.starts_with("http://127.0.0.1/")));
}

#[tokio::test]
async fn failed_page_is_skipped_and_the_crawl_continues() {
    let privacy_with_contact = r#"<html><body>
        <a href="mailto:legal@example.com">Contact legal</a>
    </body></html>"#;
    let transport = Arc::new(
        ScriptedTransport::new()
            .page("http://127.0.0.1/", ROOT)
            .status("http://127.0.0.1/team", 500)
            .page("http://127.0.0.1/privacy", privacy_with_contact),
    );
    let orchestrator = CrawlOrchestrator::new(&test_config(2, 50), transport.clone());

    let result = orchestrator.crawl("http://127.0.0.1").await.unwrap();

    assert!(result.success);
    assert_eq!(result.pages_crawled, 2);
    assert!(result
        .facts
        .iter()
        .any(|f| f.fact_type == FactType::Email && f.value == "legal@example.com"));
}

#[tokio::test]
async fn seed_without_scheme_defaults_to_http() {
    let transport = Arc::new(ScriptedTransport::new().page("http://127.0.0.1/", PRIVACY));
    let orchestrator = CrawlOrchestrator::new(&test_config(1, 50), transport.clone());

    let result = orchestrator.crawl("127.0.0.1").await.unwrap();

    assert_eq!(result.pages_crawled, 1);
    assert_eq!(transport.requested(), vec!["http://127.0.0.1/".to_string()]);
}

#[tokio::test]
async fn a_failing_seed_never_aborts_the_batch() {
    let transport = Arc::new(ScriptedTransport::new().page("http://127.0.0.1/", PRIVACY));
    let orchestrator = CrawlOrchestrator::new(&test_config(1, 50), transport);

    let results = orchestrator
        .crawl_all(&[
            "http://127.0.0.1".to_string(),
            "::::not a url".to_string(),
        ])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert!(results[1].facts.is_empty());
    assert!(results[1].error_message.is_some());
}
