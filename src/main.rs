use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use contact_crawler::config::{load_config, Config};
use contact_crawler::crawler::{CrawlOrchestrator, ReqwestTransport};
use contact_crawler::export::export_results;
use contact_crawler::models::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    std::env::set_var(
        "RUST_LOG",
        format!("contact_crawler={},hyper=warn", config.logging.level),
    );
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Seed URLs from argv, falling back to the config file
    let mut seeds: Vec<String> = std::env::args().skip(1).collect();
    if seeds.is_empty() {
        seeds = config.seed_urls.clone();
    }
    if seeds.is_empty() {
        return Err("No seed URLs. Pass them as arguments or set seed_urls in config.yml".into());
    }

    // Create output directory
    tokio::fs::create_dir_all(&config.output.directory).await?;

    let transport = Arc::new(ReqwestTransport::new(&config.crawl.user_agent)?);
    let orchestrator = CrawlOrchestrator::new(&config, transport);

    // Add graceful shutdown
    tokio::select! {
        results = orchestrator.crawl_all(&seeds) => {
            export_results(&results, &config.output).await?;
            print_summary(&results);
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}

fn print_summary(results: &[contact_crawler::crawler::CrawlResult]) {
    for result in results {
        println!(
            "\n📇 {} — {} facts from {} pages in {}ms",
            result.start_url,
            result.facts.len(),
            result.pages_crawled,
            result.crawl_duration_ms
        );
        if let Some(message) = &result.error_message {
            println!("   ⚠️  {}", message);
        }

        let mut top = result.facts.clone();
        top.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for fact in top.iter().take(10) {
            println!(
                "   {} {} ({:.2}) — {}",
                fact.fact_type, fact.value, fact.confidence, fact.source_url
            );
        }
    }
}
