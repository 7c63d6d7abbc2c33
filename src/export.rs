use std::io::Write;

use chrono::Utc;
use tracing::info;

use crate::config::OutputConfig;
use crate::crawler::types::CrawlResult;
use crate::models::Result;

/// Write a batch's results into the output directory: the full records as
/// JSON plus a flat CSV of the aggregated facts.
pub async fn export_results(results: &[CrawlResult], config: &OutputConfig) -> Result<()> {
    tokio::fs::create_dir_all(&config.directory).await?;
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");

    let json_path = format!("{}/crawl_results_{}.json", config.directory, stamp);
    let payload = if config.pretty_json {
        serde_json::to_string_pretty(results)?
    } else {
        serde_json::to_string(results)?
    };
    tokio::fs::write(&json_path, payload).await?;
    info!("📤 Wrote crawl results to {}", json_path);

    let csv_path = format!("{}/contacts_{}.csv", config.directory, stamp);
    write_contacts_csv(results, &csv_path)?;
    info!("📤 Wrote contact facts to {}", csv_path);

    Ok(())
}

pub fn write_contacts_csv(results: &[CrawlResult], filename: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(filename).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(filename)?;
    writeln!(file, "start_url,type,value,confidence,source_url")?;

    for result in results {
        for fact in &result.facts {
            writeln!(
                file,
                "{},{},{},{:.2},{}",
                csv_escape(&result.start_url),
                fact.fact_type,
                csv_escape(&fact.value),
                fact.confidence,
                csv_escape(&fact.source_url)
            )?;
        }
    }

    Ok(())
}

/// Fact values are free text scraped from pages, so fields get quoted when
/// they would break the row.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
