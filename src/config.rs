use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub rate_limits: RateLimitConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub seed_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlConfig {
    pub max_depth: u32,
    pub max_pages_per_domain: usize,
    pub concurrency: usize,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub global_requests: usize,
    pub global_period_seconds: u64,
    pub domain_requests: usize,
    pub domain_period_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            rate_limits: RateLimitConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "output".to_string(),
                pretty_json: true,
            },
            seed_urls: Vec::new(),
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages_per_domain: 50,
            concurrency: 5,
            timeout_seconds: 30,
            max_retries: 3,
            user_agent: "Mozilla/5.0 (compatible; ContactCrawler/1.0)".to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_requests: 10,
            global_period_seconds: 1,
            domain_requests: 5,
            domain_period_seconds: 1,
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
