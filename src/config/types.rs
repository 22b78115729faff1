use serde::Deserialize;
use std::time::Duration;

/// Ranking page crawled when no configuration overrides it
pub const DEFAULT_RANKING_URL: &str = "https://www.csfd.cz/zebricky/nejlepsi-filmy/?show=complete";

/// Main configuration structure for Reel-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Ranking page the crawl starts from
    #[serde(rename = "ranking-url")]
    pub ranking_url: String,

    /// Pause after every network fetch (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            ranking_url: DEFAULT_RANKING_URL.to_string(),
            request_delay_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/4.0".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding one file per fetched page
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// SQLite database used when no `--db` target is given
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cache_dir: "cache".to_string(),
            database_path: "movies.sqlite".to_string(),
        }
    }
}
