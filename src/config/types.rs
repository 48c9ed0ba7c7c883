use serde::Deserialize;

/// Default per-request timeout for outbound calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default classification label that triggers a crawl
pub const DEFAULT_TARGET_LABEL: &str = "PERSONAL_BLOG";

/// Default user agent sent with page fetches
pub const DEFAULT_USER_AGENT: &str = "Spidey-Crawler/1.0 (Rust)";

/// Main configuration structure for Spidey
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
}

/// Classification service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the model service; requests go to `{base-url}/predict`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Label that marks a URL as worth crawling
    #[serde(rename = "target-label", default = "default_target_label")]
    pub target_label: String,
}

/// Page fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_target_label() -> String {
    DEFAULT_TARGET_LABEL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
