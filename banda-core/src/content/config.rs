//! Configuration for remote content sync

use std::time::Duration;

/// Default remote location of the content documents
pub const DEFAULT_CONTENT_URL: &str =
    "https://raw.githubusercontent.com/ildefonso0/QUIZ_SOU_DA_BANDA/main";

/// Configuration for the content sync system
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Base URL all content paths are resolved against
    pub content_url: String,

    /// Path of the app config document
    pub config_path: String,

    /// Path of the categories document
    pub categories_path: String,

    /// Path of the quizzes document
    pub quizzes_path: String,

    /// Check interval used until a config with its own interval is cached
    pub default_update_interval: Duration,

    /// HTTP timeout for fetches
    pub timeout: Duration,

    /// Maximum content document size (bytes)
    pub max_content_size: u64,

    /// Proxy URL
    pub proxy_url: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_url: DEFAULT_CONTENT_URL.to_string(),
            config_path: "data/config.json".to_string(),
            categories_path: "data/categorias.json".to_string(),
            quizzes_path: "data/quizzes.json".to_string(),
            default_update_interval: Duration::from_secs(24 * 3600),
            timeout: Duration::from_secs(30),
            max_content_size: 5 * 1024 * 1024, // 5 MB
            proxy_url: None,
        }
    }
}

impl ContentConfig {
    /// Point at a different content host or branch
    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Configure with custom proxy
    pub fn with_proxy(mut self, proxy_url: String) -> Self {
        self.proxy_url = Some(proxy_url);
        self
    }

    /// Override the fallback check interval
    pub fn with_default_interval(mut self, interval: Duration) -> Self {
        self.default_update_interval = interval;
        self
    }

    /// Full URL of the config document
    pub fn config_url(&self) -> String {
        self.url_for(&self.config_path)
    }

    /// Full URL of the categories document
    pub fn categories_url(&self) -> String {
        self.url_for(&self.categories_path)
    }

    /// Full URL of the quizzes document
    pub fn quizzes_url(&self) -> String {
        self.url_for(&self.quizzes_path)
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.content_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
