//! Content fetcher for downloading remote quiz documents
//!
//! Each document (config, categories, quizzes) is fetched independently.
//! Fetchers do not retry; the sync coordinator's schedule is the retry
//! policy.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{AppConfig, Category, Quiz};

#[cfg(feature = "remote-content")]
use super::config::ContentConfig;
#[cfg(feature = "remote-content")]
use reqwest::Client;
#[cfg(feature = "remote-content")]
use serde::de::DeserializeOwned;

/// Source of the three remote content documents
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the app config document
    async fn fetch_config(&self) -> Result<AppConfig, FetchError>;

    /// Fetch the categories document
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError>;

    /// Fetch the quizzes document
    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, FetchError>;
}

/// Fetches content over HTTP from the configured content URL
#[cfg(feature = "remote-content")]
pub struct HttpFetcher {
    client: Client,
    config_url: String,
    categories_url: String,
    quizzes_url: String,
    max_content_size: u64,
}

#[cfg(feature = "remote-content")]
impl HttpFetcher {
    /// Create a new content fetcher from config
    pub fn new(config: &ContentConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().timeout(config.timeout).user_agent(format!(
            "QuizSouDaBanda/{}",
            option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
        ));

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            config_url: config.config_url(),
            categories_url: config.categories_url(),
            quizzes_url: config.quizzes_url(),
            max_content_size: config.max_content_size,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpError(response.status().as_u16()));
        }

        // Check content length before downloading
        if let Some(len) = response.content_length() {
            if len > self.max_content_size {
                return Err(FetchError::TooLarge {
                    size: len,
                    max: self.max_content_size,
                });
            }
        }

        let data = response.bytes().await?;

        // Verify size after download (in case content-length was missing)
        if data.len() as u64 > self.max_content_size {
            return Err(FetchError::TooLarge {
                size: data.len() as u64,
                max: self.max_content_size,
            });
        }

        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(feature = "remote-content")]
#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch_config(&self) -> Result<AppConfig, FetchError> {
        self.fetch_json(&self.config_url).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        self.fetch_json(&self.categories_url).await
    }

    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, FetchError> {
        self.fetch_json(&self.quizzes_url).await
    }
}

/// Fetcher used when the build has no HTTP client; every fetch is unavailable
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineFetcher;

#[async_trait]
impl ContentFetcher for OfflineFetcher {
    async fn fetch_config(&self) -> Result<AppConfig, FetchError> {
        Err(FetchError::FeatureDisabled)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        Err(FetchError::FeatureDisabled)
    }

    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, FetchError> {
        Err(FetchError::FeatureDisabled)
    }
}

/// Errors that can occur during content fetching
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP error with status code
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Network/request error
    #[cfg(feature = "remote-content")]
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Content too large
    #[error("Content too large: {size} bytes (max {max})")]
    TooLarge {
        /// Actual size in bytes
        size: u64,
        /// Maximum allowed size in bytes
        max: u64,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Remote source could not be reached
    #[error("Remote unavailable: {0}")]
    Unavailable(String),

    /// Remote content feature is not enabled
    #[error("Remote content feature is not enabled")]
    FeatureDisabled,
}
