//! CLI Configuration

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use banda_core::content::{
    ContentConfig, ContentFetcher, LocalCache, QuestionService, SqliteStore, SyncCoordinator,
};
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Data directory for the content cache.
    pub data_dir: PathBuf,
    /// Base URL of the content repository.
    pub content_url: String,
}

impl CliConfig {
    /// Returns the path of the cache database.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("data.db")
    }

    /// Content sync settings for this invocation.
    pub fn content_config(&self) -> ContentConfig {
        ContentConfig::default().with_content_url(self.content_url.clone())
    }

    /// Opens the local cache, creating the data directory if needed.
    pub fn open_cache(&self) -> Result<Arc<LocalCache>> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Cannot create data directory {:?}", self.data_dir))?;
        let store = SqliteStore::open(self.storage_path())
            .with_context(|| format!("Cannot open cache at {:?}", self.storage_path()))?;
        Ok(Arc::new(LocalCache::new(Arc::new(store))))
    }

    /// Remote content source.
    #[cfg(feature = "remote-content")]
    pub fn fetcher(&self) -> Result<Arc<dyn ContentFetcher>> {
        let fetcher = banda_core::content::HttpFetcher::new(&self.content_config())?;
        Ok(Arc::new(fetcher))
    }

    /// Remote content source (disabled in this build).
    #[cfg(not(feature = "remote-content"))]
    pub fn fetcher(&self) -> Result<Arc<dyn ContentFetcher>> {
        Ok(Arc::new(banda_core::content::OfflineFetcher))
    }

    /// Wires cache, fetcher and coordinator into a question service.
    pub fn question_service(&self) -> Result<QuestionService> {
        debug!("Content from {}, cache at {:?}", self.content_url, self.storage_path());
        let coordinator =
            SyncCoordinator::new(self.open_cache()?, self.fetcher()?, &self.content_config());
        Ok(QuestionService::new(coordinator))
    }
}
