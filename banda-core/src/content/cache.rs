// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local cache for synced quiz content
//!
//! Owns the on-device copies of the config, categories, quizzes and sync
//! status, each stored as JSON under a fixed key. Reads never fail: a
//! missing or unparsable record comes back as a miss. Writes propagate
//! their errors so a sync can abort without touching older content.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use super::store::{KeyValueStore, StoreError};
use super::types::{parse_timestamp, AppConfig, Category, Quiz, SyncStatus};

/// Storage keys used by the cache
pub mod keys {
    pub const CONFIG: &str = "@quiz_sou_da_banda/config";
    pub const CATEGORIES: &str = "@quiz_sou_da_banda/categorias";
    pub const QUIZZES: &str = "@quiz_sou_da_banda/quizzes";
    pub const SYNC_STATUS: &str = "@quiz_sou_da_banda/sync_status";
    pub const LAST_SYNC: &str = "@quiz_sou_da_banda/last_sync";

    pub const ALL: [&str; 5] = [CONFIG, CATEGORIES, QUIZZES, SYNC_STATUS, LAST_SYNC];
}

/// Outcome of a cache read
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRead<T> {
    /// Record present and parsed
    Hit(T),
    /// Nothing stored under the key
    Miss,
    /// Stored value could not be read or parsed
    Corrupt(String),
}

impl<T> CacheRead<T> {
    /// The value, treating misses and corrupt records alike as absent
    pub fn value(self) -> Option<T> {
        match self {
            CacheRead::Hit(value) => Some(value),
            CacheRead::Miss | CacheRead::Corrupt(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheRead::Hit(_))
    }
}

/// Local cache for remote quiz content
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    /// Create a cache on top of the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get_config(&self) -> CacheRead<AppConfig> {
        self.read_json(keys::CONFIG).await
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<(), CacheError> {
        self.write_json(keys::CONFIG, config).await
    }

    pub async fn get_categories(&self) -> CacheRead<Vec<Category>> {
        self.read_json(keys::CATEGORIES).await
    }

    pub async fn save_categories(&self, categories: &[Category]) -> Result<(), CacheError> {
        self.write_json(keys::CATEGORIES, &categories).await
    }

    pub async fn get_quizzes(&self) -> CacheRead<Vec<Quiz>> {
        self.read_json(keys::QUIZZES).await
    }

    pub async fn save_quizzes(&self, quizzes: &[Quiz]) -> Result<(), CacheError> {
        self.write_json(keys::QUIZZES, &quizzes).await
    }

    pub async fn get_sync_status(&self) -> CacheRead<SyncStatus> {
        self.read_json(keys::SYNC_STATUS).await
    }

    pub async fn save_sync_status(&self, status: &SyncStatus) -> Result<(), CacheError> {
        self.write_json(keys::SYNC_STATUS, status).await
    }

    /// Replace config, categories and quizzes in one commit
    ///
    /// The sync status describing the new content and its last-sync time
    /// are part of the same batch, so the status never names a version
    /// that is not cached. Everything is serialized before anything is
    /// written.
    pub async fn save_content(
        &self,
        config: &AppConfig,
        categories: &[Category],
        quizzes: &[Quiz],
        status: &SyncStatus,
    ) -> Result<(), CacheError> {
        let batch = [
            (keys::CONFIG, serde_json::to_string(config)?),
            (keys::CATEGORIES, serde_json::to_string(categories)?),
            (keys::QUIZZES, serde_json::to_string(quizzes)?),
            (keys::SYNC_STATUS, serde_json::to_string(status)?),
            (keys::LAST_SYNC, status.last_sync.to_rfc3339()),
        ];
        self.store.set_many(&batch).await.map_err(|e| {
            error!("Error saving synced content to cache: {}", e);
            CacheError::from(e)
        })
    }

    /// Record "now" as the last successful sync
    pub async fn update_last_sync(&self) -> Result<(), CacheError> {
        let now = Utc::now().to_rfc3339();
        self.store.set(keys::LAST_SYNC, &now).await.map_err(|e| {
            error!("Error updating last sync: {}", e);
            CacheError::from(e)
        })
    }

    /// Time of the last successful sync
    pub async fn get_last_sync(&self) -> Option<DateTime<Utc>> {
        match self.store.get(keys::LAST_SYNC).await {
            Ok(raw) => raw.as_deref().and_then(parse_timestamp),
            Err(e) => {
                warn!("Error getting last sync: {}", e);
                None
            }
        }
    }

    /// Remove every cached record
    pub async fn clear_all(&self) -> Result<(), CacheError> {
        self.store.remove_many(&keys::ALL).await.map_err(|e| {
            error!("Error clearing cache: {}", e);
            CacheError::from(e)
        })
    }

    /// True only when a config and a non-empty quiz list are cached
    pub async fn has_cached_data(&self) -> bool {
        let has_config = self.get_config().await.is_hit();
        let has_quizzes = self
            .get_quizzes()
            .await
            .value()
            .is_some_and(|quizzes| !quizzes.is_empty());
        has_config && has_quizzes
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> CacheRead<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheRead::Miss,
            Err(e) => {
                warn!("Error reading {} from cache: {}", key, e);
                return CacheRead::Corrupt(e.to_string());
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => CacheRead::Hit(value),
            Err(e) => {
                warn!("Discarding unreadable cache record {}: {}", key, e);
                CacheRead::Corrupt(e.to_string())
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let data = serde_json::to_string(value)?;
        self.store.set(key, &data).await.map_err(|e| {
            error!("Error saving {} to cache: {}", key, e);
            CacheError::from(e)
        })
    }
}

/// Errors that can occur with the local cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Storage backend error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
