// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the local content cache
//!
//! Scenarios:
//! - Records survive a restart on disk-backed stores
//! - Config, categories and quizzes are committed together
//! - Unreadable records are treated as absent

use std::sync::Arc;

use banda_core::content::{
    keys, CacheRead, FileStore, KeyValueStore, LocalCache, MemoryStore, SqliteStore, SyncStatus,
};
use tempfile::TempDir;

use super::support::{app_config, categories, quizzes, FlakyStore};

const T0: &str = "2026-01-10T09:00:00Z";

fn status(version: &str) -> SyncStatus {
    SyncStatus::online(version, chrono::Utc::now(), std::time::Duration::from_secs(60))
}

fn memory_cache() -> (Arc<MemoryStore>, LocalCache) {
    let store = Arc::new(MemoryStore::new());
    let cache = LocalCache::new(store.clone());
    (store, cache)
}

#[tokio::test]
async fn test_empty_cache_reads_as_miss() {
    let (_, cache) = memory_cache();

    assert!(matches!(cache.get_config().await, CacheRead::Miss));
    assert!(matches!(cache.get_quizzes().await, CacheRead::Miss));
    assert!(cache.get_sync_status().await.value().is_none());
    assert!(cache.get_last_sync().await.is_none());
    assert!(!cache.has_cached_data().await);
}

#[tokio::test]
async fn test_save_content_commits_trio_status_and_last_sync() {
    let (store, cache) = memory_cache();

    cache
        .save_content(&app_config("1.0", T0), &categories(), &quizzes(), &status("1.0"))
        .await
        .unwrap();

    assert_eq!(store.len(), 5);
    assert_eq!(cache.get_config().await.value().unwrap().version, "1.0");
    assert_eq!(cache.get_categories().await.value().unwrap(), categories());
    assert_eq!(cache.get_quizzes().await.value().unwrap(), quizzes());

    let saved = cache.get_sync_status().await.value().unwrap();
    assert_eq!(saved.version, "1.0");
    assert_eq!(cache.get_last_sync().await, Some(saved.last_sync));
}

#[tokio::test]
async fn test_rejected_commit_writes_nothing() {
    let store = FlakyStore::new();
    let cache = LocalCache::new(store.clone());
    store.reject_writes(true);

    let result = cache
        .save_content(&app_config("1.0", T0), &categories(), &quizzes(), &status("1.0"))
        .await;

    assert!(result.is_err());
    assert!(!cache.get_config().await.is_hit());
    assert!(!cache.get_categories().await.is_hit());
    assert!(!cache.get_sync_status().await.is_hit());
    assert!(cache.get_last_sync().await.is_none());
}

#[tokio::test]
async fn test_has_cached_data_lifecycle() {
    let (_, cache) = memory_cache();
    assert!(!cache.has_cached_data().await);

    cache.save_config(&app_config("1.0", T0)).await.unwrap();
    assert!(!cache.has_cached_data().await, "config alone is not enough");

    cache.save_quizzes(&[]).await.unwrap();
    assert!(!cache.has_cached_data().await, "empty quiz list is not enough");

    cache.save_quizzes(&quizzes()).await.unwrap();
    assert!(cache.has_cached_data().await);

    cache.clear_all().await.unwrap();
    assert!(!cache.has_cached_data().await);
}

#[tokio::test]
async fn test_clear_all_removes_every_record() {
    let (store, cache) = memory_cache();
    cache
        .save_content(&app_config("1.0", T0), &categories(), &quizzes(), &status("1.0"))
        .await
        .unwrap();

    cache.clear_all().await.unwrap();

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_corrupt_quiz_list_is_not_cached_data() {
    let (store, cache) = memory_cache();
    cache.save_config(&app_config("1.0", T0)).await.unwrap();
    store.set(keys::QUIZZES, "[{\"id\":").await.unwrap();

    assert!(matches!(cache.get_quizzes().await, CacheRead::Corrupt(_)));
    assert!(!cache.has_cached_data().await);
}

#[tokio::test]
async fn test_last_sync_accepts_legacy_timestamp() {
    let (store, cache) = memory_cache();
    store.set(keys::LAST_SYNC, "2026-01-10T09:00:00").await.unwrap();

    let last_sync = cache.get_last_sync().await.unwrap();
    assert_eq!(last_sync.to_rfc3339(), "2026-01-10T09:00:00+00:00");
}

#[tokio::test]
async fn test_update_last_sync_moves_forward() {
    let (_, cache) = memory_cache();
    let before = chrono::Utc::now();

    cache.update_last_sync().await.unwrap();

    assert!(cache.get_last_sync().await.unwrap() >= before);
}

#[tokio::test]
async fn test_file_store_cache_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let cache = LocalCache::new(Arc::new(FileStore::open(temp.path()).unwrap()));
        cache
            .save_content(&app_config("1.0", T0), &categories(), &quizzes(), &status("1.0"))
            .await
            .unwrap();
    }

    let cache = LocalCache::new(Arc::new(FileStore::open(temp.path()).unwrap()));
    assert!(cache.has_cached_data().await);
    assert_eq!(cache.get_config().await.value().unwrap().version, "1.0");
}

#[tokio::test]
async fn test_sqlite_cache_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("banda.db");
    {
        let cache = LocalCache::new(Arc::new(SqliteStore::open(&path).unwrap()));
        cache
            .save_content(&app_config("1.0", T0), &categories(), &quizzes(), &status("1.0"))
            .await
            .unwrap();
    }

    let cache = LocalCache::new(Arc::new(SqliteStore::open(&path).unwrap()));
    assert!(cache.has_cached_data().await);
    assert_eq!(cache.get_quizzes().await.value().unwrap().len(), 3);
}
