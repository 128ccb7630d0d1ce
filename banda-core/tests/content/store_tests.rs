// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the key-value backends
//!
//! Every backend must behave the same through `KeyValueStore`.

use banda_core::content::{FileStore, KeyValueStore, MemoryStore, SqliteStore};
use tempfile::TempDir;

async fn exercise(store: &dyn KeyValueStore) {
    assert_eq!(store.get("@quiz_sou_da_banda/config").await.unwrap(), None);

    store.set("@quiz_sou_da_banda/config", "{\"versao\":\"1.0\"}").await.unwrap();
    assert_eq!(
        store.get("@quiz_sou_da_banda/config").await.unwrap().as_deref(),
        Some("{\"versao\":\"1.0\"}")
    );

    store
        .set_many(&[
            ("@quiz_sou_da_banda/config", "{\"versao\":\"1.1\"}".to_string()),
            ("@quiz_sou_da_banda/quizzes", "[]".to_string()),
        ])
        .await
        .unwrap();
    assert_eq!(
        store.get("@quiz_sou_da_banda/config").await.unwrap().as_deref(),
        Some("{\"versao\":\"1.1\"}")
    );
    assert_eq!(
        store.get("@quiz_sou_da_banda/quizzes").await.unwrap().as_deref(),
        Some("[]")
    );

    // Removing a missing key is not an error
    store
        .remove_many(&["@quiz_sou_da_banda/config", "@quiz_sou_da_banda/never_written"])
        .await
        .unwrap();
    assert_eq!(store.get("@quiz_sou_da_banda/config").await.unwrap(), None);
    assert!(store.get("@quiz_sou_da_banda/quizzes").await.unwrap().is_some());
}

#[tokio::test]
async fn test_memory_store_contract() {
    exercise(&MemoryStore::new()).await;
}

#[tokio::test]
async fn test_file_store_contract() {
    let temp = TempDir::new().unwrap();
    exercise(&FileStore::open(temp.path()).unwrap()).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    exercise(&SqliteStore::in_memory().unwrap()).await;
}

#[tokio::test]
async fn test_file_store_creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("nested").join("cache");

    let store = FileStore::open(&dir).unwrap();
    store.set("@quiz_sou_da_banda/last_sync", "2026-01-01T00:00:00Z").await.unwrap();

    assert!(dir.join("quiz_sou_da_banda_last_sync.json").exists());
}

#[tokio::test]
async fn test_file_store_leaves_no_temp_files_after_batch() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path()).unwrap();

    store
        .set_many(&[
            ("@quiz_sou_da_banda/config", "{}".to_string()),
            ("@quiz_sou_da_banda/categorias", "[]".to_string()),
            ("@quiz_sou_da_banda/quizzes", "[]".to_string()),
        ])
        .await
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_file_store_failed_staging_keeps_previous_batch() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path()).unwrap();
    store.set("@quiz_sou_da_banda/config", "{\"versao\":\"1.0\"}").await.unwrap();

    // A directory in the way of the quizzes temp file makes staging fail
    std::fs::create_dir(temp.path().join("quiz_sou_da_banda_quizzes.tmp")).unwrap();

    let result = store
        .set_many(&[
            ("@quiz_sou_da_banda/config", "{\"versao\":\"2.0\"}".to_string()),
            ("@quiz_sou_da_banda/quizzes", "[]".to_string()),
        ])
        .await;

    assert!(result.is_err());
    assert_eq!(
        store.get("@quiz_sou_da_banda/config").await.unwrap().as_deref(),
        Some("{\"versao\":\"1.0\"}")
    );
    assert!(!temp.path().join("quiz_sou_da_banda_config.tmp").exists());
}
