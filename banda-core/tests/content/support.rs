// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared fixtures: a scripted remote, a store that can refuse writes and
//! a status recorder.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use banda_core::content::{
    parse_timestamp, AppConfig, Category, ContentConfig, ContentFetcher, CorrectAnswer,
    FetchError, KeyValueStore, LocalCache, MemoryStore, Quiz, QuizId, QuizKind, StoreError,
    SyncCoordinator, SyncListener, SyncStatus, Theme,
};

pub fn app_config(version: &str, updated_at: &str) -> AppConfig {
    AppConfig {
        version: version.to_string(),
        last_updated_at: parse_timestamp(updated_at).unwrap(),
        update_interval_hours: 24.0,
        theme: Theme::default(),
    }
}

pub fn categories() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Música".to_string(),
            description: "Semba, kizomba e kuduro".to_string(),
            icon: Some("🎵".to_string()),
        },
        Category {
            id: 2,
            name: "Geografia".to_string(),
            description: "Províncias e rios".to_string(),
            icon: None,
        },
    ]
}

pub fn quiz(id: i64, category: &str, kind: &str, answer: CorrectAnswer) -> Quiz {
    Quiz {
        id: QuizId::Number(id),
        category: category.to_string(),
        kind: QuizKind::from(kind.to_string()),
        prompt: format!("Pergunta {}", id),
        options: None,
        correct_answer: answer,
        image: None,
        explanation: None,
    }
}

/// Three quizzes: multiple choice, true/false and an unrenderable kind
pub fn quizzes() -> Vec<Quiz> {
    vec![
        Quiz {
            options: Some(vec![
                "Luanda".to_string(),
                "Benguela".to_string(),
                "Huambo".to_string(),
            ]),
            ..quiz(1, "Geografia", "multipla_escolha", CorrectAnswer::Index(0))
        },
        quiz(2, "Música", "verdadeiro_falso", CorrectAnswer::Flag(true)),
        quiz(3, "Música", "quiz_relacionar", CorrectAnswer::default()),
    ]
}

/// Remote whose documents can be swapped or withdrawn between calls
#[derive(Default)]
pub struct ScriptedFetcher {
    config: Mutex<Option<AppConfig>>,
    categories: Mutex<Option<Vec<Category>>>,
    quizzes: Mutex<Option<Vec<Quiz>>>,
    config_calls: AtomicUsize,
    quiz_calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn online(config: AppConfig) -> Arc<Self> {
        let fetcher = Self::default();
        fetcher.set_config(Some(config));
        fetcher.set_categories(Some(categories()));
        fetcher.set_quizzes(Some(quizzes()));
        Arc::new(fetcher)
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_config(&self, config: Option<AppConfig>) {
        *self.config.lock().unwrap() = config;
    }

    pub fn set_categories(&self, categories: Option<Vec<Category>>) {
        *self.categories.lock().unwrap() = categories;
    }

    pub fn set_quizzes(&self, quizzes: Option<Vec<Quiz>>) {
        *self.quizzes.lock().unwrap() = quizzes;
    }

    pub fn config_calls(&self) -> usize {
        self.config_calls.load(Ordering::SeqCst)
    }

    /// Number of full downloads attempted (each fetches the quiz list once)
    pub fn downloads(&self) -> usize {
        self.quiz_calls.load(Ordering::SeqCst)
    }
}

fn scripted<T: Clone>(slot: &Mutex<Option<T>>, document: &str) -> Result<T, FetchError> {
    slot.lock()
        .unwrap()
        .clone()
        .ok_or_else(|| FetchError::Unavailable(format!("{} withdrawn", document)))
}

#[async_trait]
impl ContentFetcher for ScriptedFetcher {
    async fn fetch_config(&self) -> Result<AppConfig, FetchError> {
        self.config_calls.fetch_add(1, Ordering::SeqCst);
        scripted(&self.config, "config")
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        scripted(&self.categories, "categories")
    }

    async fn fetch_quizzes(&self) -> Result<Vec<Quiz>, FetchError> {
        self.quiz_calls.fetch_add(1, Ordering::SeqCst);
        scripted(&self.quizzes, "quizzes")
    }
}

/// Memory store that can be told to reject every write, or only the
/// writes touching one key
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    reject_writes: AtomicBool,
    rejected_key: Mutex<Option<String>>,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Refuse any write that includes `key`, batches included
    pub fn reject_key(&self, key: &str) {
        *self.rejected_key.lock().unwrap() = Some(key.to_string());
    }

    fn check<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("storage full".to_string()));
        }
        let rejected = self.rejected_key.lock().unwrap();
        if let Some(rejected) = rejected.as_deref() {
            if keys.into_iter().any(|key| key == rejected) {
                return Err(StoreError::Rejected(format!("{} is read-only", rejected)));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check([key])?;
        self.inner.set(key, value).await
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        self.check(entries.iter().map(|(key, _)| *key))?;
        self.inner.set_many(entries).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.check(keys.iter().copied())?;
        self.inner.remove_many(keys).await
    }
}

/// Listener that keeps every status it receives
#[derive(Default)]
pub struct StatusLog {
    seen: Mutex<Vec<SyncStatus>>,
}

impl StatusLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn statuses(&self) -> Vec<SyncStatus> {
        self.seen.lock().unwrap().clone()
    }
}

impl SyncListener for StatusLog {
    fn on_status(&self, status: &SyncStatus) {
        self.seen.lock().unwrap().push(status.clone());
    }
}

pub fn coordinator_with(
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<ScriptedFetcher>,
) -> Arc<SyncCoordinator> {
    let cache = Arc::new(LocalCache::new(store));
    SyncCoordinator::new(cache, fetcher, &ContentConfig::default())
}

pub fn coordinator(fetcher: Arc<ScriptedFetcher>) -> Arc<SyncCoordinator> {
    coordinator_with(Arc::new(MemoryStore::new()), fetcher)
}
