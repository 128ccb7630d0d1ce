// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote quiz content module
//!
//! Provides functionality for fetching, caching, and serving remotely
//! updatable quiz content:
//! - App config (version, update interval, theme)
//! - Categories
//! - Quizzes
//!
//! Content is versioned by the remote config and replaced as a whole.
//! Bundled questions serve as fallback when no synced content is available.

mod adapter;
mod cache;
mod config;
mod events;
mod fetcher;
mod questions;
mod store;
mod sync;
mod types;

pub use adapter::{quiz_to_question, quizzes_to_questions, PLACEHOLDER_LABELS, TRUE_FALSE_LABELS};
pub use cache::{keys, CacheError, CacheRead, LocalCache};
pub use config::{ContentConfig, DEFAULT_CONTENT_URL};
pub use events::{CallbackListener, ListenerId, ListenerRegistry, SyncListener};
#[cfg(feature = "remote-content")]
pub use fetcher::HttpFetcher;
pub use fetcher::{ContentFetcher, FetchError, OfflineFetcher};
pub use questions::{bundled_questions, QuestionService, QuestionSource};
pub use store::{FileStore, KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use sync::{needs_update, SyncCoordinator, SyncError, SyncPhase, UpdateDecision};
pub use types::{
    interval_from_hours, next_sync_after, parse_timestamp, AppConfig, Category, CorrectAnswer,
    DisplayKind, Question, QuestionOption, Quiz, QuizId, QuizKind, SyncStatus, Theme, ThemeMode,
    DEFAULT_UPDATE_INTERVAL_HOURS, UNKNOWN_VERSION,
};
