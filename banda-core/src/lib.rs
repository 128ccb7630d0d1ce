//! Quiz Sou da Banda Core Library
//!
//! Remotely updatable quiz content with an offline-first cache, and the
//! player profile session used for scoring and rankings.

pub mod content;
pub mod profile;

pub use content::{
    AppConfig, Category, ContentConfig, ContentFetcher, KeyValueStore, LocalCache, Question,
    QuestionService, QuestionSource, Quiz, SyncCoordinator, SyncStatus,
};
pub use profile::{points_for_answer, ProfileSession, ProfileStore, UserProfile};
