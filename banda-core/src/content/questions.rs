// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Question service - the entry point screens use for quiz content
//!
//! Serves synced quizzes (adapted to the display schema) when the cache has
//! any, and the bundled question set otherwise. Nothing here returns an
//! error: failures degrade to bundled content, empty lists or `false`.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::OnceCell;
use tracing::error;

use super::adapter::quizzes_to_questions;
use super::sync::SyncCoordinator;
use super::types::{Question, SyncStatus};

const BUNDLED_QUESTIONS: &str = include_str!("../../data/questions.json");

/// Where the questions currently served come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    /// Quizzes synced from the remote, adapted for display
    Synced,
    /// Question set compiled into the binary
    Bundled,
}

/// Read-only access to quiz content for the UI
pub struct QuestionService {
    coordinator: Arc<SyncCoordinator>,
    bundled: Vec<Question>,
    initialized: OnceCell<SyncStatus>,
}

impl QuestionService {
    /// Create a service backed by the bundled question set
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self::with_bundled(coordinator, bundled_questions())
    }

    /// Create a service with a custom fallback set
    pub fn with_bundled(coordinator: Arc<SyncCoordinator>, bundled: Vec<Question>) -> Self {
        Self {
            coordinator,
            bundled,
            initialized: OnceCell::new(),
        }
    }

    /// Initialize the coordinator once; later calls return the first status
    pub async fn initialize(&self) -> SyncStatus {
        self.initialized
            .get_or_init(|| self.coordinator.initialize())
            .await
            .clone()
    }

    /// Up to `count` questions in random order
    pub async fn get_random_questions(&self, count: usize) -> Vec<Question> {
        let (questions, _) = self.active_questions().await;
        shuffled(questions, count)
    }

    /// Every question of the active source in the given category
    pub async fn get_questions_by_category(&self, category: &str) -> Vec<Question> {
        let (questions, _) = self.active_questions().await;
        questions
            .into_iter()
            .filter(|q| q.category == category)
            .collect()
    }

    /// Every question of the active source, in source order
    pub async fn get_all_questions(&self) -> Vec<Question> {
        self.active_questions().await.0
    }

    pub async fn get_question_by_id(&self, id: &str) -> Option<Question> {
        let (questions, _) = self.active_questions().await;
        questions.into_iter().find(|q| q.id == id)
    }

    /// Category names for the category picker
    ///
    /// Cached categories win; otherwise the distinct categories of the cached
    /// quizzes, and finally those of the bundled set.
    pub async fn get_categories(&self) -> Vec<String> {
        self.initialize().await;
        let cache = self.coordinator.cache();

        if let Some(categories) = cache.get_categories().await.value() {
            if !categories.is_empty() {
                return categories.into_iter().map(|c| c.name).collect();
            }
        }

        if let Some(quizzes) = cache.get_quizzes().await.value() {
            if !quizzes.is_empty() {
                return distinct(quizzes.into_iter().map(|q| q.category));
            }
        }

        distinct(self.bundled.iter().map(|q| q.category.clone()))
    }

    /// Run a manual update; true when new content was applied
    pub async fn refresh_data(&self) -> bool {
        self.coordinator.manual_update().await
    }

    /// Which source the next read will serve from
    pub async fn source(&self) -> QuestionSource {
        self.active_questions().await.1
    }

    /// Last recorded sync status, for the status line
    pub async fn sync_status(&self) -> Option<SyncStatus> {
        self.coordinator.sync_status().await
    }

    pub fn coordinator(&self) -> &Arc<SyncCoordinator> {
        &self.coordinator
    }

    async fn active_questions(&self) -> (Vec<Question>, QuestionSource) {
        self.initialize().await;
        match self.coordinator.cache().get_quizzes().await.value() {
            Some(quizzes) if !quizzes.is_empty() => {
                (quizzes_to_questions(&quizzes), QuestionSource::Synced)
            }
            _ => (self.bundled.clone(), QuestionSource::Bundled),
        }
    }
}

fn shuffled(mut questions: Vec<Question>, count: usize) -> Vec<Question> {
    questions.shuffle(&mut rand::thread_rng());
    questions.truncate(count);
    questions
}

/// Distinct values in first-seen order
fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

/// Bundled questions - compiled into the binary
pub fn bundled_questions() -> Vec<Question> {
    serde_json::from_str(BUNDLED_QUESTIONS).unwrap_or_else(|e| {
        error!("Bundled question set is unreadable: {}", e);
        Vec::new()
    })
}
