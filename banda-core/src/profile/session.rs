// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Device-local profile session
//!
//! Remembers which remote profile belongs to this device and applies game
//! results to it. Like the question service, nothing here surfaces an
//! error to the screens: failures are logged and become `None`, an empty
//! list or `false`.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{error, warn};

use super::store::{ProfileStore, ProfileUpdate, UserProfile};
use crate::content::KeyValueStore;

/// Storage keys used by the session
pub mod keys {
    pub const PROFILE_ID: &str = "@quiz_sou_da_banda/user_profile_id";
    pub const ONBOARDING_COMPLETE: &str = "@quiz_sou_da_banda/onboarding_complete";
}

/// Points awarded for a correct answer given the current streak
pub fn points_for_answer(streak: u32) -> u64 {
    10 + 2 * u64::from(streak)
}

/// Local handle on the current player's remote profile
pub struct ProfileSession {
    store: Arc<dyn KeyValueStore>,
    profiles: Arc<dyn ProfileStore>,
    current_id: Mutex<Option<String>>,
}

impl ProfileSession {
    pub fn new(store: Arc<dyn KeyValueStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            profiles,
            current_id: Mutex::new(None),
        }
    }

    pub async fn is_onboarding_complete(&self) -> bool {
        match self.store.get(keys::ONBOARDING_COMPLETE).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Error checking onboarding status: {}", e);
                false
            }
        }
    }

    /// Create the remote profile and bind it to this device
    pub async fn complete_onboarding(&self, name: &str, province: &str) -> Option<UserProfile> {
        let profile = match self.profiles.create(name, province).await {
            Ok(profile) => profile,
            Err(e) => {
                error!("Error creating profile: {}", e);
                return None;
            }
        };

        let entries = [
            (keys::PROFILE_ID, profile.id.clone()),
            (keys::ONBOARDING_COMPLETE, "true".to_string()),
        ];
        if let Err(e) = self.store.set_many(&entries).await {
            error!("Error saving profile id: {}", e);
            return None;
        }

        self.remember(Some(profile.id.clone()));
        Some(profile)
    }

    /// Id of this device's profile, read from storage once
    pub async fn current_profile_id(&self) -> Option<String> {
        if let Some(id) = self.remembered() {
            return Some(id);
        }

        match self.store.get(keys::PROFILE_ID).await {
            Ok(id) => {
                self.remember(id.clone());
                id
            }
            Err(e) => {
                warn!("Error getting current profile id: {}", e);
                None
            }
        }
    }

    pub async fn current_profile(&self) -> Option<UserProfile> {
        let id = self.current_profile_id().await?;
        match self.profiles.fetch(&id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Error fetching profile {}: {}", id, e);
                None
            }
        }
    }

    /// Apply a partial update, stamping `updated_at`
    pub async fn update_profile(&self, mut changes: ProfileUpdate) -> bool {
        let Some(id) = self.current_profile_id().await else {
            return false;
        };
        changes.updated_at = Some(Utc::now());
        match self.profiles.update(&id, &changes).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error updating profile: {}", e);
                false
            }
        }
    }

    /// Add one answered question to the player's statistics
    ///
    /// The average answer time is a running mean over all answers, rounded
    /// to whole seconds.
    pub async fn record_answer(&self, points: u64, correct: bool, time_secs: u64) -> bool {
        let Some(profile) = self.current_profile().await else {
            return false;
        };

        // Remote counters may already sit at their limits
        let correct_answers = profile.correct_answers.saturating_add(u32::from(correct));
        let wrong_answers = profile.wrong_answers.saturating_add(u32::from(!correct));
        let answers = u64::from(correct_answers) + u64::from(wrong_answers);
        let total_time = profile
            .average_time_secs
            .saturating_mul(answers.saturating_sub(1))
            .saturating_add(time_secs);
        let average = (total_time as f64 / answers as f64).round() as u64;

        self.update_profile(ProfileUpdate {
            total_score: Some(profile.total_score.saturating_add(points)),
            correct_answers: Some(correct_answers),
            wrong_answers: Some(wrong_answers),
            average_time_secs: Some(average),
            ..Default::default()
        })
        .await
    }

    /// Store `streak` if it beats the player's record; true when it did
    pub async fn update_max_streak(&self, streak: u32) -> bool {
        let Some(profile) = self.current_profile().await else {
            return false;
        };
        if streak <= profile.max_streak {
            return false;
        }
        self.update_profile(ProfileUpdate {
            max_streak: Some(streak),
            ..Default::default()
        })
        .await
    }

    pub async fn ranking(&self, limit: usize) -> Vec<UserProfile> {
        self.profiles.ranking(limit, None).await.unwrap_or_else(|e| {
            warn!("Error fetching ranking: {}", e);
            Vec::new()
        })
    }

    pub async fn ranking_by_province(&self, province: &str, limit: usize) -> Vec<UserProfile> {
        self.profiles
            .ranking(limit, Some(province))
            .await
            .unwrap_or_else(|e| {
                warn!("Error fetching ranking for {}: {}", province, e);
                Vec::new()
            })
    }

    /// 1-based position of the player in the global ranking
    pub async fn user_position(&self) -> Option<usize> {
        let profile = self.current_profile().await?;
        match self.profiles.count_above(profile.total_score).await {
            Ok(above) => Some(above + 1),
            Err(e) => {
                warn!("Error getting user position: {}", e);
                None
            }
        }
    }

    /// Forget this device's profile (the remote record is kept)
    pub async fn clear_profile(&self) -> bool {
        let result = self
            .store
            .remove_many(&[keys::PROFILE_ID, keys::ONBOARDING_COMPLETE])
            .await;
        self.remember(None);
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("Error clearing profile: {}", e);
                false
            }
        }
    }

    fn remembered(&self) -> Option<String> {
        self.current_id.lock().ok().and_then(|id| id.clone())
    }

    fn remember(&self, id: Option<String>) {
        if let Ok(mut current) = self.current_id.lock() {
            *current = id;
        }
    }
}
