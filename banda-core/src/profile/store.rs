// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote profile store interface

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A player profile as stored remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "provincia")]
    pub province: String,
    #[serde(rename = "foto_url", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "pontuacao_total", default)]
    pub total_score: u64,
    #[serde(rename = "acertos", default)]
    pub correct_answers: u32,
    #[serde(rename = "erros", default)]
    pub wrong_answers: u32,
    /// Average answer time in seconds
    #[serde(rename = "tempo_medio", default)]
    pub average_time_secs: u64,
    #[serde(rename = "sequencia_maxima", default)]
    pub max_streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh profile with zeroed statistics
    pub fn new(id: impl Into<String>, name: impl Into<String>, province: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            province: province.into(),
            photo_url: None,
            total_score: 0,
            correct_answers: 0,
            wrong_answers: 0,
            average_time_secs: 0,
            max_streak: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "provincia", skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(rename = "foto_url", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "pontuacao_total", skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u64>,
    #[serde(rename = "acertos", skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<u32>,
    #[serde(rename = "erros", skip_serializing_if = "Option::is_none")]
    pub wrong_answers: Option<u32>,
    #[serde(rename = "tempo_medio", skip_serializing_if = "Option::is_none")]
    pub average_time_secs: Option<u64>,
    #[serde(rename = "sequencia_maxima", skip_serializing_if = "Option::is_none")]
    pub max_streak: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileUpdate {
    /// Apply the set fields to `profile`
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(province) = &self.province {
            profile.province = province.clone();
        }
        if let Some(photo_url) = &self.photo_url {
            profile.photo_url = Some(photo_url.clone());
        }
        if let Some(score) = self.total_score {
            profile.total_score = score;
        }
        if let Some(correct) = self.correct_answers {
            profile.correct_answers = correct;
        }
        if let Some(wrong) = self.wrong_answers {
            profile.wrong_answers = wrong;
        }
        if let Some(avg) = self.average_time_secs {
            profile.average_time_secs = avg;
        }
        if let Some(streak) = self.max_streak {
            profile.max_streak = streak;
        }
        if let Some(updated_at) = self.updated_at {
            profile.updated_at = updated_at;
        }
    }
}

/// CRUD interface of the remote profile/ranking service
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create a profile and return it with its assigned id
    async fn create(&self, name: &str, province: &str) -> Result<UserProfile, ProfileError>;

    async fn fetch(&self, id: &str) -> Result<Option<UserProfile>, ProfileError>;

    async fn update(&self, id: &str, changes: &ProfileUpdate) -> Result<(), ProfileError>;

    /// Top profiles by total score, optionally within one province
    async fn ranking(
        &self,
        limit: usize,
        province: Option<&str>,
    ) -> Result<Vec<UserProfile>, ProfileError>;

    /// Number of profiles with a strictly higher total score
    async fn count_above(&self, score: u64) -> Result<usize, ProfileError>;
}

/// In-process profile store
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile as-is
    pub fn insert(&self, profile: UserProfile) {
        if let Ok(mut profiles) = self.profiles.lock() {
            profiles.insert(profile.id.clone(), profile);
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create(&self, name: &str, province: &str) -> Result<UserProfile, ProfileError> {
        let profile = UserProfile::new(uuid::Uuid::new_v4().to_string(), name, province);
        let mut profiles = self.profiles.lock().map_err(|_| ProfileError::Poisoned)?;
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn fetch(&self, id: &str) -> Result<Option<UserProfile>, ProfileError> {
        let profiles = self.profiles.lock().map_err(|_| ProfileError::Poisoned)?;
        Ok(profiles.get(id).cloned())
    }

    async fn update(&self, id: &str, changes: &ProfileUpdate) -> Result<(), ProfileError> {
        let mut profiles = self.profiles.lock().map_err(|_| ProfileError::Poisoned)?;
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| ProfileError::NotFound(id.to_string()))?;
        changes.apply_to(profile);
        Ok(())
    }

    async fn ranking(
        &self,
        limit: usize,
        province: Option<&str>,
    ) -> Result<Vec<UserProfile>, ProfileError> {
        let profiles = self.profiles.lock().map_err(|_| ProfileError::Poisoned)?;
        let mut ranked: Vec<UserProfile> = profiles
            .values()
            .filter(|p| province.map_or(true, |prov| p.province == prov))
            .cloned()
            .collect();
        ranked.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn count_above(&self, score: u64) -> Result<usize, ProfileError> {
        let profiles = self.profiles.lock().map_err(|_| ProfileError::Poisoned)?;
        Ok(profiles.values().filter(|p| p.total_score > score).count())
    }
}

/// Errors returned by profile stores
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Remote profile service error: {0}")]
    Remote(String),

    #[error("Profile store lock poisoned")]
    Poisoned,
}
