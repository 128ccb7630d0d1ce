// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Content type definitions for remote quiz content
//!
//! Two schemas live here:
//! - the remote schema (`AppConfig`, `Category`, `Quiz`), which keeps the
//!   upstream Portuguese field names on the wire
//! - the display schema (`Question`), the fixed option-list shape the game
//!   screens render and the bundled dataset is written in

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Update interval used when the config does not provide a usable one
pub const DEFAULT_UPDATE_INTERVAL_HOURS: f64 = 24.0;

/// Version reported when no content version can be determined
pub const UNKNOWN_VERSION: &str = "unknown";

/// Remote application config
///
/// Remote-authoritative; replaced only by a successful full download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content version string, compared for inequality only
    #[serde(rename = "versao")]
    pub version: String,
    /// When the remote content was last edited
    #[serde(rename = "ultima_atualizacao", with = "timestamp")]
    pub last_updated_at: DateTime<Utc>,
    /// Hours between scheduled update checks
    #[serde(
        rename = "intervalo_atualizacao_horas",
        default = "default_interval_hours"
    )]
    pub update_interval_hours: f64,
    /// Theme shipped with the content
    #[serde(rename = "tema", default)]
    pub theme: Theme,
}

impl AppConfig {
    /// Interval between scheduled checks, falling back to 24 hours
    pub fn update_interval(&self) -> Duration {
        interval_from_hours(self.update_interval_hours)
    }
}

fn default_interval_hours() -> f64 {
    DEFAULT_UPDATE_INTERVAL_HOURS
}

/// Converts an hour count into a timer period.
///
/// Zero, negative, non-finite or out-of-range values mean "use the default".
pub fn interval_from_hours(hours: f64) -> Duration {
    let default = Duration::from_secs((DEFAULT_UPDATE_INTERVAL_HOURS * 3600.0) as u64);
    if !hours.is_finite() || hours <= 0.0 {
        return default;
    }
    Duration::try_from_secs_f64(hours * 3600.0).unwrap_or(default)
}

/// Theme definition carried by the remote config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    #[serde(rename = "cor_primaria")]
    pub primary_color: String,
    #[serde(rename = "cor_secundaria")]
    pub secondary_color: String,
    #[serde(rename = "modo")]
    pub mode: ThemeMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#D62828".to_string(),
            secondary_color: "#FDC500".to_string(),
            mode: ThemeMode::Dark,
        }
    }
}

/// Light or dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[serde(rename = "claro")]
    Light,
    #[default]
    #[serde(rename = "escuro")]
    Dark,
}

/// Quiz category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "icone", default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Quiz identifier, numeric or textual on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizId::Number(n) => write!(f, "{}", n),
            QuizId::Text(s) => f.write_str(s),
        }
    }
}

/// Remote quiz kind tag
///
/// Unknown tags are kept verbatim instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuizKind {
    /// `multipla_escolha`
    MultipleChoice,
    /// `verdadeiro_falso`
    TrueFalse,
    /// `imagem_para_texto`
    ImageToText,
    /// `completar_frase`
    CompleteSentence,
    /// `quiz_relacionar`, reserved and not rendered yet
    Match,
    /// Any tag this build does not know about
    Other(String),
}

impl QuizKind {
    /// Wire tag for this kind
    pub fn as_str(&self) -> &str {
        match self {
            QuizKind::MultipleChoice => "multipla_escolha",
            QuizKind::TrueFalse => "verdadeiro_falso",
            QuizKind::ImageToText => "imagem_para_texto",
            QuizKind::CompleteSentence => "completar_frase",
            QuizKind::Match => "quiz_relacionar",
            QuizKind::Other(tag) => tag,
        }
    }
}

impl From<String> for QuizKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "multipla_escolha" => QuizKind::MultipleChoice,
            "verdadeiro_falso" => QuizKind::TrueFalse,
            "imagem_para_texto" => QuizKind::ImageToText,
            "completar_frase" => QuizKind::CompleteSentence,
            "quiz_relacionar" => QuizKind::Match,
            _ => QuizKind::Other(tag),
        }
    }
}

impl From<QuizKind> for String {
    fn from(kind: QuizKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correct answer of a remote quiz
///
/// Its expected shape depends on the quiz kind; anything else still
/// deserializes (as `Other`) so one malformed quiz never rejects the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Flag(bool),
    Index(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for CorrectAnswer {
    fn default() -> Self {
        CorrectAnswer::Other(serde_json::Value::Null)
    }
}

impl fmt::Display for CorrectAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectAnswer::Flag(b) => write!(f, "{}", b),
            CorrectAnswer::Index(i) => write!(f, "{}", i),
            CorrectAnswer::Text(s) => f.write_str(s),
            CorrectAnswer::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Remote quiz record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "tipo")]
    pub kind: QuizKind,
    #[serde(rename = "pergunta")]
    pub prompt: String,
    /// Options for multiple-choice quizzes
    #[serde(rename = "opcoes", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(rename = "resposta_correta", default)]
    pub correct_answer: CorrectAnswer,
    /// Image for image-to-text quizzes
    #[serde(rename = "imagem", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "explicacao", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Display kind of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    Text,
    Image,
    Audio,
    Mixed,
}

/// A single answer option of a display question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "imagem", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl QuestionOption {
    /// Text-only option
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
            audio: None,
        }
    }
}

/// Display question (fixed option list + index of the right one)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "tipo")]
    pub kind: DisplayKind,
    #[serde(rename = "pergunta")]
    pub prompt: String,
    #[serde(rename = "opcoes")]
    pub options: Vec<QuestionOption>,
    #[serde(rename = "resposta_correta")]
    pub correct_answer_index: usize,
    #[serde(rename = "explicacao", default)]
    pub explanation: String,
}

impl Question {
    /// The option marked as correct, if the index is in range
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.get(self.correct_answer_index)
    }
}

/// Summary of the last sync attempt and the next scheduled one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub last_sync: DateTime<Utc>,
    pub version: String,
    pub next_sync: DateTime<Utc>,
    pub is_offline: bool,
}

impl SyncStatus {
    /// Status after content was confirmed or downloaded
    pub fn online(version: impl Into<String>, last_sync: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            last_sync,
            version: version.into(),
            next_sync: next_sync_after(Utc::now(), interval),
            is_offline: false,
        }
    }

    /// Status after the remote could not be reached
    pub fn offline(version: impl Into<String>, last_sync: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            is_offline: true,
            ..Self::online(version, last_sync, interval)
        }
    }

    /// Short line for the status bar
    pub fn summary(&self) -> String {
        if self.is_offline {
            format!("offline (content v{})", self.version)
        } else {
            format!(
                "v{} synced {}",
                self.version,
                self.last_sync.format("%Y-%m-%d %H:%M")
            )
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// `from + interval`, saturating at the maximum representable time
pub fn next_sync_after(from: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let delta = TimeDelta::from_std(interval).unwrap_or_else(|_| TimeDelta::hours(24));
    from.checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Parses a content timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) or a
/// bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
