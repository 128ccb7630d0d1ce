// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for content wire types

use std::time::Duration;

use banda_core::content::{
    next_sync_after, AppConfig, Category, CorrectAnswer, Quiz, QuizId, QuizKind, SyncStatus,
    ThemeMode,
};
use chrono::{TimeZone, Utc};

#[test]
fn test_app_config_from_wire() {
    let json = r##"{
        "versao": "1.2",
        "ultima_atualizacao": "2026-03-01T12:00:00Z",
        "intervalo_atualizacao_horas": 6,
        "tema": {"cor_primaria": "#000000", "cor_secundaria": "#FFFFFF", "modo": "claro"}
    }"##;

    let config: AppConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.version, "1.2");
    assert_eq!(
        config.last_updated_at,
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(config.update_interval(), Duration::from_secs(6 * 3600));
    assert_eq!(config.theme.mode, ThemeMode::Light);
    assert_eq!(config.theme.primary_color, "#000000");
}

#[test]
fn test_app_config_defaults_interval_and_theme() {
    let json = r#"{"versao": "1.0", "ultima_atualizacao": "2026-03-01"}"#;

    let config: AppConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.update_interval(), Duration::from_secs(24 * 3600));
    assert_eq!(config.theme.mode, ThemeMode::Dark);
    assert_eq!(config.theme.primary_color, "#D62828");
}

#[test]
fn test_app_config_zero_interval_falls_back() {
    let json = r#"{"versao": "1.0", "ultima_atualizacao": "2026-03-01T00:00:00Z",
                   "intervalo_atualizacao_horas": 0}"#;
    let config: AppConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.update_interval(), Duration::from_secs(24 * 3600));
}

#[test]
fn test_app_config_rejects_bad_timestamp() {
    let json = r#"{"versao": "1.0", "ultima_atualizacao": "ontem"}"#;
    assert!(serde_json::from_str::<AppConfig>(json).is_err());
}

#[test]
fn test_category_from_wire() {
    let json = r#"{"id": 3, "nome": "Música", "descricao": "Ritmos angolanos", "icone": "🎵"}"#;
    let category: Category = serde_json::from_str(json).unwrap();

    assert_eq!(category.id, 3);
    assert_eq!(category.name, "Música");
    assert_eq!(category.icon.as_deref(), Some("🎵"));
}

#[test]
fn test_quiz_accepts_numeric_and_text_ids() {
    let json = r#"[
        {"id": 1, "categoria": "C", "tipo": "completar_frase", "pergunta": "P", "resposta_correta": "x"},
        {"id": "a1", "categoria": "C", "tipo": "completar_frase", "pergunta": "P", "resposta_correta": "x"}
    ]"#;
    let quizzes: Vec<Quiz> = serde_json::from_str(json).unwrap();

    assert_eq!(quizzes[0].id, QuizId::Number(1));
    assert_eq!(quizzes[1].id, QuizId::Text("a1".to_string()));
}

#[test]
fn test_quiz_with_unknown_kind_and_answer_still_parses() {
    let json = r#"{"id": 9, "categoria": "C", "tipo": "quiz_ordenar", "pergunta": "P",
                   "resposta_correta": [1, 2, 3]}"#;
    let quiz: Quiz = serde_json::from_str(json).unwrap();

    assert_eq!(quiz.kind, QuizKind::Other("quiz_ordenar".to_string()));
    assert!(matches!(quiz.correct_answer, CorrectAnswer::Other(_)));
}

#[test]
fn test_quiz_kind_serializes_to_wire_tag() {
    let json = serde_json::to_string(&QuizKind::TrueFalse).unwrap();
    assert_eq!(json, "\"verdadeiro_falso\"");
}

#[test]
fn test_sync_status_uses_camel_case() {
    let last = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    let status = SyncStatus::offline("1.0", last, Duration::from_secs(3600));

    let value = serde_json::to_value(&status).unwrap();

    assert_eq!(value["version"], "1.0");
    assert_eq!(value["isOffline"], true);
    assert!(value.get("lastSync").is_some());
    assert!(value.get("nextSync").is_some());
}

#[test]
fn test_sync_status_next_sync_is_one_interval_ahead() {
    let before = Utc::now();
    let status = SyncStatus::online("1.0", before, Duration::from_secs(3600));

    let delta = status.next_sync - before;
    assert!(delta >= chrono::TimeDelta::seconds(3600));
    assert!(delta < chrono::TimeDelta::seconds(3660));
}

#[test]
fn test_sync_status_summary() {
    let last = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    let online = SyncStatus::online("1.0", last, Duration::from_secs(60));
    let offline = SyncStatus::offline("1.0", last, Duration::from_secs(60));

    assert_eq!(online.summary(), "v1.0 synced 2026-01-01 08:00");
    assert_eq!(offline.to_string(), "offline (content v1.0)");
}

#[test]
fn test_next_sync_saturates() {
    let far = chrono::DateTime::<Utc>::MAX_UTC;
    assert_eq!(next_sync_after(far, Duration::from_secs(60)), far);
}
