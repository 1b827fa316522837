// src/handlers/languages.rs

use axum::{Json, response::IntoResponse};
use serde::Serialize;

use crate::judge::language::Language;

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub id: &'static str,
    pub runtime: &'static str,
    pub template: &'static str,
}

/// Supported languages with their starter templates.
pub async fn list_languages() -> impl IntoResponse {
    let languages: Vec<LanguageInfo> = Language::ALL
        .iter()
        .map(|l| LanguageInfo {
            id: l.id(),
            runtime: l.runtime(),
            template: l.starter_template(),
        })
        .collect();
    Json(languages)
}
