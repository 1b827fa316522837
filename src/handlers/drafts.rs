// src/handlers/drafts.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::{AppError, JudgeError},
    judge::language::Language,
    models::{
        draft::{Draft, SaveDraftRequest},
        user::UserContext,
    },
    state::AppState,
};

/// Editor contents for a question; the starter template when nothing is saved.
pub async fn get_draft(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path((question_id, language)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let language = language.parse::<Language>()?;
    let code = state.judge.drafts().load(&user, &question_id, language).await;
    Ok(Json(Draft { code }))
}

/// Upserts a draft. Refused with 409 while a Run or Submit for the same
/// question is in flight.
pub async fn save_draft(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path((question_id, language)): Path<(String, String)>,
    Json(payload): Json<SaveDraftRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let language = language.parse::<Language>()?;

    // Drafts belong to the in-flight Run/Submit until it finishes.
    if state.sessions.is_active(&user.user_id, &question_id) {
        return Err(JudgeError::Busy(question_id).into());
    }

    state
        .judge
        .drafts()
        .save(&user, &question_id, language, &payload.code)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
