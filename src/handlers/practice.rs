// src/handlers/practice.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::{AppError, JudgeError},
    judge::{
        language::Language,
        orchestrator::JudgeSession,
        progression::{compute_gate, find_question},
        sessions::SessionKind,
    },
    models::{draft::CodeRequest, question::Question, user::UserContext},
    state::AppState,
};

/// Resolves a question the caller may currently attempt.
///
/// Returns the question and whether the caller has already completed it.
/// Unknown questions yield 404, locked ones 403.
pub(crate) async fn accessible_question(
    state: &AppState,
    user: &UserContext,
    question_id: &str,
) -> Result<(Question, bool), JudgeError> {
    let outline = state.catalog.outline(user).await?;
    let progress = state.progress.progress(user).await?;
    let gates = compute_gate(&outline, &progress.completed_set());

    let gate = find_question(&gates, question_id)
        .ok_or_else(|| JudgeError::NotFound(format!("Question '{}'", question_id)))?;
    if !gate.accessible {
        return Err(JudgeError::Locked(question_id.to_string()));
    }

    let question = outline
        .into_iter()
        .flat_map(|o| o.questions)
        .find(|q| q.id == question_id)
        .ok_or_else(|| JudgeError::NotFound(format!("Question '{}'", question_id)))?;

    Ok((question, gate.completed))
}

/// Cheap checks that must fail before any network call.
fn precheck(payload: &CodeRequest) -> Result<Language, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let language = payload.language.parse::<Language>()?;
    if payload.code.trim().is_empty() {
        return Err(JudgeError::EmptyCode.into());
    }
    Ok(language)
}

/// Run: executes the public cases and reports every result.
pub async fn run_code(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(question_id): Path<String>,
    Json(payload): Json<CodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    precheck(&payload)?;

    let (question, completed) = accessible_question(&state, &user, &question_id).await?;
    let guard = state
        .sessions
        .begin(&user.user_id, &question_id, SessionKind::Run)?;

    let mut session = JudgeSession::new(user, question, &payload.language, completed)?;
    let report = state
        .judge
        .run(&mut session, &payload.code, guard.cancel_flag())
        .await?;

    Ok(Json(report))
}

/// Submit: judges public and private cases and records the attempt.
pub async fn submit_code(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(question_id): Path<String>,
    Json(payload): Json<CodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    precheck(&payload)?;

    let (question, completed) = accessible_question(&state, &user, &question_id).await?;
    let guard = state
        .sessions
        .begin(&user.user_id, &question_id, SessionKind::Submit)?;

    let mut session = JudgeSession::new(user, question, &payload.language, completed)?;
    let outcome = state
        .judge
        .submit(&mut session, &payload.code, guard.cancel_flag())
        .await?;

    Ok(Json(outcome))
}

/// Trips the cancellation flag of the caller's in-flight Run/Submit.
pub async fn cancel(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = state
        .sessions
        .cancel(&user.user_id, &question_id)
        .ok_or_else(|| AppError::NotFound("Nothing in flight for this question".to_string()))?;

    tracing::info!(user = %user.user_id, question = %question_id, ?kind, "Cancellation requested");

    Ok(Json(json!({ "cancelled": true, "kind": kind })))
}
