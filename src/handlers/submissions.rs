// src/handlers/submissions.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, models::user::UserContext, state::AppState};

/// The caller's submissions for a question, newest first.
pub async fn list_submissions(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = state.submissions.history(&user, &question_id).await?;
    Ok(Json(submissions))
}
