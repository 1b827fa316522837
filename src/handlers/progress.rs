// src/handlers/progress.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError, judge::progression::compute_gate, models::user::UserContext,
    state::AppState,
};

/// Unlock state of every topic and question for the caller.
/// Recomputed from the catalog and current progress on each call.
pub async fn get_gate(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<impl IntoResponse, AppError> {
    let outline = state.catalog.outline(&user).await?;
    let progress = state.progress.progress(&user).await?;
    Ok(Json(compute_gate(&outline, &progress.completed_set())))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<impl IntoResponse, AppError> {
    let progress = state.progress.progress(&user).await?;
    Ok(Json(progress))
}
