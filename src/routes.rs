// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{drafts, languages, practice, progress, submissions},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * `/api/languages` is public.
/// * Everything under `/api/practice` requires a bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let question_routes = Router::new()
        .route(
            "/{question_id}/draft/{language}",
            get(drafts::get_draft).put(drafts::save_draft),
        )
        .route("/{question_id}/run", post(practice::run_code))
        .route("/{question_id}/submit", post(practice::submit_code))
        .route("/{question_id}/cancel", post(practice::cancel))
        .route(
            "/{question_id}/submissions",
            get(submissions::list_submissions),
        );

    let practice_routes = Router::new()
        .route("/gate", get(progress::get_gate))
        .route("/progress", get(progress::get_progress))
        .nest("/questions", question_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/languages", get(languages::list_languages))
        .nest("/api/practice", practice_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
