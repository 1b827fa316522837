// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::judge::orchestrator::Verdict;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden (e.g., question still locked)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., a run is already in flight)
    Conflict(String),

    // 503 Service Unavailable, optionally carrying a payload the client can act on
    ServiceUnavailable {
        message: String,
        detail: Option<serde_json::Value>,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::ServiceUnavailable { message, detail } => {
                tracing::warn!("Service Unavailable: {}", message);
                let mut body = json!({ "error": message, "retryable": true });
                if let Some(detail) = detail {
                    body["detail"] = detail;
                }
                (StatusCode::SERVICE_UNAVAILABLE, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Errors raised by the judging pipeline and its collaborators.
///
/// Every boundary (execution, drafts, submission log, catalog) returns this type
/// so callers decide the policy instead of inheriting swallowed failures.
#[derive(Debug)]
pub enum JudgeError {
    /// Language id outside the supported set. Raised before any network call.
    UnsupportedLanguage(String),

    /// Submitted source is empty or whitespace only.
    EmptyCode,

    /// Question has no test cases to gate on.
    NoTestCases(String),

    NotFound(String),

    /// Question or topic is still locked for this learner.
    Locked(String),

    /// A Run or Submit for the same question is already in flight.
    Busy(String),

    /// The caller tripped the cancellation flag.
    Cancelled,

    /// Execution Service failure that escaped the adapter's own recovery.
    Execution(String),

    /// Backend API failure (transport or non-success status).
    Backend(String),

    /// Local storage failure.
    Storage(String),

    /// Judging finished but the verdict could not be persisted.
    SubmissionNotRecorded {
        verdict: Box<Verdict>,
        reason: String,
    },
}

impl fmt::Display for JudgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JudgeError::UnsupportedLanguage(lang) => write!(f, "Unsupported language '{}'", lang),
            JudgeError::EmptyCode => write!(f, "Code must not be empty"),
            JudgeError::NoTestCases(id) => write!(f, "Question '{}' has no test cases", id),
            JudgeError::NotFound(what) => write!(f, "{} not found", what),
            JudgeError::Locked(what) => write!(f, "{} is locked", what),
            JudgeError::Busy(id) => {
                write!(f, "An evaluation for question '{}' is already in progress", id)
            }
            JudgeError::Cancelled => write!(f, "Evaluation cancelled"),
            JudgeError::Execution(msg) => write!(f, "Execution service error: {}", msg),
            JudgeError::Backend(msg) => write!(f, "Backend error: {}", msg),
            JudgeError::Storage(msg) => write!(f, "Storage error: {}", msg),
            JudgeError::SubmissionNotRecorded { reason, .. } => {
                write!(f, "Submission could not be recorded: {}", reason)
            }
        }
    }
}

impl std::error::Error for JudgeError {}

impl From<sqlx::Error> for JudgeError {
    fn from(err: sqlx::Error) -> Self {
        JudgeError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        JudgeError::Backend(err.to_string())
    }
}

/// Maps pipeline errors onto HTTP semantics.
impl From<JudgeError> for AppError {
    fn from(err: JudgeError) -> Self {
        let message = err.to_string();
        match err {
            JudgeError::UnsupportedLanguage(_)
            | JudgeError::EmptyCode
            | JudgeError::NoTestCases(_) => AppError::BadRequest(message),
            JudgeError::NotFound(_) => AppError::NotFound(message),
            JudgeError::Locked(_) => AppError::Forbidden(message),
            JudgeError::Busy(_) | JudgeError::Cancelled => AppError::Conflict(message),
            JudgeError::Execution(_) | JudgeError::Backend(_) => AppError::ServiceUnavailable {
                message,
                detail: None,
            },
            JudgeError::Storage(_) => AppError::InternalServerError(message),
            JudgeError::SubmissionNotRecorded { verdict, .. } => AppError::ServiceUnavailable {
                message,
                detail: serde_json::to_value(*verdict).ok(),
            },
        }
    }
}
