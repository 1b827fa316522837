// src/models/submission.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Accepted,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Accepted => "accepted",
            SubmissionStatus::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(SubmissionStatus::Accepted),
            "failed" => Some(SubmissionStatus::Failed),
            _ => None,
        }
    }
}

/// An entry of the append-only submission log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(default)]
    pub user_id: String,

    pub question_id: String,

    pub language: String,

    /// Verbatim snapshot of the submitted source.
    #[serde(default)]
    pub code: String,

    pub status: SubmissionStatus,

    /// Wall-clock time of the whole Submit flow, not of a single run.
    #[serde(rename = "runtime", default)]
    pub runtime_ms: u64,

    /// Synthetic figure derived from `runtime_ms`. Not a measurement.
    #[serde(rename = "memory", default)]
    pub memory_estimate_mb: u64,

    #[serde(default)]
    pub test_cases_passed: u32,

    #[serde(default)]
    pub total_test_cases: u32,

    #[serde(default)]
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Body of `POST /user/submit`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub question_id: String,
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,
    #[serde(rename = "runtime")]
    pub runtime_ms: u64,
    #[serde(rename = "memory")]
    pub memory_estimate_mb: u64,
    pub test_cases_passed: u32,
    pub total_test_cases: u32,

    /// Reward of the question. The remote backend looks this up itself;
    /// the local store needs it to credit coins.
    #[serde(skip)]
    pub points: u32,
}
