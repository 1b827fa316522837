// src/models/draft.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on accepted source size, in characters.
pub const MAX_CODE_LENGTH: u64 = 65_536;

/// Editor contents for a (question, language) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub code: String,
}

/// DTO for saving a draft.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveDraftRequest {
    #[validate(length(max = MAX_CODE_LENGTH, message = "Code must be at most 65536 characters."))]
    pub code: String,
}

/// Body of `POST /user/save-code`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCodeBody<'a> {
    pub question_id: &'a str,
    pub code: &'a str,
    pub language: &'a str,
}

/// DTO for the Run and Submit actions.
#[derive(Debug, Deserialize, Validate)]
pub struct CodeRequest {
    #[validate(length(min = 1, max = 20))]
    pub language: String,
    #[validate(length(
        min = 1,
        max = MAX_CODE_LENGTH,
        message = "Code must be between 1 and 65536 characters."
    ))]
    pub code: String,
}
