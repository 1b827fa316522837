// src/judge/drafts.rs

use std::sync::Arc;

use crate::{
    error::JudgeError,
    judge::{language::Language, ports::DraftStore},
    models::user::UserContext,
};

/// Draft Store Client.
///
/// Loading never yields an empty editor: a missing, blank or unreadable draft
/// resolves to the language's starter template.
#[derive(Clone)]
pub struct DraftService {
    store: Arc<dyn DraftStore>,
}

impl DraftService {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, user: &UserContext, question_id: &str, language: Language) -> String {
        match self.store.load(user, question_id, language).await {
            Ok(Some(code)) if !code.trim().is_empty() => code,
            Ok(_) => language.starter_template().to_string(),
            Err(e) => {
                tracing::warn!(
                    user = %user.user_id,
                    question = %question_id,
                    %language,
                    "Failed to load draft, falling back to template: {}",
                    e
                );
                language.starter_template().to_string()
            }
        }
    }

    pub async fn save(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
        code: &str,
    ) -> Result<(), JudgeError> {
        self.store.save(user, question_id, language, code).await
    }
}
