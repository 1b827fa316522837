// src/judge/ports.rs

//! Seams to the collaborators the judge depends on but does not own.

use async_trait::async_trait;

use crate::{
    error::JudgeError,
    judge::{language::Language, progression::TopicOutline},
    models::{
        progress::UserProgress,
        question::Question,
        submission::{NewSubmission, Submission},
        topic::Topic,
        user::UserContext,
    },
};

/// Read access to topics and their questions.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Topics in backend order.
    async fn list_topics(&self, user: &UserContext) -> Result<Vec<Topic>, JudgeError>;

    /// Questions of one topic, with full test case payloads.
    async fn list_questions(
        &self,
        user: &UserContext,
        topic_id: &str,
    ) -> Result<Vec<Question>, JudgeError>;

    /// Every topic together with its questions.
    async fn outline(&self, user: &UserContext) -> Result<Vec<TopicOutline>, JudgeError> {
        let topics = self.list_topics(user).await?;
        let mut outline = Vec::with_capacity(topics.len());
        for topic in topics {
            let questions = self.list_questions(user, &topic.id).await?;
            outline.push(TopicOutline { topic, questions });
        }
        Ok(outline)
    }
}

/// Per-user editor drafts keyed by (question, language).
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// `Ok(None)` when nothing was saved yet.
    async fn load(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
    ) -> Result<Option<String>, JudgeError>;

    /// Upserts the draft.
    async fn save(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
        code: &str,
    ) -> Result<(), JudgeError>;
}

/// Append-only submission log. Recording a submission also updates the
/// learner's progress on the owning side.
#[async_trait]
pub trait SubmissionLog: Send + Sync {
    async fn record(&self, user: &UserContext, submission: &NewSubmission)
    -> Result<(), JudgeError>;

    /// History for one question, newest first.
    async fn history(
        &self,
        user: &UserContext,
        question_id: &str,
    ) -> Result<Vec<Submission>, JudgeError>;
}

/// Read access to the derived progress of a learner.
#[async_trait]
pub trait ProgressSource: Send + Sync {
    async fn progress(&self, user: &UserContext) -> Result<UserProgress, JudgeError>;
}
