// src/services/local_store.rs

//! SQLite-backed store for running the gateway without the remote backend.
//!
//! Implements drafts, the submission log and progress. Coins are derived from
//! `completed_questions`, whose primary key guarantees that a question pays
//! out once per user no matter how often it is accepted.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use uuid::Uuid;

use crate::{
    error::JudgeError,
    judge::{
        language::Language,
        ports::{DraftStore, ProgressSource, SubmissionLog},
    },
    models::{
        progress::UserProgress,
        submission::{NewSubmission, Submission, SubmissionStatus},
        user::UserContext,
    },
};

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: String,
    user_id: String,
    question_id: String,
    language: String,
    code: String,
    status: String,
    runtime_ms: i64,
    memory_estimate_mb: i64,
    test_cases_passed: i64,
    total_test_cases: i64,
    submitted_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = JudgeError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let status = SubmissionStatus::parse(&row.status).ok_or_else(|| {
            JudgeError::Storage(format!("unknown submission status '{}'", row.status))
        })?;
        Ok(Submission {
            id: row.id,
            user_id: row.user_id,
            question_id: row.question_id,
            language: row.language,
            code: row.code,
            status,
            runtime_ms: row.runtime_ms.max(0) as u64,
            memory_estimate_mb: row.memory_estimate_mb.max(0) as u64,
            test_cases_passed: row.test_cases_passed.max(0) as u32,
            total_test_cases: row.total_test_cases.max(0) as u32,
            submitted_at: Some(row.submitted_at),
        })
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, JudgeError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, JudgeError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| JudgeError::Storage(format!("migration failed: {}", e)))?;
        tracing::info!("Local judge store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DraftStore for SqliteStore {
    async fn load(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
    ) -> Result<Option<String>, JudgeError> {
        let code: Option<String> = sqlx::query_scalar(
            "SELECT code FROM drafts WHERE user_id = ? AND question_id = ? AND language = ?",
        )
        .bind(&user.user_id)
        .bind(question_id)
        .bind(language.id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(code.filter(|c| !c.is_empty()))
    }

    async fn save(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
        code: &str,
    ) -> Result<(), JudgeError> {
        sqlx::query(
            r#"
            INSERT INTO drafts (user_id, question_id, language, code, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, question_id, language) DO UPDATE SET
                code = excluded.code,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&user.user_id)
        .bind(question_id)
        .bind(language.id())
        .bind(code)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionLog for SqliteStore {
    async fn record(
        &self,
        user: &UserContext,
        submission: &NewSubmission,
    ) -> Result<(), JudgeError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, user_id, question_id, language, code, status,
                runtime_ms, memory_estimate_mb, test_cases_passed, total_test_cases,
                submitted_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.user_id)
        .bind(&submission.question_id)
        .bind(&submission.language)
        .bind(&submission.code)
        .bind(submission.status.as_str())
        .bind(submission.runtime_ms as i64)
        .bind(submission.memory_estimate_mb as i64)
        .bind(submission.test_cases_passed as i64)
        .bind(submission.total_test_cases as i64)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if submission.status == SubmissionStatus::Accepted {
            let inserted = sqlx::query(
                r#"
                INSERT OR IGNORE INTO completed_questions (user_id, question_id, points, completed_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&user.user_id)
            .bind(&submission.question_id)
            .bind(submission.points as i64)
            .bind(now)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted == 1 {
                tracing::info!(
                    user_id = %user.user_id,
                    question_id = %submission.question_id,
                    points = submission.points,
                    "First acceptance, coins awarded"
                );
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn history(
        &self,
        user: &UserContext,
        question_id: &str,
    ) -> Result<Vec<Submission>, JudgeError> {
        let rows: Vec<SubmissionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, question_id, language, code, status,
                   runtime_ms, memory_estimate_mb, test_cases_passed, total_test_cases,
                   submitted_at
            FROM submissions
            WHERE user_id = ? AND question_id = ?
            ORDER BY rowid DESC
            "#,
        )
        .bind(&user.user_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Submission::try_from).collect()
    }
}

#[async_trait]
impl ProgressSource for SqliteStore {
    async fn progress(&self, user: &UserContext) -> Result<UserProgress, JudgeError> {
        let (total_coins, total_submissions, successful_submissions): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COALESCE(SUM(points), 0) FROM completed_questions WHERE user_id = ?),
                    (SELECT COUNT(*) FROM submissions WHERE user_id = ?),
                    (SELECT COUNT(*) FROM submissions WHERE user_id = ? AND status = 'accepted')
                "#,
            )
            .bind(&user.user_id)
            .bind(&user.user_id)
            .bind(&user.user_id)
            .fetch_one(&self.pool)
            .await?;

        let completed_question_ids: Vec<String> = sqlx::query_scalar(
            "SELECT question_id FROM completed_questions WHERE user_id = ? ORDER BY rowid",
        )
        .bind(&user.user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserProgress {
            user_id: user.user_id.clone(),
            total_coins,
            completed_question_ids,
            total_submissions,
            successful_submissions,
        })
    }
}
