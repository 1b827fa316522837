// src/judge/orchestrator.rs

//! Judge Orchestrator.
//!
//! Drives the two user actions against an explicitly owned [`JudgeSession`]:
//!
//! * Run: `Idle -> Running -> Idle`. Public cases only, diagnostic mode, never
//!   writes a submission.
//! * Submit: `Idle -> Submitting -> Accepted | Rejected`. Public then private
//!   cases, fail-fast, always ends with a submission record. Any error before
//!   the verdict is known returns the session to `Idle` without a record.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::{
    config::MEMORY_ESTIMATE_DIVISOR_MS,
    error::JudgeError,
    judge::{
        cancel::CancelFlag,
        drafts::DraftService,
        evaluator::{CaseReport, EvaluationMode, TestEvaluator},
        language::Language,
        ports::{ProgressSource, SubmissionLog},
    },
    models::{
        execution::OutputKind,
        progress::UserProgress,
        question::Question,
        submission::{NewSubmission, SubmissionStatus},
        user::UserContext,
    },
};

/// Pause between submission write attempts.
const SUBMISSION_RETRY_BACKOFF: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeState {
    Idle,
    Running,
    Submitting,
    Accepted,
    Rejected,
}

/// Final decision of a Submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Accepted {
        total_tests: usize,
        runtime_ms: u64,
        memory_estimate_mb: u64,
    },
    Rejected {
        input: String,
        expected_output: String,
        actual_output: String,
        /// Lets the UI tell a compile error or an unreachable service apart
        /// from a plain wrong answer.
        kind: OutputKind,
        passed_count: usize,
        total_count: usize,
        runtime_ms: u64,
        memory_estimate_mb: u64,
    },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub question_id: String,
    pub language: Language,
    pub results: Vec<CaseReport>,
    pub passed_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub verdict: Verdict,
    /// Refreshed progress after an acceptance. `None` if not accepted or the
    /// refresh failed.
    pub progress: Option<UserProgress>,
    /// Whether the question is now completed for this learner.
    pub completed: bool,
}

/// Per-question state owned by the caller for the duration of a Run/Submit.
#[derive(Debug, Clone)]
pub struct JudgeSession {
    user: UserContext,
    question: Question,
    language: Language,
    state: JudgeState,
    public_results: Vec<CaseReport>,
    verdict: Option<Verdict>,
    completed: bool,
}

impl JudgeSession {
    /// Fails with `UnsupportedLanguage` before anything else happens.
    pub fn new(
        user: UserContext,
        question: Question,
        language_id: &str,
        completed: bool,
    ) -> Result<Self, JudgeError> {
        let language = language_id.parse::<Language>()?;
        Ok(Self {
            user,
            question,
            language,
            state: JudgeState::Idle,
            public_results: Vec::new(),
            verdict: None,
            completed,
        })
    }

    pub fn state(&self) -> JudgeState {
        self.state
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Per-case results of the last Run.
    pub fn public_results(&self) -> &[CaseReport] {
        &self.public_results
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, JudgeState::Running | JudgeState::Submitting)
    }

    fn enter(&mut self, next: JudgeState, code: &str) -> Result<(), JudgeError> {
        if self.is_busy() {
            return Err(JudgeError::Busy(self.question.id.clone()));
        }
        if code.trim().is_empty() {
            return Err(JudgeError::EmptyCode);
        }
        self.state = next;
        self.verdict = None;
        Ok(())
    }
}

/// Synthetic "memory" figure: elapsed wall-clock time scaled down.
/// Nothing is measured; the field only exists for display compatibility.
pub fn estimate_memory_mb(runtime_ms: u64) -> u64 {
    (runtime_ms as f64 / MEMORY_ESTIMATE_DIVISOR_MS as f64).round() as u64
}

pub struct Judge {
    evaluator: TestEvaluator,
    drafts: DraftService,
    submissions: Arc<dyn SubmissionLog>,
    progress: Arc<dyn ProgressSource>,
    write_attempts: u32,
}

impl Judge {
    pub fn new(
        evaluator: TestEvaluator,
        drafts: DraftService,
        submissions: Arc<dyn SubmissionLog>,
        progress: Arc<dyn ProgressSource>,
    ) -> Self {
        Self {
            evaluator,
            drafts,
            submissions,
            progress,
            write_attempts: 1,
        }
    }

    pub fn with_write_attempts(mut self, attempts: u32) -> Self {
        self.write_attempts = attempts.max(1);
        self
    }

    pub fn drafts(&self) -> &DraftService {
        &self.drafts
    }

    /// Run flow: diagnostic pass over the public cases.
    pub async fn run(
        &self,
        session: &mut JudgeSession,
        code: &str,
        cancel: &CancelFlag,
    ) -> Result<RunReport, JudgeError> {
        session.enter(JudgeState::Running, code)?;
        let result = self.run_inner(session, code, cancel).await;
        session.state = JudgeState::Idle;
        result
    }

    async fn run_inner(
        &self,
        session: &mut JudgeSession,
        code: &str,
        cancel: &CancelFlag,
    ) -> Result<RunReport, JudgeError> {
        self.save_draft(session, code).await;

        let cases = session.question.public_cases();
        let evaluation = self
            .evaluator
            .evaluate(&cases, code, session.language, EvaluationMode::Diagnostic, cancel)
            .await?;

        tracing::info!(
            user = %session.user.user_id,
            question = %session.question.id,
            language = %session.language,
            passed = evaluation.passed_count,
            total = evaluation.total_count,
            "Run finished"
        );

        session.public_results = evaluation.cases.clone();

        Ok(RunReport {
            question_id: session.question.id.clone(),
            language: session.language,
            results: evaluation.cases,
            passed_count: evaluation.passed_count,
            total_count: evaluation.total_count,
        })
    }

    /// Submit flow: gating pass over public + private cases, then persistence.
    pub async fn submit(
        &self,
        session: &mut JudgeSession,
        code: &str,
        cancel: &CancelFlag,
    ) -> Result<SubmitOutcome, JudgeError> {
        session.enter(JudgeState::Submitting, code)?;

        match self.submit_inner(session, code, cancel).await {
            Ok(outcome) => {
                session.state = if outcome.verdict.is_accepted() {
                    JudgeState::Accepted
                } else {
                    JudgeState::Rejected
                };
                session.verdict = Some(outcome.verdict.clone());
                Ok(outcome)
            }
            Err(e) => {
                session.state = JudgeState::Idle;
                Err(e)
            }
        }
    }

    async fn submit_inner(
        &self,
        session: &mut JudgeSession,
        code: &str,
        cancel: &CancelFlag,
    ) -> Result<SubmitOutcome, JudgeError> {
        let started = Instant::now();
        self.save_draft(session, code).await;

        let cases = session.question.all_cases();
        if cases.is_empty() {
            return Err(JudgeError::NoTestCases(session.question.id.clone()));
        }

        let evaluation = self
            .evaluator
            .evaluate(&cases, code, session.language, EvaluationMode::Gating, cancel)
            .await?;

        let runtime_ms = started.elapsed().as_millis() as u64;
        let memory_estimate_mb = estimate_memory_mb(runtime_ms);

        let (verdict, status, test_cases_passed) = match evaluation.failing_case() {
            Some(failed) => (
                Verdict::Rejected {
                    input: failed.input.clone(),
                    expected_output: failed.expected_output.clone(),
                    actual_output: failed.actual_output.clone(),
                    kind: failed.kind,
                    passed_count: evaluation.passed_count,
                    total_count: evaluation.total_count,
                    runtime_ms,
                    memory_estimate_mb,
                },
                SubmissionStatus::Failed,
                evaluation.passed_count,
            ),
            None => (
                Verdict::Accepted {
                    total_tests: evaluation.total_count,
                    runtime_ms,
                    memory_estimate_mb,
                },
                SubmissionStatus::Accepted,
                evaluation.total_count,
            ),
        };

        // A verdict reached after the caller walked away must not be recorded.
        if cancel.is_cancelled() {
            return Err(JudgeError::Cancelled);
        }

        let submission = NewSubmission {
            question_id: session.question.id.clone(),
            code: code.to_string(),
            language: session.language.id().to_string(),
            status,
            runtime_ms,
            memory_estimate_mb,
            test_cases_passed: test_cases_passed as u32,
            total_test_cases: evaluation.total_count as u32,
            points: session.question.points,
        };

        if let Err(reason) = self.record(&session.user, &submission).await {
            return Err(JudgeError::SubmissionNotRecorded {
                verdict: Box::new(verdict),
                reason,
            });
        }

        tracing::info!(
            user = %session.user.user_id,
            question = %session.question.id,
            language = %session.language,
            status = status.as_str(),
            passed = test_cases_passed,
            total = evaluation.total_count,
            runtime_ms,
            "Submission recorded"
        );

        let progress = if verdict.is_accepted() {
            session.completed = true;
            self.refresh_progress(&session.user).await
        } else {
            None
        };

        Ok(SubmitOutcome {
            verdict,
            progress,
            completed: session.completed,
        })
    }

    /// Draft persistence never blocks execution.
    async fn save_draft(&self, session: &JudgeSession, code: &str) {
        if let Err(e) = self
            .drafts
            .save(&session.user, &session.question.id, session.language, code)
            .await
        {
            tracing::warn!(
                user = %session.user.user_id,
                question = %session.question.id,
                "Failed to save draft before execution: {}",
                e
            );
        }
    }

    async fn record(&self, user: &UserContext, submission: &NewSubmission) -> Result<(), String> {
        let mut last_error = String::new();
        for attempt in 1..=self.write_attempts {
            match self.submissions.record(user, submission).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        user = %user.user_id,
                        question = %submission.question_id,
                        attempt,
                        "Failed to record submission: {}",
                        e
                    );
                    last_error = e.to_string();
                    if attempt < self.write_attempts {
                        tokio::time::sleep(SUBMISSION_RETRY_BACKOFF * attempt).await;
                    }
                }
            }
        }
        Err(last_error)
    }

    async fn refresh_progress(&self, user: &UserContext) -> Option<UserProgress> {
        match self.progress.progress(user).await {
            Ok(progress) => Some(progress),
            Err(e) => {
                tracing::warn!(user = %user.user_id, "Failed to refresh progress: {}", e);
                None
            }
        }
    }
}
