// src/judge/testing.rs

//! In-memory fakes shared by the judge unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    error::JudgeError,
    judge::{
        executor::CodeExecutor,
        language::Language,
        limiter::RateLimiter,
        ports::{DraftStore, ProgressSource, SubmissionLog},
        progression::TopicOutline,
    },
    models::{
        execution::ExecutionResult,
        progress::UserProgress,
        question::{PrivateTestCase, PublicTestCase, Question, TestCase, TestCaseSet},
        submission::{NewSubmission, Submission, SubmissionStatus},
        topic::Topic,
        user::UserContext,
    },
};

pub(crate) fn case(input: &str, expected: &str) -> TestCase {
    TestCase {
        input: input.to_string(),
        expected_output: expected.to_string(),
    }
}

pub(crate) fn stdout(out: &str) -> Result<ExecutionResult, JudgeError> {
    Ok(ExecutionResult::normalize(None, None, Some(out)))
}

pub(crate) fn connection_error() -> Result<ExecutionResult, JudgeError> {
    Ok(ExecutionResult::connection_error())
}

/// Question with a single public case `in -> ok`.
pub(crate) fn question(id: &str, order: i64, points: u32) -> Question {
    let mut q = question_with_cases(id, &[("in", "ok")], &[]);
    q.order = order;
    q.points = points;
    q
}

pub(crate) fn question_with_cases(
    id: &str,
    public: &[(&str, &str)],
    private: &[(&str, &str)],
) -> Question {
    Question {
        id: id.to_string(),
        topic_id: String::new(),
        title: format!("Question {}", id),
        description: String::new(),
        constraints: Vec::new(),
        example: None,
        explanation: String::new(),
        test_cases: TestCaseSet {
            public: public
                .iter()
                .map(|(input, output)| PublicTestCase {
                    input: input.to_string(),
                    output: output.to_string(),
                    explanation: String::new(),
                })
                .collect(),
            private: private
                .iter()
                .map(|(input, output)| PrivateTestCase {
                    input: input.to_string(),
                    output: output.to_string(),
                })
                .collect(),
        },
        difficulty: "Easy".to_string(),
        points: 10,
        order: 0,
    }
}

pub(crate) fn outline(id: &str, order: i64, questions: Vec<Question>) -> TopicOutline {
    let questions = questions
        .into_iter()
        .map(|mut q| {
            q.topic_id = id.to_string();
            q
        })
        .collect();
    TopicOutline {
        topic: Topic {
            id: id.to_string(),
            title: format!("Topic {}", id),
            description: String::new(),
            difficulty: "Easy".to_string(),
            order,
        },
        questions,
    }
}

/// Executor that replays a script of results, one per call.
pub(crate) struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<ExecutionResult, JudgeError>>>,
    fallback: Option<ExecutionResult>,
    stdins: Mutex<Vec<String>>,
    delay: Duration,
}

impl ScriptedExecutor {
    pub(crate) fn new(script: Vec<Result<ExecutionResult, JudgeError>>) -> Self {
        Self::from_results(script)
    }

    pub(crate) fn from_results(script: Vec<Result<ExecutionResult, JudgeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            stdins: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Returns the same result for every call.
    pub(crate) fn always(result: Result<ExecutionResult, JudgeError>) -> Self {
        let mut executor = Self::from_results(Vec::new());
        executor.fallback = result.ok();
        executor
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.stdins.lock().unwrap().len()
    }

    pub(crate) fn stdins(&self) -> Vec<String> {
        self.stdins.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _language: Language,
        _source: &str,
        stdin: &str,
    ) -> Result<ExecutionResult, JudgeError> {
        self.stdins.lock().unwrap().push(stdin.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => Ok(self
                .fallback
                .clone()
                .unwrap_or_else(|| ExecutionResult::normalize(None, None, None))),
        }
    }
}

#[derive(Default)]
pub(crate) struct CountingLimiter {
    count: AtomicUsize,
}

impl CountingLimiter {
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for CountingLimiter {
    async fn acquire(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct MemoryInner {
    drafts: HashMap<(String, String, String), String>,
    submissions: Vec<(String, NewSubmission)>,
    coins: HashMap<String, i64>,
    completed: HashMap<String, Vec<String>>,
}

/// Stand-in for the backend: drafts, submission log and derived progress.
#[derive(Default)]
pub(crate) struct MemoryStore {
    inner: Mutex<MemoryInner>,
    fail_drafts: AtomicBool,
    failing_records: AtomicU32,
    record_attempts: AtomicU32,
}

impl MemoryStore {
    pub(crate) fn fail_drafts(&self, fail: bool) {
        self.fail_drafts.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_next_records(&self, n: u32) {
        self.failing_records.store(n, Ordering::SeqCst);
    }

    pub(crate) fn record_attempts(&self) -> u32 {
        self.record_attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn recorded(&self) -> Vec<NewSubmission> {
        let inner = self.inner.lock().unwrap();
        inner.submissions.iter().map(|(_, s)| s.clone()).collect()
    }

    pub(crate) fn draft(&self, user: &str, question: &str, language: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .drafts
            .get(&(user.to_string(), question.to_string(), language.to_string()))
            .cloned()
    }

    pub(crate) fn completed_set(&self, user: &str) -> HashSet<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .completed
            .get(user)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn load(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
    ) -> Result<Option<String>, JudgeError> {
        if self.fail_drafts.load(Ordering::SeqCst) {
            return Err(JudgeError::Backend("drafts unavailable".into()));
        }
        Ok(self.draft(&user.user_id, question_id, language.id()))
    }

    async fn save(
        &self,
        user: &UserContext,
        question_id: &str,
        language: Language,
        code: &str,
    ) -> Result<(), JudgeError> {
        if self.fail_drafts.load(Ordering::SeqCst) {
            return Err(JudgeError::Backend("drafts unavailable".into()));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.drafts.insert(
            (
                user.user_id.clone(),
                question_id.to_string(),
                language.id().to_string(),
            ),
            code.to_string(),
        );
        Ok(())
    }
}

#[async_trait]
impl SubmissionLog for MemoryStore {
    async fn record(
        &self,
        user: &UserContext,
        submission: &NewSubmission,
    ) -> Result<(), JudgeError> {
        self.record_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_records.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_records.store(remaining - 1, Ordering::SeqCst);
            return Err(JudgeError::Backend("submit timed out".into()));
        }

        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        inner
            .submissions
            .push((user.user_id.clone(), submission.clone()));

        if submission.status == SubmissionStatus::Accepted {
            let completed = inner.completed.entry(user.user_id.clone()).or_default();
            if !completed.contains(&submission.question_id) {
                completed.push(submission.question_id.clone());
                *inner.coins.entry(user.user_id.clone()).or_default() += submission.points as i64;
            }
        }
        Ok(())
    }

    async fn history(
        &self,
        user: &UserContext,
        question_id: &str,
    ) -> Result<Vec<Submission>, JudgeError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .submissions
            .iter()
            .rev()
            .filter(|(u, s)| u == &user.user_id && s.question_id == question_id)
            .enumerate()
            .map(|(i, (u, s))| Submission {
                id: format!("s{}", i),
                user_id: u.clone(),
                question_id: s.question_id.clone(),
                language: s.language.clone(),
                code: s.code.clone(),
                status: s.status,
                runtime_ms: s.runtime_ms,
                memory_estimate_mb: s.memory_estimate_mb,
                test_cases_passed: s.test_cases_passed,
                total_test_cases: s.total_test_cases,
                submitted_at: None,
            })
            .collect())
    }
}

#[async_trait]
impl ProgressSource for MemoryStore {
    async fn progress(&self, user: &UserContext) -> Result<UserProgress, JudgeError> {
        let inner = self.inner.lock().unwrap();
        let mine: Vec<&NewSubmission> = inner
            .submissions
            .iter()
            .filter(|(u, _)| u == &user.user_id)
            .map(|(_, s)| s)
            .collect();
        Ok(UserProgress {
            user_id: user.user_id.clone(),
            total_coins: inner.coins.get(&user.user_id).copied().unwrap_or(0),
            completed_question_ids: inner
                .completed
                .get(&user.user_id)
                .cloned()
                .unwrap_or_default(),
            total_submissions: mine.len() as i64,
            successful_submissions: mine
                .iter()
                .filter(|s| s.status == SubmissionStatus::Accepted)
                .count() as i64,
        })
    }
}
