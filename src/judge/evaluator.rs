// src/judge/evaluator.rs

use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::JudgeError,
    judge::{cancel::CancelFlag, executor::CodeExecutor, language::Language, limiter::RateLimiter},
    models::{execution::OutputKind, question::TestCase},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Run every case, paced, and annotate each with its actual output.
    Diagnostic,
    /// Run cases in order and stop at the first mismatch.
    Gating,
}

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub index: usize,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub kind: OutputKind,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub mode: EvaluationMode,
    /// Executed cases only. In gating mode this ends at the first failure.
    pub cases: Vec<CaseReport>,
    pub passed_count: usize,
    pub total_count: usize,
    pub first_failure: Option<usize>,
}

impl Evaluation {
    pub fn all_passed(&self) -> bool {
        self.first_failure.is_none() && self.passed_count == self.total_count
    }

    pub fn failing_case(&self) -> Option<&CaseReport> {
        self.first_failure.and_then(|i| self.cases.iter().find(|c| c.index == i))
    }
}

/// Exact match after trimming surrounding whitespace on both sides.
///
/// No numeric tolerance: `0.1` and `0.10` differ, as do answers that only
/// differ in interior whitespace.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// Test Evaluator: runs an ordered list of cases one at a time.
#[derive(Clone)]
pub struct TestEvaluator {
    executor: Arc<dyn CodeExecutor>,
    limiter: Arc<dyn RateLimiter>,
}

impl TestEvaluator {
    pub fn new(executor: Arc<dyn CodeExecutor>, limiter: Arc<dyn RateLimiter>) -> Self {
        Self { executor, limiter }
    }

    pub async fn evaluate(
        &self,
        cases: &[TestCase],
        code: &str,
        language: Language,
        mode: EvaluationMode,
        cancel: &CancelFlag,
    ) -> Result<Evaluation, JudgeError> {
        let total_count = cases.len();
        let mut reports = Vec::with_capacity(total_count);
        let mut passed_count = 0;
        let mut first_failure = None;

        for (index, case) in cases.iter().enumerate() {
            if mode == EvaluationMode::Diagnostic && index > 0 {
                tokio::select! {
                    _ = self.limiter.acquire() => {}
                    _ = cancel.cancelled() => return Err(JudgeError::Cancelled),
                }
            }
            if cancel.is_cancelled() {
                return Err(JudgeError::Cancelled);
            }

            let result = tokio::select! {
                result = self.executor.execute(language, code, &case.input) => result?,
                _ = cancel.cancelled() => return Err(JudgeError::Cancelled),
            };

            let passed = outputs_match(&result.output, &case.expected_output);
            tracing::debug!(
                case = index,
                %language,
                kind = ?result.kind,
                passed,
                "Evaluated test case"
            );

            reports.push(CaseReport {
                index,
                input: case.input.clone(),
                expected_output: case.expected_output.clone(),
                actual_output: result.output,
                kind: result.kind,
                passed,
            });

            if passed {
                passed_count += 1;
            } else if first_failure.is_none() {
                first_failure = Some(index);
                if mode == EvaluationMode::Gating {
                    break;
                }
            }
        }

        Ok(Evaluation {
            mode,
            cases: reports,
            passed_count,
            total_count,
            first_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::limiter::Unpaced;
    use crate::judge::testing::{CountingLimiter, ScriptedExecutor, case, connection_error, stdout};
    use std::time::Duration;

    fn evaluator(executor: Arc<ScriptedExecutor>) -> TestEvaluator {
        TestEvaluator::new(executor, Arc::new(Unpaced))
    }

    #[test]
    fn test_outputs_match_trims() {
        assert!(outputs_match("9", "9"));
        assert!(outputs_match("9\n", "9"));
        assert!(outputs_match("9", "9  \n"));
        assert!(!outputs_match("0.1", "0.10"));
        assert!(!outputs_match("1 2", "1  2"));
    }

    #[tokio::test]
    async fn test_gating_stops_at_first_failure() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            stdout("1"),
            stdout("2"),
            stdout("wrong"),
            stdout("4"),
        ]));
        let cases = vec![case("a", "1"), case("b", "2"), case("c", "3"), case("d", "4")];

        let eval = evaluator(executor.clone())
            .evaluate(&cases, "code", Language::Python, EvaluationMode::Gating, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(eval.passed_count, 2);
        assert_eq!(eval.total_count, 4);
        assert_eq!(eval.first_failure, Some(2));
        assert_eq!(eval.cases.len(), 3);
        assert_eq!(executor.call_count(), 3, "fourth case must not execute");
        assert_eq!(eval.failing_case().unwrap().actual_output, "wrong");
    }

    #[tokio::test]
    async fn test_diagnostic_runs_every_case() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            stdout("nope"),
            stdout("2"),
            connection_error(),
        ]));
        let limiter = Arc::new(CountingLimiter::default());
        let cases = vec![case("a", "1"), case("b", "2"), case("c", "3")];

        let eval = TestEvaluator::new(executor.clone(), limiter.clone())
            .evaluate(&cases, "code", Language::C, EvaluationMode::Diagnostic, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(eval.cases.len(), 3);
        assert_eq!(eval.passed_count, 1);
        assert_eq!(eval.first_failure, Some(0));
        assert_eq!(eval.cases[2].actual_output, "Connection error");
        assert!(!eval.cases[2].passed);
        assert_eq!(limiter.count(), 2, "pacing happens between calls only");
    }

    #[tokio::test]
    async fn test_gating_does_not_pace() {
        let executor = Arc::new(ScriptedExecutor::new(vec![stdout("1"), stdout("2")]));
        let limiter = Arc::new(CountingLimiter::default());
        let cases = vec![case("a", "1"), case("b", "2")];

        let eval = TestEvaluator::new(executor, limiter.clone())
            .evaluate(&cases, "code", Language::C, EvaluationMode::Gating, &CancelFlag::new())
            .await
            .unwrap();

        assert!(eval.all_passed());
        assert_eq!(limiter.count(), 0);
    }

    #[tokio::test]
    async fn test_connection_error_is_a_wrong_answer() {
        let executor = Arc::new(ScriptedExecutor::new(vec![connection_error()]));
        let cases = vec![case("3\\n", "9")];

        let eval = evaluator(executor)
            .evaluate(&cases, "code", Language::Java, EvaluationMode::Gating, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(eval.passed_count, 0);
        assert_eq!(eval.first_failure, Some(0));
        assert_eq!(eval.cases[0].kind, OutputKind::ConnectionError);
    }

    #[tokio::test]
    async fn test_executor_error_aborts_batch() {
        let executor = Arc::new(ScriptedExecutor::from_results(vec![
            Ok(crate::models::execution::ExecutionResult::normalize(None, None, Some("1"))),
            Err(JudgeError::Execution("adapter crashed".into())),
        ]));
        let cases = vec![case("a", "1"), case("b", "2"), case("c", "3")];

        let err = evaluator(executor.clone())
            .evaluate(&cases, "code", Language::Cpp, EvaluationMode::Gating, &CancelFlag::new())
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeError::Execution(_)));
        assert_eq!(executor.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_batch() {
        let executor = Arc::new(
            ScriptedExecutor::new(vec![stdout("1"), stdout("2"), stdout("3")])
                .with_delay(Duration::from_millis(200)),
        );
        let cases = vec![case("a", "1"), case("b", "2"), case("c", "3")];
        let cancel = CancelFlag::new();

        let trip = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                cancel.cancel();
            })
        };

        let err = evaluator(executor.clone())
            .evaluate(&cases, "code", Language::Python, EvaluationMode::Diagnostic, &cancel)
            .await
            .unwrap_err();
        trip.await.unwrap();

        assert!(matches!(err, JudgeError::Cancelled));
        assert_eq!(executor.call_count(), 1);
    }
}
