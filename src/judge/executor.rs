// src/judge/executor.rs

use std::time::Duration;

use async_trait::async_trait;

use crate::{error::JudgeError, judge::language::Language, models::execution::ExecutionResult};

/// Execution Adapter contract: one call runs one (source, stdin) pair.
///
/// Implementations recover from infrastructure failures themselves and report
/// them as `ExecutionResult::connection_error()`. An `Err` aborts the batch.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(
        &self,
        language: Language,
        source: &str,
        stdin: &str,
    ) -> Result<ExecutionResult, JudgeError>;
}

/// Retry behaviour for transient Execution Service failures.
///
/// The default is a single attempt: a failed call becomes a wrong answer
/// immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Wait before attempt number `attempt` (1-based). Doubles each time.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u32 << (attempt - 2).min(16);
        self.backoff.saturating_mul(factor)
    }
}

/// Test data stores newlines as the two characters `\` `n`; the program must
/// see real line breaks on stdin.
pub fn decode_stdin(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
