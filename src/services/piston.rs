// src/services/piston.rs

//! Execution Adapter backed by a Piston-compatible Execution Service.
//!
//! Wire format: `POST {language, version: "*", files: [{content}], stdin}`
//! answered by `{compile?: {stderr}, run?: {stdout, stderr}}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::JudgeError,
    judge::{
        executor::{CodeExecutor, RetryPolicy, decode_stdin},
        language::Language,
    },
    models::execution::ExecutionResult,
};

#[derive(Debug, Serialize)]
struct PistonRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
    stdin: &'a str,
}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct PistonResponse {
    #[serde(default)]
    compile: Option<PistonStage>,
    #[serde(default)]
    run: Option<PistonStage>,
}

#[derive(Debug, Default, Deserialize)]
struct PistonStage {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
}

impl PistonResponse {
    fn into_result(self) -> ExecutionResult {
        let compile_stderr = self.compile.as_ref().and_then(|c| c.stderr.as_deref());
        let run_stderr = self.run.as_ref().and_then(|r| r.stderr.as_deref());
        let run_stdout = self.run.as_ref().and_then(|r| r.stdout.as_deref());
        ExecutionResult::normalize(compile_stderr, run_stderr, run_stdout)
    }
}

/// Why a single attempt failed.
#[derive(Debug)]
enum AttemptError {
    /// Worth another try: transport failure, timeout, 429 or 5xx.
    Transient(String),
    /// Retrying cannot help: other 4xx or an unreadable body.
    Permanent(String),
}

pub struct PistonExecutor {
    http_client: reqwest::Client,
    endpoint: String,
    retry: RetryPolicy,
}

impl PistonExecutor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("judge-gateway/0.1")
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            endpoint: endpoint.into(),
            retry,
        }
    }

    async fn call_once(&self, body: &PistonRequest<'_>) -> Result<PistonResponse, AttemptError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP {} from {}", status, self.endpoint);
            return Err(if status.is_server_error() || status.as_u16() == 429 {
                AttemptError::Transient(message)
            } else {
                AttemptError::Permanent(message)
            });
        }

        response
            .json::<PistonResponse>()
            .await
            .map_err(|e| AttemptError::Permanent(format!("invalid response body: {}", e)))
    }
}

#[async_trait]
impl CodeExecutor for PistonExecutor {
    /// Infrastructure failures never escape: once the retry policy is
    /// exhausted the call reports `Connection error` as its output.
    async fn execute(
        &self,
        language: Language,
        source: &str,
        stdin: &str,
    ) -> Result<ExecutionResult, JudgeError> {
        let stdin = decode_stdin(stdin);
        let body = PistonRequest {
            language: language.runtime(),
            version: "*",
            files: vec![PistonFile { content: source }],
            stdin: &stdin,
        };

        for attempt in 1..=self.retry.max_attempts {
            let delay = self.retry.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.call_once(&body).await {
                Ok(response) => {
                    let result = response.into_result();
                    debug!(%language, attempt, kind = ?result.kind, "Execution finished");
                    return Ok(result);
                }
                Err(AttemptError::Transient(msg)) => {
                    warn!(%language, attempt, "Execution service call failed: {}", msg);
                }
                Err(AttemptError::Permanent(msg)) => {
                    warn!(%language, attempt, "Execution service rejected call: {}", msg);
                    break;
                }
            }
        }

        Ok(ExecutionResult::connection_error())
    }
}
