// src/models/execution.rs

use serde::Serialize;

/// Sentinel output when the Execution Service could not be reached.
pub const CONNECTION_ERROR_OUTPUT: &str = "Connection error";

/// Sentinel output when the program produced nothing at all.
pub const NO_OUTPUT: &str = "No output";

/// Which stream the normalized output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    CompileError,
    Stderr,
    Stdout,
    NoOutput,
    ConnectionError,
}

/// Normalized result of a single Execution Service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub kind: OutputKind,
    pub output: String,
}

impl ExecutionResult {
    /// Collapses the raw streams into one output string.
    ///
    /// Precedence: compile diagnostics > runtime stderr > stdout > "No output".
    /// Stdout is trimmed; diagnostics are labelled and kept verbatim.
    pub fn normalize(
        compile_stderr: Option<&str>,
        run_stderr: Option<&str>,
        run_stdout: Option<&str>,
    ) -> Self {
        fn non_empty(s: Option<&str>) -> Option<&str> {
            s.filter(|v| !v.trim().is_empty())
        }

        if let Some(diag) = non_empty(compile_stderr) {
            return Self {
                kind: OutputKind::CompileError,
                output: format!("Compile Error: {}", diag),
            };
        }
        if let Some(stderr) = non_empty(run_stderr) {
            return Self {
                kind: OutputKind::Stderr,
                output: format!("Error: {}", stderr),
            };
        }
        if let Some(stdout) = non_empty(run_stdout) {
            return Self {
                kind: OutputKind::Stdout,
                output: stdout.trim().to_string(),
            };
        }

        Self {
            kind: OutputKind::NoOutput,
            output: NO_OUTPUT.to_string(),
        }
    }

    pub fn connection_error() -> Self {
        Self {
            kind: OutputKind::ConnectionError,
            output: CONNECTION_ERROR_OUTPUT.to_string(),
        }
    }
}
