//! Execution of generated code.
//!
//! WARNING: this is not a sandbox. Generated code runs as a child process of
//! the current user with full filesystem, network, and process privileges.
//! The `Executor` trait is the seam where an isolated implementation
//! (subprocess jail, container) could be plugged in; the default
//! `PythonExecutor` provides no isolation beyond a separate process and a
//! wall-clock timeout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;

use crate::error::{HerdrError, Result};

/// Outcome of running generated code.
///
/// A `Failure` is recoverable data for the repair loop, not an error: the
/// error text is fed back to the model verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Success,
    Failure(String),
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success)
    }

    /// The error text, if this is a failure
    pub fn error_text(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success => None,
            ExecutionResult::Failure(text) => Some(text),
        }
    }
}

/// Pluggable execution capability
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run the code, capturing success or the error text
    async fn run(&self, code: &str) -> Result<ExecutionResult>;
}

/// Runs Python code by writing it to a scratch file and invoking an
/// interpreter subprocess.
///
/// The scratch file keeps the same path for the lifetime of the executor so
/// that a repeated failure produces byte-identical tracebacks - the repair
/// loop's stagnation check relies on strict string equality of error text.
pub struct PythonExecutor {
    interpreter: String,
    timeout: Duration,
    max_output_bytes: usize,
    scratch_dir: TempDir,
}

impl PythonExecutor {
    /// Create an executor using the given interpreter binary
    pub fn new(interpreter: impl Into<String>, timeout: Duration, max_output_bytes: usize) -> Result<Self> {
        let scratch_dir = TempDir::new()
            .map_err(|e| HerdrError::Execution(format!("Failed to create scratch dir: {}", e)))?;

        Ok(Self {
            interpreter: interpreter.into(),
            timeout,
            max_output_bytes,
            scratch_dir,
        })
    }

    fn truncate(&self, text: String) -> String {
        if text.len() <= self.max_output_bytes {
            return text;
        }
        // The cap is a byte count; back off to the nearest char boundary so
        // multibyte output never splits mid-character.
        let mut cut = self.max_output_bytes;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...\n[truncated, {} bytes total]", &text[..cut], text.len())
    }
}

#[async_trait]
impl Executor for PythonExecutor {
    async fn run(&self, code: &str) -> Result<ExecutionResult> {
        let script_path = self.scratch_dir.path().join("script.py");
        tokio::fs::write(&script_path, code)
            .await
            .map_err(|e| HerdrError::Execution(format!("Failed to write scratch script: {}", e)))?;

        log::debug!("Executing {} {}", self.interpreter, script_path.display());

        let output = match tokio::time::timeout(
            self.timeout,
            Command::new(&self.interpreter)
                .arg(&script_path)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        {
            Ok(io_result) => io_result
                .map_err(|e| HerdrError::Execution(format!("Failed to spawn {}: {}", self.interpreter, e)))?,
            Err(_) => {
                return Ok(ExecutionResult::Failure(format!(
                    "execution timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
        };

        if output.status.success() {
            return Ok(ExecutionResult::Success);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);

        let error_text = if stderr.is_empty() {
            format!("exit code {}: {}", output.status.code().unwrap_or(-1), stdout)
        } else {
            stderr.to_string()
        };

        Ok(ExecutionResult::Failure(self.truncate(error_text)))
    }
}
