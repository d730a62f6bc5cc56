//! Error types for Herdr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Herdr
#[derive(Debug, Error)]
pub enum HerdrError {
    /// Fatal problem before any generation (credentials, CLI combination)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Model reply did not contain the expected fenced code block
    #[error("No fenced ```{code_type} block found in model response")]
    Extraction { code_type: String },

    /// LLM API error (transport or protocol) - fatal, not retried
    #[error("LLM error: {0}")]
    Llm(String),

    /// Executor infrastructure failure (spawning the interpreter, temp files).
    /// A failure *of the generated code* is `ExecutionResult::Failure`, which
    /// is recoverable data, not an error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Herdr operations
pub type Result<T> = std::result::Result<T, HerdrError>;
