//! Error types for the evaluation engine

use thiserror::Error;

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur during evaluation
///
/// None of these escape [`CaseRunner::run`](crate::CaseRunner::run) or
/// [`SuiteRunner::run`](crate::SuiteRunner::run); they are recorded on the
/// affected metric or case instead.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The agent executor failed to produce a trace
    #[error("Agent execution failed: {0}")]
    ExecutionError(String),

    /// The qualitative judge failed to produce a rating
    #[error("Judge error: {0}")]
    JudgeError(String),

    /// The evaluation case is missing a required field
    #[error("Invalid case: {0}")]
    InvalidCase(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
