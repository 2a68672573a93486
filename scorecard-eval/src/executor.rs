//! Agent executor collaborator
//!
//! The engine never runs agents itself. Whatever drives the agent runtime
//! implements [`AgentExecutor`] and hands back a finished [`Trace`].

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::Trace;

/// Runs one conversational turn of an agent and reports what it did
///
/// A single call per case: the runners never retry. Failures should be
/// reported as [`EvalError::ExecutionError`](crate::EvalError::ExecutionError).
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Execute `query` against the agent named `agent`
    async fn execute(&self, agent: &str, query: &str) -> Result<Trace>;
}
