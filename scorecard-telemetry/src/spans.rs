//! Span helpers for evaluation runs
//!
//! Provides pre-configured spans for instrumenting suites, cases and the two
//! external collaborators (agent executor and qualitative judge).

use tracing::Span;

/// Create a span covering a whole suite run
///
/// # Example
/// ```
/// use scorecard_telemetry::suite_run_span;
/// let span = suite_run_span("smart_home_support", "run-123");
/// let _enter = span.enter();
/// ```
pub fn suite_run_span(suite_id: &str, run_id: &str) -> Span {
    tracing::info_span!("eval.suite", suite.id = suite_id, run.id = run_id)
}

/// Create a span for scoring a single evaluation case
pub fn case_run_span(case_id: &str) -> Span {
    tracing::info_span!("eval.case", case.id = case_id)
}

/// Create a span for obtaining a trace from the agent executor
pub fn executor_call_span(agent_name: &str) -> Span {
    tracing::info_span!("eval.executor", agent.name = agent_name, otel.kind = "client")
}

/// Create a span for a qualitative judge request
pub fn judge_call_span(metric: &str) -> Span {
    tracing::debug_span!("eval.judge", metric = metric, otel.kind = "client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_can_be_entered() {
        let suite = suite_run_span("suite", "run");
        let _suite = suite.enter();
        let case = case_run_span("case_1");
        let _case = case.enter();
        let _ = executor_call_span("support_agent");
        let _ = judge_call_span("helpfulness");
    }
}
