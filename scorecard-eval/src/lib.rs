//! # scorecard-eval
//!
//! Behavioral evaluation engine for tool-using agents.
//!
//! Replays what an agent did (its tool calls and final answer) against a
//! human-authored expectation and produces quantitative scores for fidelity
//! and quality.
//!
//! ## Features
//!
//! - **Trajectory Comparison**: exact, in-order and any-order matching plus
//!   precision and recall over tool-call names
//! - **Argument Matching**: key and key-value agreement of tool arguments
//! - **Response Content**: keyword coverage of the final answer
//! - **Rule-Based Metrics**: portfolio compliance, diversification and risk
//!   appropriateness with injected business rules
//! - **Qualitative Judge**: rubric prompts with a pluggable text generator
//! - **Suite Runs**: per-case reports and per-metric averages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scorecard_eval::{CaseRunner, EvalSuite, EvaluationCase, SuiteRunner, ToolCall};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let executor = Arc::new(MyRuntimeExecutor::new());
//!     let runner = SuiteRunner::new(CaseRunner::new("support_agent", executor));
//!
//!     let suite = EvalSuite::new("smart_home_support").with_case(
//!         EvaluationCase::new("device_offline", "My thermostat keeps going offline")
//!             .with_expected_tool_calls(vec![
//!                 ToolCall::new("check_device_logs").with_arg("device_id", "thermo-1"),
//!                 ToolCall::new("analyze_error_patterns"),
//!             ])
//!             .with_expected_keywords(["restart", "wifi"]),
//!     );
//!
//!     let report = runner.run(&suite).await;
//!     println!("{}", report.format_summary());
//! }
//! ```

pub mod arguments;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod llm_judge;
pub mod metric;
pub mod report;
pub mod rules;
pub mod schema;
pub mod scoring;
pub mod trajectory;

// Re-exports
pub use arguments::{ArgumentMatcher, ArgumentScores, CallMatch};
pub use config::{ComplianceRules, EvaluationConfig, JudgeConfig};
pub use error::{EvalError, Result};
pub use evaluator::{CaseRunner, SuiteRunner};
pub use executor::AgentExecutor;
pub use llm_judge::{JudgeAdapter, QualitativeJudge};
pub use metric::{MetricMethod, MetricResult, aggregate_score};
pub use report::{CaseReport, CaseStatus, SuiteReport, SuiteSummary};
pub use rules::{
    ComplianceResult, ComplianceScorer, DiversificationResult, RiskAssessment, RiskStatus,
    assess_risk, score_diversification,
};
pub use schema::{
    ClientContext, EvalSuite, EvaluationCase, ExpectedInvocation, Holding, Recommendation,
    RiskProfile, ToolCall, Trace,
};
pub use scoring::{KeywordMatch, ResponseScorer};
pub use trajectory::{TrajectoryScorer, TrajectoryScores};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ComplianceRules, EvaluationConfig};
    pub use crate::error::{EvalError, Result};
    pub use crate::evaluator::{CaseRunner, SuiteRunner};
    pub use crate::executor::AgentExecutor;
    pub use crate::llm_judge::QualitativeJudge;
    pub use crate::metric::MetricResult;
    pub use crate::report::{CaseReport, SuiteReport};
    pub use crate::schema::{
        ClientContext, EvalSuite, EvaluationCase, Holding, Recommendation, ToolCall, Trace,
    };
}
