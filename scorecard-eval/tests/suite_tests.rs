//! End-to-end suite runs with scripted collaborators.

use async_trait::async_trait;
use scorecard_eval::prelude::*;
use scorecard_eval::{CaseStatus, JudgeConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays a recorded trace per query; unknown queries fail
struct ScriptedExecutor {
    traces: HashMap<String, Trace>,
    calls: AtomicUsize,
}

impl ScriptedExecutor {
    fn new() -> Self {
        Self { traces: HashMap::new(), calls: AtomicUsize::new(0) }
    }

    fn with_trace(mut self, query: &str, trace: Trace) -> Self {
        self.traces.insert(query.to_string(), trace);
        self
    }
}

#[async_trait]
impl AgentExecutor for ScriptedExecutor {
    async fn execute(&self, _agent: &str, query: &str) -> Result<Trace> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.traces
            .get(query)
            .cloned()
            .ok_or_else(|| EvalError::ExecutionError(format!("no trace for '{}'", query)))
    }
}

/// Rates every helpfulness prompt 0.75 and fails compliance-language prompts
struct PickyJudge;

#[async_trait]
impl QualitativeJudge for PickyJudge {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.contains("compliance language") {
            Err(EvalError::JudgeError("deadline exceeded".to_string()))
        } else {
            Ok("0.75 - clear and actionable".to_string())
        }
    }
}

fn support_suite() -> EvalSuite {
    EvalSuite::new("smart_home_support")
        .with_case(
            EvaluationCase::new("device_offline", "My thermostat keeps going offline")
                .with_name("Thermostat offline")
                .with_expected_tool_calls(vec![
                    ToolCall::new("check_device_logs").with_arg("device_id", "thermo-1"),
                    ToolCall::new("analyze_error_patterns"),
                ])
                .with_expected_keywords(["restart", "wifi"]),
        )
        .with_case(
            EvaluationCase::new("wrong_order", "Lights flicker every evening")
                .with_expected_tool_calls(vec![
                    ToolCall::new("check_device_logs"),
                    ToolCall::new("analyze_error_patterns"),
                ]),
        )
        .with_case(EvaluationCase::new("no_trace", "Something the agent cannot answer"))
        .with_case(EvaluationCase::new("malformed", ""))
}

fn support_executor() -> ScriptedExecutor {
    ScriptedExecutor::new()
        .with_trace(
            "My thermostat keeps going offline",
            Trace::new(
                vec![
                    ToolCall::new("check_device_logs").with_arg("device_id", "THERMO-1"),
                    ToolCall::new("analyze_error_patterns").with_arg("window", "24h"),
                ],
                "Please restart the thermostat and check its WiFi signal.",
            ),
        )
        .with_trace(
            "Lights flicker every evening",
            Trace::new(
                vec![
                    ToolCall::new("analyze_error_patterns"),
                    ToolCall::new("check_device_logs"),
                    ToolCall::new("send_confirmation"),
                ],
                "I sent you a confirmation.",
            ),
        )
}

#[tokio::test]
async fn test_suite_scores_every_case() {
    let executor = Arc::new(support_executor());
    let runner = SuiteRunner::new(CaseRunner::new("support_agent", executor.clone()));

    let report = runner.run(&support_suite()).await;

    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.succeeded, 2);
    assert_eq!(report.summary.errored, 2);
    // The malformed case never reaches the executor
    assert_eq!(executor.calls.load(Ordering::SeqCst), 3);

    let perfect = report.case("device_offline").unwrap();
    assert_eq!(perfect.name, "Thermostat offline");
    assert_eq!(perfect.status, CaseStatus::Pass);
    assert_eq!(perfect.aggregate_score, 1.0);
    assert_eq!(perfect.metric("tool_parameter_kv_match"), Some(1.0));

    let swapped = report.case("wrong_order").unwrap();
    assert_eq!(swapped.metric("trajectory_exact_match"), Some(0.0));
    assert_eq!(swapped.metric("trajectory_in_order_match"), Some(0.0));
    assert_eq!(swapped.metric("trajectory_any_order_match"), Some(1.0));
    assert_eq!(swapped.metric("trajectory_recall"), Some(1.0));
    let precision = swapped.metric("trajectory_precision").unwrap();
    assert!((precision - 2.0 / 3.0).abs() < 1e-9);

    let missing = report.case("no_trace").unwrap();
    assert_eq!(missing.status, CaseStatus::Error);
    assert!(missing.error.as_deref().unwrap().contains("no trace"));

    let malformed = report.case("malformed").unwrap();
    assert!(malformed.error.as_deref().unwrap().contains("has no query"));
    assert!(malformed.results.is_empty());
}

#[tokio::test]
async fn test_suite_averages_only_successful_cases() {
    let runner = SuiteRunner::new(CaseRunner::new("support_agent", Arc::new(support_executor())));
    let report = runner.run(&support_suite()).await;

    assert_eq!(report.aggregate_metrics["trajectory_exact_match"], 0.5);
    assert_eq!(report.aggregate_metrics["trajectory_recall"], 1.0);
    assert_eq!(report.aggregate_metrics.len(), 10);
}

#[tokio::test]
async fn test_parallel_run_matches_sequential_order() {
    let config = EvaluationConfig::default().with_concurrency(3);
    let case_runner =
        CaseRunner::try_new("support_agent", Arc::new(support_executor()), config).unwrap();
    let runner = SuiteRunner::new(case_runner);

    let report = runner.run_parallel(&support_suite()).await;
    let ids: Vec<&str> = report.results.iter().map(|r| r.case_id.as_str()).collect();
    assert_eq!(ids, vec!["device_offline", "wrong_order", "no_trace", "malformed"]);
    assert_eq!(report.aggregate_metrics["trajectory_exact_match"], 0.5);
}

const RETIREMENT_QUERY: &str = "I'm 35 and want to retire at 65. How should I invest?";
const RETIREE_QUERY: &str = "I'm retired and need income.";

fn advisor_suite() -> EvalSuite {
    EvalSuite::new("financial_advisor")
        .with_case(
            EvaluationCase::new("retirement", RETIREMENT_QUERY)
                .with_expected_keywords(["diversif", "risk"])
                .with_recommendation(
                    Recommendation {
                        risk_score: 7,
                        holdings: vec![
                            Holding::new("VTI", 50.0).with_asset_class("US Stocks"),
                            Holding::new("VXUS", 25.0).with_asset_class("International Stocks"),
                            Holding::new("BND", 15.0).with_asset_class("Bonds"),
                            Holding::new("VNQ", 10.0).with_asset_class("Real Estate"),
                        ],
                        disclosure_included: true,
                    },
                    ClientContext::new("moderate", 8, 30),
                ),
        )
        .with_case(
            EvaluationCase::new("retiree_high_risk", RETIREE_QUERY).with_recommendation(
                Recommendation {
                    risk_score: 9,
                    holdings: vec![
                        Holding::new("ARKK", 40.0),
                        Holding::new("QQQ", 35.0),
                        Holding::new("TECH", 25.0),
                    ],
                    disclosure_included: false,
                },
                ClientContext::new("conservative", 3, 5),
            ),
        )
}

fn advisor_executor() -> ScriptedExecutor {
    ScriptedExecutor::new()
        .with_trace(
            RETIREMENT_QUERY,
            Trace::new(vec![], "A diversified growth portfolio fits; all investing carries risk."),
        )
        .with_trace(RETIREE_QUERY, Trace::new(vec![], "Buy ARKK and double your money!"))
}

#[tokio::test]
async fn test_rule_based_and_judge_metrics() {
    let case_runner =
        CaseRunner::new("advisor", Arc::new(advisor_executor())).with_judge(Arc::new(PickyJudge));
    let report = SuiteRunner::new(case_runner).run(&advisor_suite()).await;

    let good = report.case("retirement").unwrap();
    assert_eq!(good.metric("portfolio_compliance"), Some(0.0));
    assert_eq!(good.metric("diversification"), Some(0.82));
    assert_eq!(good.metric("risk_appropriateness"), Some(1.0));
    assert_eq!(good.metric("helpfulness"), Some(0.75));
    // The failed judge call is kept as a null result, not a zero
    assert_eq!(good.metric("compliance_language"), None);
    let failed = good.results.iter().find(|r| r.metric == "compliance_language").unwrap();
    assert!(failed.score.is_none());
    assert!(failed.error.as_deref().unwrap().contains("deadline exceeded"));

    let risky = report.case("retiree_high_risk").unwrap();
    assert_eq!(risky.metric("portfolio_compliance"), Some(0.0));
    assert_eq!(risky.metric("risk_appropriateness"), Some(0.0));
    let compliance = risky.results.iter().find(|r| r.metric == "portfolio_compliance").unwrap();
    let violations = compliance.detail["violations"].as_array().unwrap();
    assert!(violations.len() >= 2);
    let risk = risky.results.iter().find(|r| r.metric == "risk_appropriateness").unwrap();
    assert_eq!(risk.detail["status"], "too_aggressive");
}

#[tokio::test]
async fn test_judge_metrics_can_be_disabled() {
    let config = EvaluationConfig {
        judge: JudgeConfig { compliance_language: false, ..Default::default() },
        ..Default::default()
    };
    let case_runner = CaseRunner::try_new("advisor", Arc::new(advisor_executor()), config)
        .unwrap()
        .with_judge(Arc::new(PickyJudge));
    assert!(case_runner.has_judge());

    let report = SuiteRunner::new(case_runner).run(&advisor_suite()).await;
    let good = report.case("retirement").unwrap();
    assert!(good.results.iter().all(|r| r.metric != "compliance_language"));
    assert!(good.results.iter().all(|r| r.error.is_none()));
}

#[tokio::test]
async fn test_score_recorded_trace() {
    let runner = CaseRunner::new("unused", Arc::new(ScriptedExecutor::new()));
    let case = EvaluationCase::new("replay", "Check the logs")
        .with_expected_tool_calls(vec![ToolCall::new("check_device_logs")]);

    let report = runner.score_trace(&case, Trace::new(vec![], "Nothing to report")).await;
    assert_eq!(report.metric("trajectory_recall"), Some(0.0));
    assert_eq!(report.metric("tool_call_valid"), Some(0.0));
    assert_eq!(report.status, CaseStatus::Review);
}

#[tokio::test]
async fn test_suite_json_round_trip_shape() {
    let runner = SuiteRunner::new(CaseRunner::new("support_agent", Arc::new(support_executor())));
    let report = runner.run(&support_suite()).await;

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["suite_id"], "smart_home_support");
    assert_eq!(json["results"].as_array().unwrap().len(), 4);
    assert_eq!(json["results"][2]["status"], "error");
    assert!(json["results"][0]["expected_tool_calls"][0]["args"]["device_id"].is_string());
}
