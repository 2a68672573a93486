//! Case and suite runners
//!
//! The [`CaseRunner`] obtains one trace per case and applies every scorer
//! that has the data it needs. The [`SuiteRunner`] runs cases one after
//! another and averages their metrics once all of them are done.

use futures::StreamExt;
use scorecard_telemetry::{case_run_span, executor_call_span, suite_run_span};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::arguments::ArgumentMatcher;
use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::executor::AgentExecutor;
use crate::llm_judge::{JudgeAdapter, QualitativeJudge};
use crate::metric::MetricResult;
use crate::report::{CaseReport, SuiteReport};
use crate::rules::{ComplianceScorer, assess_risk, score_diversification};
use crate::schema::{EvalSuite, EvaluationCase, Trace};
use crate::scoring::ResponseScorer;
use crate::trajectory::TrajectoryScorer;

/// Drives a single evaluation case end to end
pub struct CaseRunner {
    agent_name: String,
    executor: Arc<dyn AgentExecutor>,
    judge: Option<JudgeAdapter>,
    config: EvaluationConfig,
    trajectory_scorer: TrajectoryScorer,
    argument_matcher: ArgumentMatcher,
    response_scorer: ResponseScorer,
    compliance_scorer: ComplianceScorer,
}

impl CaseRunner {
    /// Create a runner with default configuration
    pub fn new(agent_name: &str, executor: Arc<dyn AgentExecutor>) -> Self {
        Self::build(agent_name, executor, EvaluationConfig::default())
    }

    /// Create a runner with custom configuration, validating it first
    pub fn try_new(
        agent_name: &str,
        executor: Arc<dyn AgentExecutor>,
        config: EvaluationConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(agent_name, executor, config))
    }

    fn build(agent_name: &str, executor: Arc<dyn AgentExecutor>, config: EvaluationConfig) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            executor,
            judge: None,
            compliance_scorer: ComplianceScorer::new(config.compliance.clone()),
            config,
            trajectory_scorer: TrajectoryScorer::new(),
            argument_matcher: ArgumentMatcher::new(),
            response_scorer: ResponseScorer::new(),
        }
    }

    /// Attach a qualitative judge for the judge-based metrics
    pub fn with_judge(mut self, judge: Arc<dyn QualitativeJudge>) -> Self {
        self.judge = Some(JudgeAdapter::with_config(judge, self.config.judge.clone()));
        self
    }

    /// Check if a qualitative judge is attached
    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Run one case against the agent and score the resulting trace
    ///
    /// Never fails: a malformed case or an executor error yields a report
    /// with status `error` and no metrics.
    pub async fn run(&self, case: &EvaluationCase) -> CaseReport {
        let span = case_run_span(&case.id);
        async {
            let start = Instant::now();

            if let Some(report) = self.reject_malformed(case, start) {
                return report;
            }

            let trace = self
                .executor
                .execute(&self.agent_name, &case.query)
                .instrument(executor_call_span(&self.agent_name))
                .await;

            match trace {
                Ok(trace) => self.finish(case, trace, start).await,
                Err(e) => {
                    tracing::warn!(error = %e, "agent executor failed");
                    self.errored(case, e.to_string(), start)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Score an already recorded trace without calling the executor
    pub async fn score_trace(&self, case: &EvaluationCase, trace: Trace) -> CaseReport {
        async {
            let start = Instant::now();
            match self.reject_malformed(case, start) {
                Some(report) => report,
                None => self.finish(case, trace, start).await,
            }
        }
        .instrument(case_run_span(&case.id))
        .await
    }

    fn reject_malformed(&self, case: &EvaluationCase, start: Instant) -> Option<CaseReport> {
        let e = case.validate().err()?;
        tracing::warn!(error = %e, "skipping malformed case");
        Some(self.errored(case, e.to_string(), start))
    }

    async fn finish(&self, case: &EvaluationCase, trace: Trace, start: Instant) -> CaseReport {
        let results = self.score(case, &trace).await;
        let response: String =
            trace.response.chars().take(self.config.response_preview_chars).collect();

        let report = CaseReport::scored(
            &case.id,
            case.display_name(),
            &case.query,
            response,
            case.expected_tool_calls.clone(),
            trace.tool_calls,
            results,
            self.config.pass_threshold,
            start.elapsed(),
        );

        tracing::info!(
            aggregate = report.aggregate_score,
            metrics = report.metrics.len(),
            status = ?report.status,
            "case scored"
        );
        report
    }

    fn errored(&self, case: &EvaluationCase, error: String, start: Instant) -> CaseReport {
        CaseReport::errored(
            &case.id,
            case.display_name(),
            &case.query,
            case.expected_tool_calls.clone(),
            error,
            start.elapsed(),
        )
    }

    /// Apply every scorer whose inputs are available
    async fn score(&self, case: &EvaluationCase, trace: &Trace) -> Vec<MetricResult> {
        let mut results = Vec::new();

        let expected = &case.expected_tool_calls;
        results.extend(self.trajectory_scorer.score(expected, &trace.tool_calls).into_metrics());
        results.extend(self.argument_matcher.score(expected, &trace.tool_calls).into_metrics());
        results.push(
            self.response_scorer.score(&case.expected_keywords, &trace.response).into_metric(),
        );

        if let Some(judge) = &self.judge {
            if judge.config().helpfulness {
                results.push(judge.helpfulness(&case.query, &trace.response).await);
            }
            if judge.config().compliance_language {
                results.push(judge.compliance_language(&trace.response).await);
            }
        }

        if let Some((recommendation, client)) = case.portfolio() {
            results.push(self.compliance_scorer.score(recommendation, client).into_metric());
            results.push(score_diversification(&recommendation.holdings).into_metric());
            results.push(
                assess_risk(recommendation.risk_score, &client.risk_profile, client.timeline_years)
                    .into_metric(),
            );
        }

        for result in &results {
            tracing::debug!(metric = %result.metric, score = ?result.score, "metric computed");
        }
        results
    }
}

/// Runs every case of a suite and aggregates the results
pub struct SuiteRunner {
    case_runner: CaseRunner,
}

impl SuiteRunner {
    pub fn new(case_runner: CaseRunner) -> Self {
        Self { case_runner }
    }

    pub fn case_runner(&self) -> &CaseRunner {
        &self.case_runner
    }

    /// Run cases strictly one after another
    pub async fn run(&self, suite: &EvalSuite) -> SuiteReport {
        let run_id = new_run_id(suite);
        async {
            tracing::info!(cases = suite.cases.len(), "suite started");

            let mut results = Vec::with_capacity(suite.cases.len());
            for case in &suite.cases {
                results.push(self.case_runner.run(case).await);
            }

            self.complete(suite, &run_id, results)
        }
        .instrument(suite_run_span(&suite.suite_id, &run_id))
        .await
    }

    /// Run up to `concurrency` cases at a time
    ///
    /// Reports keep suite order, and averaging waits for every case.
    pub async fn run_parallel(&self, suite: &EvalSuite) -> SuiteReport {
        let run_id = new_run_id(suite);
        let concurrency = self.case_runner.config.concurrency.max(1);
        async {
            tracing::info!(cases = suite.cases.len(), concurrency, "parallel suite started");

            let results: Vec<CaseReport> = futures::stream::iter(&suite.cases)
                .map(|case| self.case_runner.run(case))
                .buffered(concurrency)
                .collect()
                .await;

            self.complete(suite, &run_id, results)
        }
        .instrument(suite_run_span(&suite.suite_id, &run_id))
        .await
    }

    fn complete(&self, suite: &EvalSuite, run_id: &str, results: Vec<CaseReport>) -> SuiteReport {
        let report = SuiteReport::new(&suite.suite_id, run_id, results);
        tracing::info!(
            total = report.summary.total,
            errored = report.summary.errored,
            average = report.summary.average_aggregate_score,
            "suite finished"
        );
        report
    }
}

fn new_run_id(suite: &EvalSuite) -> String {
    format!("{}_{}", suite.suite_id, uuid::Uuid::new_v4())
}
