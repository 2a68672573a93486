//! Evaluation reports
//!
//! A [`CaseReport`] per case, folded into one [`SuiteReport`] once every
//! case has finished.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::metric::{MetricResult, aggregate_score, round2};
use crate::schema::ToolCall;

/// Outcome class of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Aggregate at or above the pass threshold
    Pass,
    /// Aggregate below the pass threshold
    Review,
    /// No metrics were computed
    Error,
}

/// Result for a single evaluation case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case identifier
    pub case_id: String,
    /// Display name
    pub name: String,
    /// Query sent to the agent
    pub query: String,
    /// Final response, truncated for display
    pub response: String,
    /// Tool calls the case expected
    pub expected_tool_calls: Vec<ToolCall>,
    /// Tool calls the agent made
    pub actual_tool_calls: Vec<ToolCall>,
    /// Every metric attempted, including failed ones
    pub results: Vec<MetricResult>,
    /// Numeric scores by metric key; failed metrics are absent
    pub metrics: BTreeMap<String, f64>,
    /// Mean of the numeric scores, rounded to two decimals
    pub aggregate_score: f64,
    pub status: CaseStatus,
    /// Case-level error, when the case could not be scored at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Time spent on the case, executor call included
    pub duration: Duration,
}

impl CaseReport {
    /// Build a report from scored metrics
    #[allow(clippy::too_many_arguments)]
    pub fn scored(
        case_id: &str,
        name: &str,
        query: &str,
        response: String,
        expected_tool_calls: Vec<ToolCall>,
        actual_tool_calls: Vec<ToolCall>,
        results: Vec<MetricResult>,
        pass_threshold: f64,
        duration: Duration,
    ) -> Self {
        let metrics: BTreeMap<String, f64> =
            results.iter().filter_map(|r| r.score.map(|s| (r.metric.clone(), s))).collect();
        let aggregate = round2(aggregate_score(&results));
        let status =
            if aggregate >= pass_threshold { CaseStatus::Pass } else { CaseStatus::Review };

        Self {
            case_id: case_id.to_string(),
            name: name.to_string(),
            query: query.to_string(),
            response,
            expected_tool_calls,
            actual_tool_calls,
            results,
            metrics,
            aggregate_score: aggregate,
            status,
            error: None,
            duration,
        }
    }

    /// Build a report for a case that produced no metrics
    pub fn errored(
        case_id: &str,
        name: &str,
        query: &str,
        expected_tool_calls: Vec<ToolCall>,
        error: String,
        duration: Duration,
    ) -> Self {
        Self {
            case_id: case_id.to_string(),
            name: name.to_string(),
            query: query.to_string(),
            response: String::new(),
            expected_tool_calls,
            actual_tool_calls: vec![],
            results: vec![],
            metrics: BTreeMap::new(),
            aggregate_score: 0.0,
            status: CaseStatus::Error,
            error: Some(error),
            duration,
        }
    }

    /// Whether the case produced metrics
    pub fn is_success(&self) -> bool {
        self.status != CaseStatus::Error
    }

    /// Look up a numeric metric score
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }
}

/// Summary statistics for a suite run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Number of cases
    pub total: usize,
    /// Cases that produced metrics
    pub succeeded: usize,
    /// Cases recorded as errors
    pub errored: usize,
    /// Cases at or above the pass threshold
    pub passed: usize,
    /// Mean aggregate score over successful cases
    pub average_aggregate_score: f64,
}

impl SuiteSummary {
    /// Calculate summary from case reports
    pub fn from_results(results: &[CaseReport]) -> Self {
        let total = results.len();
        let succeeded: Vec<&CaseReport> = results.iter().filter(|r| r.is_success()).collect();
        let passed = succeeded.iter().filter(|r| r.status == CaseStatus::Pass).count();
        let average_aggregate_score = if succeeded.is_empty() {
            0.0
        } else {
            let total: f64 = succeeded.iter().map(|r| r.aggregate_score).sum();
            round2(total / succeeded.len() as f64)
        };

        Self {
            total,
            succeeded: succeeded.len(),
            errored: total - succeeded.len(),
            passed,
            average_aggregate_score,
        }
    }
}

/// Per-metric mean over the cases that reported each metric
///
/// A case lacking a metric is left out of that metric's mean rather than
/// counted as zero.
pub fn average_metrics(results: &[CaseReport]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for report in results.iter().filter(|r| r.is_success()) {
        for (metric, score) in &report.metrics {
            let entry = sums.entry(metric.clone()).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }
    }
    sums.into_iter().map(|(k, (sum, count))| (k, sum / count as f64)).collect()
}

/// Complete report for a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite identifier
    pub suite_id: String,
    /// Unique identifier for this run
    pub run_id: String,
    /// When the run completed
    pub timestamp: DateTime<Utc>,
    /// Mean score per metric across cases
    pub aggregate_metrics: BTreeMap<String, f64>,
    /// Results for each case, in suite order
    pub results: Vec<CaseReport>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    /// Build a report once every case has finished
    pub fn new(suite_id: &str, run_id: &str, results: Vec<CaseReport>) -> Self {
        Self {
            suite_id: suite_id.to_string(),
            run_id: run_id.to_string(),
            timestamp: Utc::now(),
            aggregate_metrics: average_metrics(&results),
            summary: SuiteSummary::from_results(&results),
            results,
        }
    }

    /// Cases that need attention: below threshold or errored
    pub fn failures(&self) -> Vec<&CaseReport> {
        self.results.iter().filter(|r| r.status != CaseStatus::Pass).collect()
    }

    /// Find a case report by id
    pub fn case(&self, case_id: &str) -> Option<&CaseReport> {
        self.results.iter().find(|r| r.case_id == case_id)
    }

    /// Format as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Evaluation Report: {} ({})\n", self.suite_id, self.run_id));
        output.push_str(&format!("Timestamp: {}\n", self.timestamp.to_rfc3339()));
        output.push_str("\nSummary:\n");
        output.push_str(&format!("  Total: {}\n", self.summary.total));
        output.push_str(&format!("  Succeeded: {}\n", self.summary.succeeded));
        output.push_str(&format!("  Errored: {}\n", self.summary.errored));
        output.push_str(&format!("  Passed: {}\n", self.summary.passed));
        output.push_str(&format!(
            "  Average Aggregate Score: {:.2}\n",
            self.summary.average_aggregate_score
        ));

        if !self.aggregate_metrics.is_empty() {
            output.push_str("\nAverage Metrics:\n");
            for (metric, score) in &self.aggregate_metrics {
                output.push_str(&format!("  {}: {:.2}%\n", metric, score * 100.0));
            }
        }

        output.push_str("\nCases:\n");
        for report in &self.results {
            match (&report.status, &report.error) {
                (CaseStatus::Error, Some(error)) => {
                    output.push_str(&format!("  [ERROR] {}: {}\n", report.name, error));
                }
                (status, _) => {
                    let label = if *status == CaseStatus::Pass { "PASS" } else { "REVIEW" };
                    output.push_str(&format!(
                        "  [{}] {}: {:.2}\n",
                        label, report.name, report.aggregate_score
                    ));
                }
            }
        }

        output
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
