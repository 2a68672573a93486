//! Per-metric results and their aggregation

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a metric was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMethod {
    /// Deterministic, code-defined scoring
    ComputationBased,
    /// Rating produced by the qualitative judge
    LlmAsJudge,
}

/// Outcome of a single metric for a single case
///
/// `score` is `None` only when the metric could not be computed, in which
/// case `error` says why. A `None` score is never treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Metric key, e.g. `trajectory_recall`
    pub metric: String,
    /// Score in [0, 1], or `None` on error
    pub score: Option<f64>,
    /// How the score was produced
    pub method: MetricMethod,
    /// Free-form supporting detail
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub detail: Value,
    /// Error captured verbatim when the metric failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricResult {
    /// Create a computed result, clamping the score into [0, 1]
    pub fn scored(metric: &str, score: f64, method: MetricMethod) -> Self {
        Self {
            metric: metric.to_string(),
            score: Some(clamp_unit(score)),
            method,
            detail: Value::Null,
            error: None,
        }
    }

    /// Create a computation-based result
    pub fn computed(metric: &str, score: f64) -> Self {
        Self::scored(metric, score, MetricMethod::ComputationBased)
    }

    /// Create a failed result
    pub fn failed(metric: &str, method: MetricMethod, error: impl Into<String>) -> Self {
        Self {
            metric: metric.to_string(),
            score: None,
            method,
            detail: Value::Null,
            error: Some(error.into()),
        }
    }

    /// Attach supporting detail
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = detail;
        self
    }

    /// Whether a numeric score was produced
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Mean of all numeric scores, ignoring failed metrics
///
/// Returns 0.0 when no metric produced a score.
pub fn aggregate_score(results: &[MetricResult]) -> f64 {
    let scores: Vec<f64> = results.iter().filter_map(|r| r.score).collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Round to two decimal places for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Ratio with an explicit value for an empty denominator
pub(crate) fn ratio(numerator: usize, denominator: usize, when_empty: f64) -> f64 {
    if denominator == 0 { when_empty } else { numerator as f64 / denominator as f64 }
}
