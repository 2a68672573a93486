//! Trajectory comparison
//!
//! Compares the ordered tool-call names an agent produced against the
//! expected sequence. Arguments are ignored here; see
//! [`arguments`](crate::arguments) for parameter matching.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::metric::{MetricResult, ratio};
use crate::schema::ToolCall;

pub const EXACT_MATCH: &str = "trajectory_exact_match";
pub const IN_ORDER_MATCH: &str = "trajectory_in_order_match";
pub const ANY_ORDER_MATCH: &str = "trajectory_any_order_match";
pub const PRECISION: &str = "trajectory_precision";
pub const RECALL: &str = "trajectory_recall";

/// Sequence-level scores for one trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryScores {
    /// 1.0 iff the name sequences are identical
    pub exact_match: f64,
    /// 1.0 iff expected is a subsequence of actual
    pub in_order_match: f64,
    /// 1.0 iff every expected name occurs somewhere in actual
    pub any_order_match: f64,
    /// Share of actual calls whose name was expected
    pub precision: f64,
    /// Share of expected calls whose name was observed
    pub recall: f64,
}

impl TrajectoryScores {
    fn uniform(score: f64) -> Self {
        Self {
            exact_match: score,
            in_order_match: score,
            any_order_match: score,
            precision: score,
            recall: score,
        }
    }

    /// Convert into one metric result per score
    pub fn into_metrics(self) -> Vec<MetricResult> {
        vec![
            MetricResult::computed(EXACT_MATCH, self.exact_match),
            MetricResult::computed(IN_ORDER_MATCH, self.in_order_match),
            MetricResult::computed(ANY_ORDER_MATCH, self.any_order_match),
            MetricResult::computed(PRECISION, self.precision),
            MetricResult::computed(RECALL, self.recall),
        ]
    }
}

/// Scorer for tool trajectory matching
#[derive(Debug, Clone, Copy, Default)]
pub struct TrajectoryScorer;

impl TrajectoryScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score the actual trajectory against the expected one
    ///
    /// An empty expectation scores 1.0 across the board; a non-empty
    /// expectation met by no calls at all scores 0.0. Precision and recall
    /// use set membership per call, so repeated names can be credited more
    /// than once.
    pub fn score(&self, expected: &[ToolCall], actual: &[ToolCall]) -> TrajectoryScores {
        if expected.is_empty() {
            return TrajectoryScores::uniform(1.0);
        }
        if actual.is_empty() {
            return TrajectoryScores::uniform(0.0);
        }

        let expected_names: Vec<&str> = expected.iter().map(|c| c.name.as_str()).collect();
        let actual_names: Vec<&str> = actual.iter().map(|c| c.name.as_str()).collect();
        let expected_set: HashSet<&str> = expected_names.iter().copied().collect();
        let actual_set: HashSet<&str> = actual_names.iter().copied().collect();

        let exact_match = if expected_names == actual_names { 1.0 } else { 0.0 };
        let in_order_match =
            if is_subsequence(&expected_names, &actual_names) { 1.0 } else { 0.0 };
        let any_order_match = if expected_set.is_subset(&actual_set) { 1.0 } else { 0.0 };

        let necessary = actual_names.iter().filter(|n| expected_set.contains(*n)).count();
        let completed = expected_names.iter().filter(|n| actual_set.contains(*n)).count();

        TrajectoryScores {
            exact_match,
            in_order_match,
            any_order_match,
            precision: ratio(necessary, actual_names.len(), 0.0),
            recall: ratio(completed, expected_names.len(), 0.0),
        }
    }
}

/// Walk `actual` once, advancing through `expected` on each matching name
fn is_subsequence(expected: &[&str], actual: &[&str]) -> bool {
    let mut next = 0;
    for name in actual {
        if next < expected.len() && *name == expected[next] {
            next += 1;
        }
    }
    next == expected.len()
}
