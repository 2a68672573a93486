//! Tool-call argument matching
//!
//! Each expected call is paired with the first actual call of the same name.
//! Pairing does not consume the actual call: two expected calls with the same
//! name both pair with the earliest actual call of that name, even when a
//! later call of that name carries the arguments the second one wanted.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;

use crate::metric::{MetricResult, ratio};
use crate::schema::ToolCall;

pub const TOOL_CALL_VALID: &str = "tool_call_valid";
pub const TOOL_NAME_MATCH: &str = "tool_name_match";
pub const PARAMETER_KEY_MATCH: &str = "tool_parameter_key_match";
pub const PARAMETER_KV_MATCH: &str = "tool_parameter_kv_match";

/// How one expected call fared against the actual calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMatch {
    /// Name of the expected tool
    pub expected_name: String,
    /// Index of the paired actual call, if any
    pub matched_index: Option<usize>,
    /// Share of expected argument keys present on the paired call
    pub key_score: f64,
    /// Share of expected arguments present with an equal value
    pub kv_score: f64,
    /// Expected keys absent from the paired call
    #[serde(default)]
    pub missing_keys: Vec<String>,
    /// Expected keys present with a different value
    #[serde(default)]
    pub mismatched_keys: Vec<String>,
}

/// Aggregated argument scores for one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentScores {
    /// Liveness flag: 1.0 once a comparison was attempted
    pub tool_call_valid: f64,
    /// Share of expected calls whose name occurs among the actual calls
    pub tool_name_match: f64,
    /// Mean per-call key score
    pub parameter_key_match: f64,
    /// Mean per-call key-value score
    pub parameter_kv_match: f64,
    /// Per-call breakdown, in expected order
    #[serde(default)]
    pub calls: Vec<CallMatch>,
}

impl ArgumentScores {
    fn uniform(score: f64) -> Self {
        Self {
            tool_call_valid: score,
            tool_name_match: score,
            parameter_key_match: score,
            parameter_kv_match: score,
            calls: vec![],
        }
    }

    /// Convert into metric results; the per-call breakdown rides on the
    /// key-value metric
    pub fn into_metrics(self) -> Vec<MetricResult> {
        let detail =
            if self.calls.is_empty() { Value::Null } else { json!({ "calls": self.calls }) };
        vec![
            MetricResult::computed(TOOL_CALL_VALID, self.tool_call_valid),
            MetricResult::computed(TOOL_NAME_MATCH, self.tool_name_match),
            MetricResult::computed(PARAMETER_KEY_MATCH, self.parameter_key_match),
            MetricResult::computed(PARAMETER_KV_MATCH, self.parameter_kv_match).with_detail(detail),
        ]
    }
}

/// Scorer for tool names and arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentMatcher;

impl ArgumentMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Score the actual calls' arguments against the expected ones
    pub fn score(&self, expected: &[ToolCall], actual: &[ToolCall]) -> ArgumentScores {
        if expected.is_empty() {
            return ArgumentScores::uniform(1.0);
        }
        if actual.is_empty() {
            return ArgumentScores::uniform(0.0);
        }

        let actual_names: HashSet<&str> = actual.iter().map(|c| c.name.as_str()).collect();
        let name_matches =
            expected.iter().filter(|c| actual_names.contains(c.name.as_str())).count();

        let calls: Vec<CallMatch> =
            expected.iter().map(|exp| self.match_call(exp, actual)).collect();
        let count = calls.len() as f64;
        let parameter_key_match = calls.iter().map(|c| c.key_score).sum::<f64>() / count;
        let parameter_kv_match = calls.iter().map(|c| c.kv_score).sum::<f64>() / count;

        ArgumentScores {
            tool_call_valid: 1.0,
            tool_name_match: ratio(name_matches, expected.len(), 0.0),
            parameter_key_match,
            parameter_kv_match,
            calls,
        }
    }

    /// Pair one expected call with the first same-named actual call
    pub fn match_call(&self, expected: &ToolCall, actual: &[ToolCall]) -> CallMatch {
        let Some((index, paired)) = actual.iter().enumerate().find(|(_, a)| a.name == expected.name)
        else {
            // Without constraints there is nothing to get wrong; the missing
            // name is already charged to tool_name_match
            let unpaired = if expected.args.is_empty() { 1.0 } else { 0.0 };
            return CallMatch {
                expected_name: expected.name.clone(),
                matched_index: None,
                key_score: unpaired,
                kv_score: unpaired,
                missing_keys: expected.args.keys().cloned().collect(),
                mismatched_keys: vec![],
            };
        };

        let mut missing_keys = Vec::new();
        let mut mismatched_keys = Vec::new();
        let mut key_hits = 0;
        let mut kv_hits = 0;

        for (key, want) in &expected.args {
            match paired.args.get(key) {
                Some(got) => {
                    key_hits += 1;
                    if values_match(want, got) {
                        kv_hits += 1;
                    } else {
                        mismatched_keys.push(key.clone());
                    }
                }
                None => missing_keys.push(key.clone()),
            }
        }

        let total = expected.args.len();
        CallMatch {
            expected_name: expected.name.clone(),
            matched_index: Some(index),
            key_score: ratio(key_hits, total, 1.0),
            kv_score: ratio(kv_hits, total, 1.0),
            missing_keys,
            mismatched_keys,
        }
    }
}

/// Compare printed forms case-insensitively, so `"NYC"` matches `"nyc"` and
/// the string `"3"` matches the number `3`
fn values_match(expected: &Value, actual: &Value) -> bool {
    printed(expected).to_lowercase() == printed(actual).to_lowercase()
}

fn printed(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_arguments() {
        let expected = vec![ToolCall::new("get_weather").with_arg("location", "NYC")];
        let actual =
            vec![ToolCall::new("get_weather").with_arg("location", "NYC").with_arg("unit", "c")];

        let scores = ArgumentMatcher::new().score(&expected, &actual);
        assert_eq!(scores.tool_call_valid, 1.0);
        assert_eq!(scores.tool_name_match, 1.0);
        assert_eq!(scores.parameter_key_match, 1.0);
        assert_eq!(scores.parameter_kv_match, 1.0);
        assert_eq!(scores.calls[0].matched_index, Some(0));
    }

    #[test]
    fn test_values_compare_case_insensitively_by_printed_form() {
        let expected = vec![ToolCall::new("book").with_arg("city", "nyc").with_arg("nights", "3")];
        let actual = vec![ToolCall::new("book").with_arg("city", "NYC").with_arg("nights", 3)];

        let scores = ArgumentMatcher::new().score(&expected, &actual);
        assert_eq!(scores.parameter_kv_match, 1.0);
    }

    #[test]
    fn test_wrong_value_and_missing_key() {
        let expected =
            vec![ToolCall::new("get_weather").with_arg("location", "NYC").with_arg("days", 3)];
        let actual = vec![ToolCall::new("get_weather").with_arg("location", "LA")];

        let scores = ArgumentMatcher::new().score(&expected, &actual);
        assert_eq!(scores.parameter_key_match, 0.5);
        assert_eq!(scores.parameter_kv_match, 0.0);
        assert_eq!(scores.calls[0].missing_keys, vec!["days"]);
        assert_eq!(scores.calls[0].mismatched_keys, vec!["location"]);
    }

    #[test]
    fn test_unmatched_calls() {
        // Constrained and unmatched contributes 0.0; unconstrained and
        // unmatched contributes 1.0
        let expected = vec![
            ToolCall::new("lookup").with_arg("id", 7),
            ToolCall::new("notify"),
            ToolCall::new("log"),
        ];
        let actual = vec![ToolCall::new("log")];

        let scores = ArgumentMatcher::new().score(&expected, &actual);
        assert!((scores.tool_name_match - 1.0 / 3.0).abs() < 1e-9);
        assert!((scores.parameter_key_match - 2.0 / 3.0).abs() < 1e-9);
        assert!((scores.parameter_kv_match - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(scores.calls[0].matched_index, None);
        assert_eq!(scores.calls[1].key_score, 1.0);
        assert_eq!(scores.calls[0].missing_keys, vec!["id"]);
    }

    #[test]
    fn test_unconstrained_matched_call_scores_full() {
        let expected = vec![ToolCall::new("ping")];
        let actual = vec![ToolCall::new("ping").with_arg("host", "a")];
        let scores = ArgumentMatcher::new().score(&expected, &actual);
        assert_eq!(scores.parameter_key_match, 1.0);
        assert_eq!(scores.parameter_kv_match, 1.0);
    }

    #[test]
    fn test_duplicate_expected_names_pair_with_first_actual() {
        let expected = vec![
            ToolCall::new("search").with_arg("q", "alpha"),
            ToolCall::new("search").with_arg("q", "beta"),
        ];
        let actual = vec![
            ToolCall::new("search").with_arg("q", "alpha"),
            ToolCall::new("search").with_arg("q", "beta"),
        ];

        let scores = ArgumentMatcher::new().score(&expected, &actual);
        assert_eq!(scores.calls[0].matched_index, Some(0));
        assert_eq!(scores.calls[1].matched_index, Some(0));
        assert_eq!(scores.parameter_key_match, 1.0);
        assert_eq!(scores.parameter_kv_match, 0.5);
    }

    #[test]
    fn test_empty_edges() {
        let matcher = ArgumentMatcher::new();
        let one = vec![ToolCall::new("a")];
        assert_eq!(matcher.score(&[], &one).parameter_kv_match, 1.0);
        let none = matcher.score(&one, &[]);
        assert_eq!(none.tool_call_valid, 0.0);
        assert_eq!(none.tool_name_match, 0.0);
    }

    #[test]
    fn test_into_metrics_carries_breakdown() {
        let expected = vec![ToolCall::new("a").with_arg("k", 1)];
        let metrics = ArgumentMatcher::new().score(&expected, &expected.clone()).into_metrics();
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[3].metric, PARAMETER_KV_MATCH);
        assert_eq!(metrics[3].detail["calls"][0]["expected_name"], "a");
    }
}
