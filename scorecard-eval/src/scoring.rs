//! Response content scoring

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::metric::{MetricResult, ratio};

pub const RESPONSE_KEYWORD_MATCH: &str = "response_keyword_match";

/// Keyword coverage of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Share of expected keywords found
    pub score: f64,
    /// Keywords found in the response
    pub found: Vec<String>,
    /// Keywords absent from the response
    pub missing: Vec<String>,
}

impl KeywordMatch {
    pub fn into_metric(self) -> MetricResult {
        MetricResult::computed(RESPONSE_KEYWORD_MATCH, self.score)
            .with_detail(json!({ "found": self.found, "missing": self.missing }))
    }
}

/// Scorer for literal keyword presence in the final response
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseScorer;

impl ResponseScorer {
    pub fn new() -> Self {
        Self
    }

    /// Fraction of keywords found as case-insensitive substrings of `response`
    ///
    /// No keywords means nothing was required, which scores 1.0.
    pub fn score(&self, keywords: &[String], response: &str) -> KeywordMatch {
        let haystack = response.to_lowercase();
        let (found, missing): (Vec<String>, Vec<String>) =
            keywords.iter().cloned().partition(|k| haystack.contains(&k.to_lowercase()));

        KeywordMatch { score: ratio(found.len(), keywords.len(), 1.0), found, missing }
    }
}
