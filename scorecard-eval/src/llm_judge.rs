//! Qualitative judge adapter
//!
//! Formats rubric prompts, delegates generation to an external
//! [`QualitativeJudge`], and reads a discrete rating back out of the reply.
//! The rating parse is a substring search over free text, so it lives here
//! and nowhere else.

use async_trait::async_trait;
use scorecard_telemetry::judge_call_span;
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;

use crate::config::JudgeConfig;
use crate::error::{EvalError, Result};
use crate::metric::{MetricMethod, MetricResult};

pub const HELPFULNESS: &str = "helpfulness";
pub const COMPLIANCE_LANGUAGE: &str = "compliance_language";

/// Ratings the judge may give, in the order they are searched for
pub const RATING_SCALE: [(&str, f64); 5] =
    [("1.0", 1.0), ("0.75", 0.75), ("0.5", 0.5), ("0.25", 0.25), ("0.0", 0.0)];

/// Text generator used as an evaluation judge
#[async_trait]
pub trait QualitativeJudge: Send + Sync {
    /// Produce free-form text for `prompt`
    ///
    /// Failures should be reported as
    /// [`EvalError::JudgeError`](crate::EvalError::JudgeError).
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Turns judge replies into metric results
#[derive(Clone)]
pub struct JudgeAdapter {
    judge: Arc<dyn QualitativeJudge>,
    config: JudgeConfig,
}

impl JudgeAdapter {
    /// Create an adapter with default settings
    pub fn new(judge: Arc<dyn QualitativeJudge>) -> Self {
        Self { judge, config: JudgeConfig::default() }
    }

    /// Create with custom config
    pub fn with_config(judge: Arc<dyn QualitativeJudge>, config: JudgeConfig) -> Self {
        Self { judge, config }
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }

    /// Rate how helpful `response` is as an answer to `query`
    pub async fn helpfulness(&self, query: &str, response: &str) -> MetricResult {
        self.rate(HELPFULNESS, &helpfulness_prompt(query, response)).await
    }

    /// Rate whether `response` carries the expected compliance language
    pub async fn compliance_language(&self, response: &str) -> MetricResult {
        self.rate(COMPLIANCE_LANGUAGE, &compliance_language_prompt(response)).await
    }

    /// Send `prompt` to the judge and parse the rating from its reply
    ///
    /// Never fails: a judge error becomes a result with no score and the
    /// error message attached.
    pub async fn rate(&self, metric: &str, prompt: &str) -> MetricResult {
        let reply = self.judge.generate(prompt).instrument(judge_call_span(metric)).await;

        match reply {
            Ok(text) => {
                let score = self.parse_rating(&text).unwrap_or(self.config.default_rating);
                tracing::debug!(metric, score, "judge rating parsed");
                MetricResult::scored(metric, score, MetricMethod::LlmAsJudge)
                    .with_detail(json!({ "reasoning": text }))
            }
            Err(e) => {
                tracing::warn!(metric, error = %e, "judge call failed");
                let message = match e {
                    EvalError::JudgeError(message) => message,
                    other => other.to_string(),
                };
                MetricResult::failed(metric, MetricMethod::LlmAsJudge, message)
            }
        }
    }

    /// Find the first rating literal in the leading characters of `text`
    pub fn parse_rating(&self, text: &str) -> Option<f64> {
        let head: String = text.chars().take(self.config.scan_window).collect();
        RATING_SCALE.iter().find(|(literal, _)| head.contains(literal)).map(|(_, score)| *score)
    }
}

const RATING_INSTRUCTIONS: &str = "Reply with the rating first, as exactly one of \
1.0, 0.75, 0.5, 0.25 or 0.0, then a short justification.\n\nRating:";

/// Prompt for the helpfulness rubric
pub fn helpfulness_prompt(query: &str, response: &str) -> String {
    format!(
        r#"You are grading how helpful a financial advisor's answer is.

User query:
{query}

Advisor answer:
{response}

A helpful answer:
1. Responds directly to what the user asked
2. Gives concrete, actionable recommendations or information
3. Takes the user's risk profile, horizon and goals into account
4. Is understandable without financial training
5. States the relevant risks

Rating scale:
- 1.0: addresses the query fully with actionable, personalized advice
- 0.75: addresses the query well with useful information
- 0.5: covers the basics but lacks depth or personalization
- 0.25: addresses only part of the query
- 0.0: misses the query or is misleading

{RATING_INSTRUCTIONS}"#
    )
}

/// Prompt for the compliance-language rubric
pub fn compliance_language_prompt(response: &str) -> String {
    format!(
        r#"You are checking a financial advisor's answer for required compliance language.

Advisor answer:
{response}

Required elements:
1. A risk disclaimer stating that investments can lose value
2. No promise or guarantee of returns
3. A recommendation to consult a qualified advisor
4. A statement that past performance does not predict future results

Rating scale:
- 1.0: all four elements present
- 0.75: three elements present
- 0.5: two elements present
- 0.25: one element present
- 0.0: none present

{RATING_INSTRUCTIONS}"#
    )
}
