//! Evaluation case and trace definitions
//!
//! Cases are read-only inputs authored by humans; traces are what the agent
//! executor reports back for one run of a case.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EvalError, Result};

/// A suite of evaluation cases sharing an identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSuite {
    /// Unique identifier for this suite
    #[serde(alias = "eval_set_id")]
    pub suite_id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Description of what these cases cover
    #[serde(default)]
    pub description: String,
    /// Cases, scored in order
    #[serde(alias = "eval_cases")]
    pub cases: Vec<EvaluationCase>,
}

impl EvalSuite {
    /// Create an empty suite
    pub fn new(suite_id: &str) -> Self {
        Self {
            suite_id: suite_id.to_string(),
            name: String::new(),
            description: String::new(),
            cases: vec![],
        }
    }

    /// Append a case
    pub fn with_case(mut self, case: EvaluationCase) -> Self {
        self.cases.push(case);
        self
    }
}

/// A single tool invocation, either observed or expected
///
/// Calls are identified by position within a sequence; names may repeat. On
/// the expected side, `args` holds only the arguments that matter for
/// grading, and arguments left out are never penalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool/function name
    #[serde(alias = "tool_name")]
    pub name: String,
    /// Arguments passed to the tool
    #[serde(default, alias = "arguments")]
    pub args: Map<String, Value>,
}

/// An expected tool call; its `args` are the significant arguments
pub type ExpectedInvocation = ToolCall;

impl ToolCall {
    /// Create a call without arguments
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), args: Map::new() }
    }

    /// Add a single argument
    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Replace all arguments
    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.args = args;
        self
    }
}

/// What the agent did and said during one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Tool calls in the order they were made
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Final natural-language answer
    #[serde(default)]
    pub response: String,
}

impl Trace {
    /// Create a trace from its parts
    pub fn new(tool_calls: Vec<ToolCall>, response: impl Into<String>) -> Self {
        Self { tool_calls, response: response.into() }
    }

    /// Names of the tool calls, in order
    pub fn trajectory(&self) -> Vec<&str> {
        self.tool_calls.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A single evaluation case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationCase {
    /// Unique identifier for this case
    #[serde(alias = "eval_case_id")]
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: String,
    /// Query sent to the agent
    #[serde(default)]
    pub query: String,
    /// Tool calls the agent is expected to make, in order
    #[serde(default)]
    pub expected_tool_calls: Vec<ExpectedInvocation>,
    /// Keywords the final response should mention
    #[serde(default, alias = "expected_response_contains")]
    pub expected_keywords: Vec<String>,
    /// Structured recommendation produced for this case, if any
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
    /// Client the recommendation is for, if any
    #[serde(default)]
    pub client_context: Option<ClientContext>,
    /// Optional tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EvaluationCase {
    /// Create a case with an id and query
    pub fn new(id: &str, query: &str) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            description: String::new(),
            query: query.to_string(),
            expected_tool_calls: vec![],
            expected_keywords: vec![],
            recommendation: None,
            client_context: None,
            tags: vec![],
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the expected tool calls
    pub fn with_expected_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.expected_tool_calls = calls;
        self
    }

    /// Set the expected response keywords
    pub fn with_expected_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a recommendation snapshot and the client it was made for
    pub fn with_recommendation(
        mut self,
        recommendation: Recommendation,
        client: ClientContext,
    ) -> Self {
        self.recommendation = Some(recommendation);
        self.client_context = Some(client);
        self
    }

    /// Name to show in reports, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }

    /// Check the fields every case needs before it can be run
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(EvalError::InvalidCase("case has no id".to_string()));
        }
        if self.query.trim().is_empty() {
            return Err(EvalError::InvalidCase(format!("case '{}' has no query", self.id)));
        }
        Ok(())
    }

    /// Recommendation and client context, when both are present
    pub fn portfolio(&self) -> Option<(&Recommendation, &ClientContext)> {
        self.recommendation.as_ref().zip(self.client_context.as_ref())
    }
}

/// One position in a recommended portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol
    pub symbol: String,
    /// Asset class, if known
    #[serde(default)]
    pub asset_class: Option<String>,
    /// Share of the portfolio, in percent
    #[serde(default)]
    pub percentage: f64,
}

impl Holding {
    /// Create a holding without an asset class
    pub fn new(symbol: &str, percentage: f64) -> Self {
        Self { symbol: symbol.to_string(), asset_class: None, percentage }
    }

    /// Set the asset class
    pub fn with_asset_class(mut self, asset_class: &str) -> Self {
        self.asset_class = Some(asset_class.to_string());
        self
    }

    /// Asset class used for diversification, falling back to the symbol
    pub fn class_key(&self) -> &str {
        self.asset_class.as_deref().unwrap_or(&self.symbol)
    }
}

/// Structured recommendation snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Risk level on a 1-10 scale
    #[serde(default)]
    pub risk_score: u8,
    /// Recommended positions
    #[serde(default)]
    pub holdings: Vec<Holding>,
    /// Whether the required disclosures were included
    #[serde(default)]
    pub disclosure_included: bool,
}

/// Client information used for suitability checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientContext {
    /// Highest acceptable risk score
    #[serde(default = "default_max_risk_tolerance")]
    pub max_risk_tolerance: u8,
    /// Risk profile label (conservative, moderate, aggressive)
    #[serde(default = "default_risk_profile")]
    pub risk_profile: String,
    /// Years until the investment goal
    #[serde(default = "default_timeline_years")]
    pub timeline_years: u32,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            max_risk_tolerance: default_max_risk_tolerance(),
            risk_profile: default_risk_profile(),
            timeline_years: default_timeline_years(),
        }
    }
}

impl ClientContext {
    /// Create a context for a profile with the given tolerance and horizon
    pub fn new(risk_profile: &str, max_risk_tolerance: u8, timeline_years: u32) -> Self {
        Self { max_risk_tolerance, risk_profile: risk_profile.to_string(), timeline_years }
    }
}

fn default_max_risk_tolerance() -> u8 {
    7
}

fn default_risk_profile() -> String {
    "moderate".to_string()
}

fn default_timeline_years() -> u32 {
    10
}

/// Known client risk profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    /// Parse a profile label, ignoring case
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "conservative" => Some(Self::Conservative),
            "moderate" => Some(Self::Moderate),
            "aggressive" => Some(Self::Aggressive),
            _ => None,
        }
    }

    /// Acceptable risk range before horizon adjustments
    pub fn base_range(self) -> (u8, u8) {
        match self {
            Self::Conservative => (1, 4),
            Self::Moderate => (3, 7),
            Self::Aggressive => (5, 10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_with_eval_set_field_names() {
        let json = r#"{
            "eval_case_id": "device_offline",
            "name": "Device offline",
            "query": "My thermostat is offline",
            "expected_tool_calls": [
                {"tool_name": "check_device_logs", "args": {"device_id": "thermo-1"}}
            ],
            "expected_response_contains": ["restart", "wifi"]
        }"#;

        let case: EvaluationCase = serde_json::from_str(json).unwrap();
        assert_eq!(case.id, "device_offline");
        assert_eq!(case.expected_tool_calls[0].name, "check_device_logs");
        assert_eq!(case.expected_tool_calls[0].args["device_id"], "thermo-1");
        assert_eq!(case.expected_keywords, vec!["restart", "wifi"]);
        assert!(case.portfolio().is_none());
    }

    #[test]
    fn test_client_context_defaults() {
        let ctx: ClientContext = serde_json::from_str("{}").unwrap();
        assert_eq!(ctx.max_risk_tolerance, 7);
        assert_eq!(ctx.risk_profile, "moderate");
        assert_eq!(ctx.timeline_years, 10);
    }

    #[test]
    fn test_validate_rejects_missing_query() {
        let case = EvaluationCase::new("no_query", "   ");
        assert!(matches!(case.validate(), Err(EvalError::InvalidCase(_))));

        let case = EvaluationCase::new("", "hello");
        assert!(case.validate().is_err());

        assert!(EvaluationCase::new("ok", "hello").validate().is_ok());
    }

    #[test]
    fn test_holding_class_key_falls_back_to_symbol() {
        assert_eq!(Holding::new("VTI", 50.0).class_key(), "VTI");
        let classified = Holding::new("VTI", 50.0).with_asset_class("US Stocks");
        assert_eq!(classified.class_key(), "US Stocks");
    }

    #[test]
    fn test_risk_profile_labels() {
        assert_eq!(RiskProfile::from_label("Conservative"), Some(RiskProfile::Conservative));
        assert_eq!(RiskProfile::from_label("yolo"), None);
        assert_eq!(RiskProfile::Moderate.base_range(), (3, 7));
    }
}
