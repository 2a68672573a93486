//! Compliance checks for a portfolio recommendation

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ComplianceRules;
use crate::metric::MetricResult;
use crate::schema::{ClientContext, Recommendation};

pub const PORTFOLIO_COMPLIANCE: &str = "portfolio_compliance";

/// Score assigned when only warnings were raised
const WARNING_SCORE: f64 = 0.75;

/// Outcome of the compliance checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// 0.0 with violations, 0.75 with only warnings, otherwise 1.0
    pub score: f64,
    /// Whether no hard rule was violated
    pub compliant: bool,
    /// Hard failures
    pub violations: Vec<String>,
    /// Soft flags
    pub warnings: Vec<String>,
}

impl ComplianceResult {
    pub fn into_metric(self) -> MetricResult {
        MetricResult::computed(PORTFOLIO_COMPLIANCE, self.score).with_detail(json!({
            "compliant": self.compliant,
            "violations": self.violations,
            "warnings": self.warnings,
        }))
    }
}

/// Checks a recommendation against injected business rules
#[derive(Debug, Clone, Default)]
pub struct ComplianceScorer {
    rules: ComplianceRules,
}

impl ComplianceScorer {
    pub fn new(rules: ComplianceRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ComplianceRules {
        &self.rules
    }

    /// Run every rule, collecting violations and warnings
    pub fn score(
        &self,
        recommendation: &Recommendation,
        client: &ClientContext,
    ) -> ComplianceResult {
        let rules = &self.rules;
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if recommendation.risk_score > client.max_risk_tolerance {
            violations.push(format!(
                "Risk score ({}) exceeds client's max tolerance ({})",
                recommendation.risk_score, client.max_risk_tolerance
            ));
        }

        for holding in &recommendation.holdings {
            if holding.percentage > rules.concentration_limit {
                violations.push(format!(
                    "Concentration limit exceeded: {} at {}% (max {}%)",
                    holding.symbol, holding.percentage, rules.concentration_limit
                ));
            } else if holding.percentage > rules.concentration_warning {
                warnings.push(format!(
                    "Near concentration limit: {} at {}%",
                    holding.symbol, holding.percentage
                ));
            }
        }

        if !recommendation.disclosure_included {
            violations.push("Missing required disclosure statements".to_string());
        }

        if client.risk_profile.eq_ignore_ascii_case(&rules.restricted_profile) {
            for holding in &recommendation.holdings {
                if rules.high_risk_symbols.iter().any(|s| s == &holding.symbol) {
                    violations.push(format!(
                        "High-risk investment {} unsuitable for {} investor",
                        holding.symbol, rules.restricted_profile
                    ));
                }
            }
        }

        let total: f64 = recommendation.holdings.iter().map(|h| h.percentage).sum();
        if (total - 100.0).abs() > rules.allocation_tolerance {
            warnings.push(format!("Total allocation is {}%, should be 100%", total));
        }

        let score = if !violations.is_empty() {
            0.0
        } else if !warnings.is_empty() {
            WARNING_SCORE
        } else {
            1.0
        };

        ComplianceResult { score, compliant: violations.is_empty(), violations, warnings }
    }
}
