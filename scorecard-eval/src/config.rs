//! Evaluation configuration
//!
//! Thresholds and denylists are injected into the scorers through these
//! structs rather than read from process-wide constants.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Configuration shared by the case and suite runners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Business rules for the compliance scorer
    #[serde(default)]
    pub compliance: ComplianceRules,
    /// Qualitative judge settings
    #[serde(default)]
    pub judge: JudgeConfig,
    /// Maximum characters of the response kept in a case report
    #[serde(default = "default_preview_chars")]
    pub response_preview_chars: usize,
    /// Aggregate score at or above which a case passes
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Cases in flight for [`SuiteRunner::run_parallel`](crate::SuiteRunner::run_parallel)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            compliance: ComplianceRules::default(),
            judge: JudgeConfig::default(),
            response_preview_chars: default_preview_chars(),
            pass_threshold: default_pass_threshold(),
            concurrency: default_concurrency(),
        }
    }
}

impl EvaluationConfig {
    /// Create config with specific compliance rules
    pub fn with_rules(rules: ComplianceRules) -> Self {
        Self { compliance: rules, ..Default::default() }
    }

    /// Set the pass threshold
    pub fn with_pass_threshold(mut self, threshold: f64) -> Self {
        self.pass_threshold = threshold;
        self
    }

    /// Set the parallel concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Reject settings the scorers cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.pass_threshold) {
            return Err(EvalError::ConfigError(format!(
                "pass_threshold must be within [0, 1], got {}",
                self.pass_threshold
            )));
        }
        if self.concurrency == 0 {
            return Err(EvalError::ConfigError("concurrency must be at least 1".to_string()));
        }
        self.compliance.validate()?;
        self.judge.validate()
    }
}

/// Business rules checked by the compliance scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRules {
    /// Hard ceiling for a single position, in percent
    #[serde(default = "default_concentration_limit")]
    pub concentration_limit: f64,
    /// Positions above this (and at or below the limit) raise a warning
    #[serde(default = "default_concentration_warning")]
    pub concentration_warning: f64,
    /// Allowed absolute deviation of the allocation total from 100%
    #[serde(default = "default_allocation_tolerance")]
    pub allocation_tolerance: f64,
    /// Symbols unsuitable for the restricted profile
    #[serde(default = "default_high_risk_symbols")]
    pub high_risk_symbols: Vec<String>,
    /// Profile barred from holding high-risk symbols
    #[serde(default = "default_restricted_profile")]
    pub restricted_profile: String,
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            concentration_limit: default_concentration_limit(),
            concentration_warning: default_concentration_warning(),
            allocation_tolerance: default_allocation_tolerance(),
            high_risk_symbols: default_high_risk_symbols(),
            restricted_profile: default_restricted_profile(),
        }
    }
}

impl ComplianceRules {
    /// Replace the high-risk denylist
    pub fn with_high_risk_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.high_risk_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Set the concentration ceiling and warning band
    pub fn with_concentration(mut self, warning: f64, limit: f64) -> Self {
        self.concentration_warning = warning;
        self.concentration_limit = limit;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.concentration_warning > self.concentration_limit {
            return Err(EvalError::ConfigError(format!(
                "concentration_warning ({}) exceeds concentration_limit ({})",
                self.concentration_warning, self.concentration_limit
            )));
        }
        if self.allocation_tolerance < 0.0 {
            return Err(EvalError::ConfigError(
                "allocation_tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the qualitative judge adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Leading characters of the judge's reply searched for a rating
    #[serde(default = "default_scan_window")]
    pub scan_window: usize,
    /// Rating used when the reply contains no recognizable rating
    #[serde(default = "default_rating")]
    pub default_rating: f64,
    /// Run the helpfulness metric
    #[serde(default = "default_true")]
    pub helpfulness: bool,
    /// Run the compliance-language metric
    #[serde(default = "default_true")]
    pub compliance_language: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            scan_window: default_scan_window(),
            default_rating: default_rating(),
            helpfulness: true,
            compliance_language: true,
        }
    }
}

impl JudgeConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_rating) {
            return Err(EvalError::ConfigError(format!(
                "default_rating must be within [0, 1], got {}",
                self.default_rating
            )));
        }
        Ok(())
    }
}

fn default_preview_chars() -> usize {
    500
}

fn default_pass_threshold() -> f64 {
    0.7
}

fn default_concurrency() -> usize {
    4
}

fn default_concentration_limit() -> f64 {
    25.0
}

fn default_concentration_warning() -> f64 {
    20.0
}

fn default_allocation_tolerance() -> f64 {
    0.1
}

fn default_high_risk_symbols() -> Vec<String> {
    ["ARKK", "MEME", "SPAC"].iter().map(|s| s.to_string()).collect()
}

fn default_restricted_profile() -> String {
    "conservative".to_string()
}

fn default_scan_window() -> usize {
    20
}

fn default_rating() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: EvaluationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.response_preview_chars, 500);
        assert_eq!(config.pass_threshold, 0.7);
        assert_eq!(config.compliance.concentration_limit, 25.0);
        assert_eq!(config.compliance.high_risk_symbols, vec!["ARKK", "MEME", "SPAC"]);
        assert_eq!(config.judge.scan_window, 20);
        assert!(config.judge.helpfulness);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = EvaluationConfig::with_rules(
            ComplianceRules::default()
                .with_high_risk_symbols(["GME"])
                .with_concentration(15.0, 20.0),
        )
        .with_pass_threshold(0.8);

        assert_eq!(config.compliance.high_risk_symbols, vec!["GME"]);
        assert_eq!(config.compliance.concentration_limit, 20.0);
        assert_eq!(config.pass_threshold, 0.8);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(EvaluationConfig::default().with_pass_threshold(1.5).validate().is_err());
        assert!(EvaluationConfig::default().with_concurrency(0).validate().is_err());

        let inverted = ComplianceRules::default().with_concentration(30.0, 25.0);
        assert!(matches!(
            EvaluationConfig::with_rules(inverted).validate(),
            Err(EvalError::ConfigError(_))
        ));
    }
}
