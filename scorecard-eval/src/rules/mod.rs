//! Rule-based portfolio metrics
//!
//! Deterministic scorers over a recommendation snapshot and the client it
//! was made for. None of them consult the qualitative judge.

pub mod compliance;
pub mod diversification;
pub mod risk;

pub use compliance::{ComplianceResult, ComplianceScorer, PORTFOLIO_COMPLIANCE};
pub use diversification::{
    DIVERSIFICATION, DiversificationAnalysis, DiversificationResult, score_diversification,
};
pub use risk::{RISK_APPROPRIATENESS, RiskAssessment, RiskStatus, assess_risk};
