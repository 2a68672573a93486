//! Risk appropriateness for a client profile and horizon

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::metric::{MetricResult, round2};
use crate::schema::RiskProfile;

pub const RISK_APPROPRIATENESS: &str = "risk_appropriateness";

/// Range used when the profile label is not recognized
const PERMISSIVE_RANGE: (u8, u8) = (1, 10);
/// Horizons shorter than this cap the upper bound
const SHORT_HORIZON_YEARS: u32 = 5;
/// Upper bound for short horizons
const SHORT_HORIZON_CAP: u8 = 5;
/// Horizons longer than this relax the lower bound
const LONG_HORIZON_YEARS: u32 = 20;
/// Score for a recommendation below the acceptable range
const UNDER_RISK_SCORE: f64 = 0.75;
/// Score lost per point above the acceptable range
const OVER_RISK_PENALTY: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    Appropriate,
    TooConservative,
    TooAggressive,
}

impl RiskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appropriate => "appropriate",
            Self::TooConservative => "too_conservative",
            Self::TooAggressive => "too_aggressive",
        }
    }
}

/// Outcome of a risk appropriateness check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub status: RiskStatus,
    pub recommendation_risk: u8,
    /// Inclusive acceptable range after horizon adjustments
    pub acceptable_range: (u8, u8),
    pub client_profile: String,
    pub timeline_years: u32,
}

impl RiskAssessment {
    pub fn into_metric(self) -> MetricResult {
        let (min, max) = self.acceptable_range;
        MetricResult::computed(RISK_APPROPRIATENESS, self.score).with_detail(json!({
            "status": self.status,
            "recommendation_risk": self.recommendation_risk,
            "acceptable_range": format!("{}-{}", min, max),
            "client_profile": self.client_profile,
            "timeline_years": self.timeline_years,
        }))
    }
}

/// Acceptable risk range for a profile label and horizon
pub fn acceptable_range(profile: &str, timeline_years: u32) -> (u8, u8) {
    let (mut min, mut max) =
        RiskProfile::from_label(profile).map(RiskProfile::base_range).unwrap_or(PERMISSIVE_RANGE);

    if timeline_years < SHORT_HORIZON_YEARS {
        max = max.min(SHORT_HORIZON_CAP);
    } else if timeline_years > LONG_HORIZON_YEARS {
        min = min.saturating_sub(1).max(1);
    }
    (min, max)
}

/// Compare a recommendation's risk level against what the client can bear
///
/// Under-risking is penalized less than over-risking: anything below the
/// range scores 0.75, while each point above it costs 0.25.
pub fn assess_risk(risk: u8, profile: &str, timeline_years: u32) -> RiskAssessment {
    let (min, max) = acceptable_range(profile, timeline_years);

    let (score, status) = if (min..=max).contains(&risk) {
        (1.0, RiskStatus::Appropriate)
    } else if risk < min {
        (UNDER_RISK_SCORE, RiskStatus::TooConservative)
    } else {
        let overage = f64::from(risk - max);
        ((1.0 - OVER_RISK_PENALTY * overage).max(0.0), RiskStatus::TooAggressive)
    };

    RiskAssessment {
        score: round2(score),
        status,
        recommendation_risk: risk,
        acceptable_range: (min, max),
        client_profile: profile.to_string(),
        timeline_years,
    }
}
