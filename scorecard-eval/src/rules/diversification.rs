//! Structural diversification score over a holdings list

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

use crate::metric::{MetricResult, clamp_unit, round2};
use crate::schema::Holding;

pub const DIVERSIFICATION: &str = "diversification";

/// Asset classes at which the asset-class score saturates
const IDEAL_ASSET_CLASSES: f64 = 4.0;
/// Holdings at which the holdings score saturates
const IDEAL_HOLDINGS: f64 = 5.0;
/// Largest position that carries no concentration penalty, in percent
const UNPENALIZED_POSITION: f64 = 25.0;

/// Breakdown behind a diversification score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationAnalysis {
    pub num_asset_classes: usize,
    pub num_holdings: usize,
    pub max_single_position: f64,
    pub asset_class_score: f64,
    pub concentration_score: f64,
    pub holdings_score: f64,
}

/// Diversification score and, when holdings exist, its breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationResult {
    /// Mean of the three sub-scores, rounded to two decimals
    pub score: f64,
    /// `None` when there were no holdings to analyze
    pub analysis: Option<DiversificationAnalysis>,
}

impl DiversificationResult {
    pub fn into_metric(self) -> MetricResult {
        let detail = match &self.analysis {
            Some(analysis) => json!({ "analysis": analysis }),
            None => json!({ "analysis": "No holdings provided" }),
        };
        MetricResult::computed(DIVERSIFICATION, self.score).with_detail(detail)
    }
}

/// Score how well a holdings list spreads its risk
///
/// Averages three sub-scores: distinct asset classes (saturating at four),
/// largest position (no penalty up to 25%, zero at 100%) and holding count
/// (saturating at five). An empty list scores 0.0.
pub fn score_diversification(holdings: &[Holding]) -> DiversificationResult {
    if holdings.is_empty() {
        return DiversificationResult { score: 0.0, analysis: None };
    }

    let asset_classes: HashSet<&str> = holdings.iter().map(Holding::class_key).collect();
    let max_single_position = holdings.iter().map(|h| h.percentage).fold(0.0_f64, f64::max);

    let asset_class_score = clamp_unit(asset_classes.len() as f64 / IDEAL_ASSET_CLASSES);
    let concentration_score = clamp_unit(
        1.0 - (max_single_position - UNPENALIZED_POSITION) / (100.0 - UNPENALIZED_POSITION),
    );
    let holdings_score = clamp_unit(holdings.len() as f64 / IDEAL_HOLDINGS);

    let overall = (asset_class_score + concentration_score + holdings_score) / 3.0;

    DiversificationResult {
        score: round2(overall),
        analysis: Some(DiversificationAnalysis {
            num_asset_classes: asset_classes.len(),
            num_holdings: holdings.len(),
            max_single_position,
            asset_class_score: round2(asset_class_score),
            concentration_score: round2(concentration_score),
            holdings_score: round2(holdings_score),
        }),
    }
}
