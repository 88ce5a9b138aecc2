//! Post-ODCV site EUI and Energy Star score.
//!
//! The score is `1 − CDF(ratio)` of a gamma distribution of efficiency
//! ratios (actual / predicted EUI) for the building type. When the predicted
//! EUI is not on the row, the ratio implied by the current score is used.

use crate::config::scoring::GammaParams;
use crate::core::columns::{
    ENERGY_STAR_SCORE, ENERGY_STAR_SCORE_POST, ENERGY_TOTAL_KBTU, ENERGY_TOTAL_KBTU_POST,
    PREDICTED_EUI, SITE_EUI, SITE_EUI_POST,
};
use crate::core::{BuildingRecord, Precision};
use crate::errors::SkipReason;
use crate::math::{gamma_cdf, gamma_ppf};
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 99.0;

pub struct EfficiencyScoreStage;

/// Score for an efficiency ratio (pure). Lower ratios score higher.
pub fn score_for_ratio(ratio: f64, params: &GammaParams) -> f64 {
    let cdf = gamma_cdf(ratio, params.shape, params.scale);
    ((1.0 - cdf) * 100.0).round().clamp(MIN_SCORE, MAX_SCORE)
}

/// Efficiency ratio implied by an existing score.
///
/// Scores at or beyond either end of the scale imply no ratio.
pub fn ratio_for_score(score: f64, params: &GammaParams) -> Option<f64> {
    if score <= 0.0 || score >= 100.0 {
        return None;
    }
    gamma_ppf((100.0 - score) / 100.0, params.shape, params.scale)
}

/// Keep the post score at or above the current one when EUI did not rise (pure).
pub fn settle_post_score(
    computed: Option<f64>,
    current: Option<f64>,
    eui_did_not_rise: bool,
) -> Option<f64> {
    let current = current.filter(|score| (MIN_SCORE..=100.0).contains(score));
    match (computed, current) {
        (Some(post), Some(current)) if eui_did_not_rise => Some(post.max(current)),
        (None, Some(current)) if eui_did_not_rise => Some(current),
        (post, _) => post,
    }
}

impl Stage for EfficiencyScoreStage {
    fn name(&self) -> &'static str {
        "efficiency_score"
    }

    fn description(&self) -> &'static str {
        "Post-ODCV site EUI and Energy Star score"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[ENERGY_TOTAL_KBTU, ENERGY_TOTAL_KBTU_POST, SITE_EUI]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![SITE_EUI_POST, ENERGY_STAR_SCORE_POST]
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let Some(eui) = record.positive(SITE_EUI) else {
            return RowOutcome::Skipped(SkipReason::NotPositive(SITE_EUI));
        };
        let Some(total) = record.positive(ENERGY_TOTAL_KBTU) else {
            return RowOutcome::Skipped(SkipReason::NotPositive(ENERGY_TOTAL_KBTU));
        };
        let Some(post_total) = record.value(ENERGY_TOTAL_KBTU_POST) else {
            return RowOutcome::Skipped(SkipReason::MissingValue(ENERGY_TOTAL_KBTU_POST));
        };

        let post_eui = eui * post_total / total;
        let params = ctx
            .config
            .scoring
            .gamma
            .resolve(&record.building_type_or_other());

        let ratio = match record.positive(PREDICTED_EUI) {
            Some(predicted) => Some(post_eui / predicted),
            None => record
                .value(ENERGY_STAR_SCORE)
                .and_then(|score| ratio_for_score(score, params.value))
                .map(|implied| implied * post_eui / eui),
        };

        let score_post = settle_post_score(
            ratio.map(|r| score_for_ratio(r, params.value)),
            record.value(ENERGY_STAR_SCORE),
            post_eui <= eui,
        );

        Updates::new()
            .number(SITE_EUI_POST, post_eui, Precision::Amount)
            .optional(ENERGY_STAR_SCORE_POST, score_post, Precision::Whole)
            .resolved(params.resolution)
    }
}
