//! Dollar savings and asset valuation impact.
//!
//! Opex avoided is the ODCV share of HVAC cost plus any performance-standard
//! fine avoided. Commercial buildings are valued by direct capitalization:
//! income is backed out of total energy cost, and the avoided opex adds
//! `opex / cap_rate` to the value.

use crate::config::valuation::normalize_cap_rate;
use crate::config::{Resolution, Resolved};
use crate::core::columns::{
    CAP_RATE, COST_ELEC_TOTAL, FINE_AVOIDED, HVAC_COST_TOTAL, ODCV_DOLLAR_SAVINGS,
    ODCV_SAVINGS_PCT, OPEX_AVOIDED, VAL_CURRENT, VAL_IMPACT, VAL_POST,
};
use crate::core::{BuildingRecord, Fuel, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct ValuationStage;

/// Valuation before and after ODCV for one commercial building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub current: f64,
    pub impact: f64,
    pub post: f64,
}

/// Capitalize energy-derived income and avoided opex (pure).
///
/// # Arguments
///
/// * `energy_cost` - Total annual energy cost
/// * `opex_avoided` - Annual operating cost removed by ODCV
/// * `cap_rate` - Capitalization rate as a fraction
/// * `energy_cost_share` - Energy cost as a share of gross income
/// * `noi_margin` - Net operating income as a share of gross income
pub fn capitalize(
    energy_cost: f64,
    opex_avoided: f64,
    cap_rate: f64,
    energy_cost_share: f64,
    noi_margin: f64,
) -> Valuation {
    let noi = energy_cost / energy_cost_share * noi_margin;
    let current = noi / cap_rate;
    let impact = opex_avoided / cap_rate;
    Valuation {
        current,
        impact,
        post: current + impact,
    }
}

fn total_energy_cost(record: &BuildingRecord) -> f64 {
    Fuel::ALL
        .into_iter()
        .filter_map(|fuel| record.value(fuel.cost_column()))
        .sum()
}

impl Stage for ValuationStage {
    fn name(&self) -> &'static str {
        "valuation"
    }

    fn description(&self) -> &'static str {
        "Dollar savings, opex avoided and valuation impact"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[HVAC_COST_TOTAL, ODCV_SAVINGS_PCT, COST_ELEC_TOTAL]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![
            ODCV_DOLLAR_SAVINGS,
            OPEX_AVOIDED,
            VAL_CURRENT,
            VAL_POST,
            VAL_IMPACT,
        ]
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let Some(hvac_cost) = record.value(HVAC_COST_TOTAL) else {
            return RowOutcome::Skipped(SkipReason::MissingValue(HVAC_COST_TOTAL));
        };
        let Some(odcv) = record.value(ODCV_SAVINGS_PCT) else {
            return RowOutcome::Skipped(SkipReason::MissingValue(ODCV_SAVINGS_PCT));
        };

        let savings = hvac_cost * odcv;
        let opex = savings + record.value(FINE_AVOIDED).unwrap_or(0.0);
        let updates = Updates::new()
            .number(ODCV_DOLLAR_SAVINGS, savings, Precision::Amount)
            .number(OPEX_AVOIDED, opex, Precision::Amount);

        let commercial = record
            .building_type
            .as_ref()
            .is_some_and(|kind| kind.is_commercial());
        if !commercial {
            return updates
                .empty(VAL_CURRENT)
                .empty(VAL_POST)
                .empty(VAL_IMPACT)
                .exact();
        }

        let valuation = &ctx.config.valuation;
        let cap_rate = match record.value(CAP_RATE).and_then(normalize_cap_rate) {
            Some(rate) => Resolved::new(rate, Resolution::Exact),
            None => valuation
                .cap_rates
                .resolve(record.city.as_deref(), record.state.as_deref())
                .map(|rate| *rate),
        };

        let value = capitalize(
            total_energy_cost(record),
            opex,
            cap_rate.value,
            valuation.energy_cost_share,
            valuation.noi_margin,
        );

        updates
            .number(VAL_CURRENT, value.current, Precision::Amount)
            .number(VAL_POST, value.post, Precision::Amount)
            .number(VAL_IMPACT, value.impact, Precision::Amount)
            .resolved(cap_rate.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::COST_GAS;
    use crate::core::BuildingType;
    use crate::pipeline::stages::test_support::{evaluate, is_blanked, number};

    fn office() -> BuildingRecord {
        BuildingRecord::new("o")
            .with_type(BuildingType::Office)
            .with_location("Omaha", "NE")
            .with_value(HVAC_COST_TOTAL, 10_000.0)
            .with_value(ODCV_SAVINGS_PCT, 0.25)
            .with_value(COST_ELEC_TOTAL, 9_000.0)
            .with_value(COST_GAS, 3_000.0)
    }

    #[test]
    fn test_capitalize() {
        let value = capitalize(12_000.0, 2_500.0, 0.05, 0.12, 0.60);
        assert!((value.current - 1_200_000.0).abs() < 1e-6);
        assert!((value.impact - 50_000.0).abs() < 1e-6);
        assert!((value.post - 1_250_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_row_cap_rate_percent_wins() {
        let record = office()
            .with_value(CAP_RATE, 5.0)
            .with_value(FINE_AVOIDED, 500.0);
        let outcome = evaluate(&ValuationStage, &record);

        assert_eq!(number(&outcome, ODCV_DOLLAR_SAVINGS), Some(2_500.0));
        assert_eq!(number(&outcome, OPEX_AVOIDED), Some(3_000.0));
        assert_eq!(number(&outcome, VAL_IMPACT), Some(60_000.0));
        assert_eq!(number(&outcome, VAL_CURRENT), Some(1_200_000.0));
        assert_eq!(number(&outcome, VAL_POST), Some(1_260_000.0));
    }

    #[test]
    fn test_cap_rate_falls_back_to_default() {
        let outcome = evaluate(&ValuationStage, &office());
        assert!(matches!(
            outcome,
            RowOutcome::Updated {
                resolution: Resolution::Default,
                ..
            }
        ));
        let impact = number(&outcome, VAL_IMPACT).unwrap();
        assert!((impact - 2_500.0 / 0.07).abs() < 0.01);
    }

    #[test]
    fn test_non_commercial_gets_blank_valuation() {
        let record = office().with_type(BuildingType::K12School);
        let outcome = evaluate(&ValuationStage, &record);
        assert_eq!(number(&outcome, OPEX_AVOIDED), Some(2_500.0));
        assert!(is_blanked(&outcome, VAL_CURRENT));
        assert!(is_blanked(&outcome, VAL_IMPACT));
    }
}
