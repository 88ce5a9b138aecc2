//! The stage catalogue.
//!
//! Each module holds one stage: a pure per-row computation of a group of
//! derived columns. [`catalogue`] lists them in dependency order.

pub mod carbon;
pub mod costs;
pub mod efficiency;
pub mod energy_totals;
pub mod hvac_pct;
pub mod hvac_totals;
pub mod occupancy;
pub mod odcv_savings;
pub mod overrides;
pub mod post_costs;
pub mod post_energy;
pub mod valuation;
pub mod verticals;

pub use carbon::CarbonStage;
pub use costs::CostsStage;
pub use efficiency::EfficiencyScoreStage;
pub use energy_totals::EnergyTotalsStage;
pub use hvac_pct::HvacPctStage;
pub use hvac_totals::HvacTotalsStage;
pub use occupancy::OccupancyStage;
pub use odcv_savings::OdcvSavingsStage;
pub use overrides::{OverrideTable, OverridesStage};
pub use post_costs::PostCostsStage;
pub use post_energy::PostEnergyStage;
pub use valuation::ValuationStage;
pub use verticals::VerticalsStage;

use super::stage::Stage;
use crate::errors::PipelineError;

/// Catalogue stages in dependency order, without the final overrides stage.
pub fn catalogue() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(VerticalsStage),
        Box::new(OccupancyStage),
        Box::new(EnergyTotalsStage),
        Box::new(HvacPctStage),
        Box::new(OdcvSavingsStage),
        Box::new(CostsStage),
        Box::new(HvacTotalsStage),
        Box::new(PostEnergyStage),
        Box::new(PostCostsStage),
        Box::new(CarbonStage),
        Box::new(ValuationStage),
        Box::new(EfficiencyScoreStage),
    ]
}

/// Every stage, overrides included.
pub fn all_stages(overrides: Option<OverrideTable>) -> Vec<Box<dyn Stage>> {
    let mut stages = catalogue();
    stages.push(Box::new(OverridesStage::new(overrides)));
    stages
}

/// Name of the catalogue stage that writes `column`.
pub fn producer_of(column: &str) -> Option<&'static str> {
    catalogue()
        .into_iter()
        .find(|stage| stage.outputs().iter().any(|output| *output == column))
        .map(|stage| stage.name())
}

/// Columns written by catalogue stages, in catalogue order.
pub fn derived_columns() -> Vec<&'static str> {
    catalogue()
        .iter()
        .flat_map(|stage| stage.outputs())
        .collect()
}

/// Stages to run for a `--stage` selection; an empty selection means all.
/// Requested names keep catalogue order.
pub fn select(
    names: &[String],
    overrides: Option<OverrideTable>,
) -> Result<Vec<Box<dyn Stage>>, PipelineError> {
    let stages = all_stages(overrides);
    if let Some(unknown) = names
        .iter()
        .find(|name| !stages.iter().any(|stage| stage.name() == name.as_str()))
    {
        return Err(PipelineError::UnknownStage(unknown.clone()));
    }
    if names.is_empty() {
        return Ok(stages);
    }
    Ok(stages
        .into_iter()
        .filter(|stage| names.iter().any(|name| name == stage.name()))
        .collect())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns as col;

    #[test]
    fn test_stage_names_are_unique() {
        let names: Vec<_> = all_stages(None).iter().map(|s| s.name()).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn test_producers() {
        assert_eq!(producer_of(col::HVAC_COST_TOTAL), Some("hvac_totals"));
        assert_eq!(producer_of(col::ODCV_SAVINGS_PCT), Some("odcv_savings"));
        assert_eq!(producer_of(col::VACANCY_RATE), Some("occupancy"));
        assert_eq!(producer_of(col::ELEC_KBTU), None);
    }

    #[test]
    fn test_every_requirement_is_produced_earlier_or_raw() {
        let stages = catalogue();
        for (i, stage) in stages.iter().enumerate() {
            for column in stage.requires() {
                if let Some(producer) = producer_of(column) {
                    let position = stages.iter().position(|s| s.name() == producer).unwrap();
                    assert!(
                        position < i || producer == stage.name(),
                        "{} needs {} from later stage {}",
                        stage.name(),
                        column,
                        producer
                    );
                }
            }
        }
    }

    #[test]
    fn test_select_keeps_catalogue_order() {
        let names = vec!["carbon".to_string(), "occupancy".to_string()];
        let selected: Vec<_> = select(&names, None)
            .unwrap()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(selected, vec!["occupancy", "carbon"]);
    }

    #[test]
    fn test_select_rejects_unknown_stage() {
        let err = select(&["nope".to_string()], None).err().unwrap();
        assert!(matches!(err, PipelineError::UnknownStage(name) if name == "nope"));
    }

    #[test]
    fn test_derived_columns_exclude_raw_inputs() {
        let derived = derived_columns();
        assert!(derived.contains(&col::ENERGY_STAR_SCORE_POST));
        assert!(!derived.contains(&col::ELEC_KBTU));
        assert!(!derived.contains(&col::ID_BUILDING));
    }
}
