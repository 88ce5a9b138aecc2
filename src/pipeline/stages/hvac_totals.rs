//! HVAC energy and cost totals across fuels.

use crate::core::columns::{COST_ELEC_TOTAL, HVAC_COST_TOTAL, HVAC_ENERGY_TOTAL, HVAC_PCT_ELEC};
use crate::core::{BuildingRecord, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct HvacTotalsStage;

impl Stage for HvacTotalsStage {
    fn name(&self) -> &'static str {
        "hvac_totals"
    }

    fn description(&self) -> &'static str {
        "HVAC energy and cost summed over fuels"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[HVAC_PCT_ELEC, COST_ELEC_TOTAL]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![HVAC_ENERGY_TOTAL, HVAC_COST_TOTAL]
    }

    fn evaluate(&self, record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
        let fuels: Vec<_> = record.fuels_in_use().collect();
        if fuels.is_empty() {
            return RowOutcome::Skipped(SkipReason::NoFuelData);
        }
        if let Some(fuel) = fuels
            .iter()
            .find(|fuel| record.value(fuel.hvac_pct_column()).is_none())
        {
            return RowOutcome::Skipped(SkipReason::MissingValue(fuel.hvac_pct_column()));
        }

        let (energy, cost) = fuels.iter().fold((0.0, 0.0), |(energy, cost), fuel| {
            let share = record.value(fuel.hvac_pct_column()).unwrap_or(0.0);
            (
                energy + record.energy(*fuel).unwrap_or(0.0) * share,
                cost + record.value(fuel.cost_column()).unwrap_or(0.0) * share,
            )
        });

        Updates::new()
            .number(HVAC_ENERGY_TOTAL, energy, Precision::Amount)
            .number(HVAC_COST_TOTAL, cost, Precision::Amount)
            .exact()
    }
}
