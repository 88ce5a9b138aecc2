//! Current total energy, recomputed from the per-fuel parts.
//!
//! The stored total is a cache and is known to drift from its parts. The
//! parts are source data and keep whatever precision they came with, so the
//! total is written at full precision rather than rounded to cents.

use crate::core::columns::{ELEC_KBTU, ENERGY_TOTAL_KBTU};
use crate::core::{BuildingRecord, Fuel, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct EnergyTotalsStage;

/// Sum of the fuels present on the row, `None` when none are (pure).
pub fn energy_total(record: &BuildingRecord) -> Option<f64> {
    Fuel::ALL
        .into_iter()
        .filter_map(|fuel| record.energy(fuel))
        .fold(None, |acc, value| Some(acc.unwrap_or(0.0) + value))
}

impl Stage for EnergyTotalsStage {
    fn name(&self) -> &'static str {
        "energy_totals"
    }

    fn description(&self) -> &'static str {
        "Recompute total site energy from fuel parts"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[ELEC_KBTU]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![ENERGY_TOTAL_KBTU]
    }

    fn evaluate(&self, record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
        match energy_total(record) {
            Some(total) => Updates::new()
                .number(ENERGY_TOTAL_KBTU, total, Precision::Full)
                .exact(),
            None => RowOutcome::Skipped(SkipReason::NoFuelData),
        }
    }
}
