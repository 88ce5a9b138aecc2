//! Carbon emissions before and after ODCV.

use crate::core::columns::{CARBON_POST, CARBON_REDUCTION, CARBON_TOTAL, ELEC_KBTU_POST};
use crate::core::{BuildingRecord, Fuel, PerFuel, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

pub struct CarbonStage;

/// Metric tons for a set of per-fuel kBtu values (pure). Missing fuels count as zero.
pub fn emissions(energy: impl Fn(Fuel) -> Option<f64>, factors: &PerFuel<f64>) -> f64 {
    Fuel::ALL
        .into_iter()
        .map(|fuel| energy(fuel).unwrap_or(0.0) * factors.get(fuel))
        .sum()
}

impl Stage for CarbonStage {
    fn name(&self) -> &'static str {
        "carbon"
    }

    fn description(&self) -> &'static str {
        "Emissions at current and post-ODCV consumption"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[ELEC_KBTU_POST]
    }

    fn outputs(&self) -> Vec<&'static str> {
        vec![CARBON_TOTAL, CARBON_POST, CARBON_REDUCTION]
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        if Fuel::ALL.iter().all(|fuel| record.energy(*fuel).is_none()) {
            return RowOutcome::Skipped(SkipReason::NoFuelData);
        }
        if Fuel::ALL.iter().all(|fuel| record.post_energy(*fuel).is_none()) {
            return RowOutcome::Skipped(SkipReason::MissingValue(ELEC_KBTU_POST));
        }

        let factors = ctx
            .config
            .emissions
            .resolve(record.city.as_deref(), record.state.as_deref());
        let current = emissions(|fuel| record.energy(fuel), factors.value);
        let post = emissions(|fuel| record.post_energy(fuel), factors.value);

        Updates::new()
            .number(CARBON_TOTAL, current, Precision::Fraction)
            .number(CARBON_POST, post, Precision::Fraction)
            .number(CARBON_REDUCTION, (current - post).max(0.0), Precision::Fraction)
            .resolved(factors.resolution)
    }
}
