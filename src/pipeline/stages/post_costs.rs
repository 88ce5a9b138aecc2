//! Annual utility costs after ODCV, priced like the current costs.

use super::costs::{bill, BillColumns};
use crate::core::columns as col;
use crate::core::fuel::KBTU_PER_KWH;
use crate::core::{BuildingRecord, Fuel, PerFuel};
use crate::pipeline::stage::{RowOutcome, Stage, StageContext};

pub const POST_BILL: BillColumns = BillColumns {
    peak_kw: None,
    elec_energy: col::COST_ELEC_ENERGY_POST,
    elec_demand: col::COST_ELEC_DEMAND_POST,
    elec_total: col::COST_ELEC_TOTAL_POST,
    gas: col::COST_GAS_POST,
    steam: col::COST_STEAM_POST,
    fuel_oil: col::COST_FUEL_OIL_POST,
};

pub struct PostCostsStage;

impl Stage for PostCostsStage {
    fn name(&self) -> &'static str {
        "post_odcv_costs"
    }

    fn description(&self) -> &'static str {
        "Annual utility cost per fuel after ODCV"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[col::ELEC_KBTU_POST]
    }

    fn outputs(&self) -> Vec<&'static str> {
        POST_BILL.outputs()
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let kwh = record.positive(col::ELEC_KWH_POST).or_else(|| {
            record
                .positive(col::ELEC_KBTU_POST)
                .map(|kbtu| kbtu / KBTU_PER_KWH)
        });
        let kbtu = PerFuel::new(
            None,
            record.post_energy(Fuel::Gas),
            record.post_energy(Fuel::Steam),
            record.post_energy(Fuel::FuelOil),
        );
        bill(record, &ctx.config.rates, kwh, kbtu, &POST_BILL)
    }
}
