//! Annual utility costs per fuel.
//!
//! Billing is shared with the post-ODCV cost stage: both price a set of
//! per-fuel quantities against the same rates, only the source and target
//! columns differ.

use crate::config::rates::{
    ElectricRate, RateSchedule, DEMAND_CHARGE_MULTIPLIER, ENERGY_CHARGE_MULTIPLIER,
    HOURS_PER_YEAR, KBTU_PER_MLB_STEAM, KBTU_PER_MMBTU, KBTU_PER_THERM, MONTHS_PER_YEAR,
};
use crate::config::{GeoTable, Resolution, Resolved};
use crate::core::columns as col;
use crate::core::{BuildingRecord, Fuel, PerFuel, Precision};
use crate::errors::SkipReason;
use crate::pipeline::stage::{RowOutcome, Stage, StageContext, Updates};

/// Electricity bill components for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricBill {
    pub peak_kw: f64,
    pub energy: f64,
    pub demand: f64,
    pub total: f64,
}

/// Price a year of electricity (pure).
///
/// # Arguments
///
/// * `kwh` - Annual consumption
/// * `rate` - Energy rate, demand rate and load factor
pub fn electricity_bill(kwh: f64, rate: &ElectricRate) -> ElectricBill {
    let peak_kw = if rate.load_factor > 0.0 {
        kwh / (HOURS_PER_YEAR * rate.load_factor)
    } else {
        0.0
    };
    let energy = kwh * rate.energy * ENERGY_CHARGE_MULTIPLIER;
    let demand = if rate.demand > 0.0 {
        peak_kw * rate.demand * MONTHS_PER_YEAR * DEMAND_CHARGE_MULTIPLIER
    } else {
        0.0
    };
    ElectricBill {
        peak_kw,
        energy,
        demand,
        total: energy + demand,
    }
}

/// Annual cost of a non-electric fuel from its kBtu and unit rate (pure).
pub fn fuel_cost(fuel: Fuel, kbtu: f64, rate: f64) -> f64 {
    match fuel {
        Fuel::Gas => kbtu / KBTU_PER_THERM * rate * ENERGY_CHARGE_MULTIPLIER,
        Fuel::Steam => kbtu / KBTU_PER_MLB_STEAM * rate,
        Fuel::FuelOil => kbtu / KBTU_PER_MMBTU * rate * ENERGY_CHARGE_MULTIPLIER,
        // Electricity is billed through `electricity_bill`
        Fuel::Electricity => 0.0,
    }
}

/// Rates for one building. Rate columns on the row win over the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingRates {
    pub electricity: ElectricRate,
    pub other: PerFuel<f64>,
    pub resolution: Resolution,
}

impl BuildingRates {
    pub fn resolve(record: &BuildingRecord, schedule: &RateSchedule, fuels: &[Fuel]) -> Self {
        let city = record.city.as_deref();
        let state = record.state.as_deref();
        let mut resolution = Resolution::Exact;
        let mut note = |used: bool, r: Resolution| {
            if used {
                resolution = resolution.widen(r);
            }
        };

        let uses = |fuel: Fuel| fuels.contains(&fuel);

        let electricity = {
            let table = schedule.electricity.resolve(city, state);
            let row_energy = record.value(col::ELEC_RATE_KWH).filter(|r| *r >= 0.0);
            let row_demand = record.value(col::ELEC_RATE_DEMAND_KW).filter(|r| *r >= 0.0);
            let row_load = record.positive(col::ELEC_LOAD_FACTOR);
            if row_energy.is_none() || row_demand.is_none() {
                note(uses(Fuel::Electricity), table.resolution);
            }
            ElectricRate {
                energy: row_energy.unwrap_or(table.value.energy),
                demand: row_demand.unwrap_or(table.value.demand),
                load_factor: row_load.unwrap_or(table.value.load_factor),
            }
        };

        let mut other_rate = |fuel: Fuel, table: &GeoTable<f64>| -> f64 {
            match record.value(fuel.rate_column()).filter(|r| *r >= 0.0) {
                Some(rate) => rate,
                None => {
                    let resolved: Resolved<&f64> = table.resolve(city, state);
                    note(uses(fuel), resolved.resolution);
                    *resolved.value
                }
            }
        };
        let other = PerFuel::new(
            0.0,
            other_rate(Fuel::Gas, &schedule.gas),
            other_rate(Fuel::Steam, &schedule.steam),
            other_rate(Fuel::FuelOil, &schedule.fuel_oil),
        );

        Self {
            electricity,
            other,
            resolution,
        }
    }
}

/// Where a bill reads its quantities and writes its costs.
pub struct BillColumns {
    pub peak_kw: Option<&'static str>,
    pub elec_energy: &'static str,
    pub elec_demand: &'static str,
    pub elec_total: &'static str,
    pub gas: &'static str,
    pub steam: &'static str,
    pub fuel_oil: &'static str,
}

impl BillColumns {
    pub fn outputs(&self) -> Vec<&'static str> {
        self.peak_kw
            .into_iter()
            .chain([
                self.elec_energy,
                self.elec_demand,
                self.elec_total,
                self.gas,
                self.steam,
                self.fuel_oil,
            ])
            .collect()
    }

    fn fuel_column(&self, fuel: Fuel) -> &'static str {
        match fuel {
            Fuel::Electricity => self.elec_total,
            Fuel::Gas => self.gas,
            Fuel::Steam => self.steam,
            Fuel::FuelOil => self.fuel_oil,
        }
    }
}

pub const CURRENT_BILL: BillColumns = BillColumns {
    peak_kw: Some(col::COST_ELEC_PEAK_KW),
    elec_energy: col::COST_ELEC_ENERGY,
    elec_demand: col::COST_ELEC_DEMAND,
    elec_total: col::COST_ELEC_TOTAL,
    gas: col::COST_GAS,
    steam: col::COST_STEAM,
    fuel_oil: col::COST_FUEL_OIL,
};

/// Price the given annual quantities and emit the updates for `columns`.
///
/// `kwh` is the electricity quantity; `kbtu` holds the other fuels (its
/// electricity slot is ignored). Fuels without a positive quantity get blank
/// cost cells.
pub fn bill(
    record: &BuildingRecord,
    schedule: &RateSchedule,
    kwh: Option<f64>,
    kbtu: PerFuel<Option<f64>>,
    columns: &BillColumns,
) -> RowOutcome {
    let kwh = kwh.filter(|v| *v > 0.0);
    let quantity = |fuel: Fuel| match fuel {
        Fuel::Electricity => kwh,
        other => kbtu.get(other).filter(|v| *v > 0.0),
    };
    let fuels: Vec<Fuel> = Fuel::ALL
        .into_iter()
        .filter(|fuel| quantity(*fuel).is_some())
        .collect();
    if fuels.is_empty() {
        return RowOutcome::Skipped(SkipReason::NoFuelData);
    }

    let rates = BuildingRates::resolve(record, schedule, &fuels);
    let electric = kwh.map(|kwh| electricity_bill(kwh, &rates.electricity));

    let mut updates = Updates::new();
    if let Some(peak) = columns.peak_kw {
        updates = updates.optional(peak, electric.map(|b| b.peak_kw), Precision::Amount);
    }
    updates = updates
        .optional(columns.elec_energy, electric.map(|b| b.energy), Precision::Amount)
        .optional(columns.elec_demand, electric.map(|b| b.demand), Precision::Amount)
        .optional(columns.elec_total, electric.map(|b| b.total), Precision::Amount);

    for fuel in [Fuel::Gas, Fuel::Steam, Fuel::FuelOil] {
        let cost = quantity(fuel).map(|kbtu| fuel_cost(fuel, kbtu, rates.other.get(fuel)));
        updates = updates.optional(columns.fuel_column(fuel), cost, Precision::Amount);
    }

    updates.resolved(rates.resolution)
}

pub struct CostsStage;

impl Stage for CostsStage {
    fn name(&self) -> &'static str {
        "costs"
    }

    fn description(&self) -> &'static str {
        "Annual utility cost per fuel at current consumption"
    }

    fn requires(&self) -> &'static [&'static str] {
        &[col::ELEC_KBTU, col::LOC_CITY, col::LOC_STATE]
    }

    fn outputs(&self) -> Vec<&'static str> {
        CURRENT_BILL.outputs()
    }

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome {
        let kbtu = PerFuel::new(
            None,
            record.energy(Fuel::Gas),
            record.energy(Fuel::Steam),
            record.energy(Fuel::FuelOil),
        );
        bill(
            record,
            &ctx.config.rates,
            record.elec_kwh(),
            kbtu,
            &CURRENT_BILL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::test_support::{evaluate, is_blanked, number};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_electricity_bill() {
        let rate = ElectricRate {
            energy: 0.20,
            demand: 10.0,
            load_factor: 0.5,
        };
        let bill = electricity_bill(87_600.0, &rate);
        assert!(close(bill.peak_kw, 20.0));
        assert!(close(bill.energy, 87_600.0 * 0.20 * 1.10));
        assert!(close(bill.demand, 20.0 * 10.0 * 12.0 * 1.265));
        assert!(close(bill.total, bill.energy + bill.demand));
    }

    #[test]
    fn test_no_demand_rate_means_no_demand_charge() {
        let rate = ElectricRate {
            energy: 0.10,
            demand: 0.0,
            load_factor: 0.45,
        };
        let bill = electricity_bill(10_000.0, &rate);
        assert_eq!(bill.demand, 0.0);
        assert!(close(bill.total, bill.energy));
    }

    #[test]
    fn test_fuel_cost_units() {
        assert!(close(fuel_cost(Fuel::Gas, 1_000.0, 1.0), 11.0));
        assert!(close(fuel_cost(Fuel::Steam, 909.0, 30.0), 30.0));
        assert!(close(fuel_cost(Fuel::FuelOil, 2_000.0, 25.0), 55.0));
    }

    #[test]
    fn test_row_rates_win() {
        let record = BuildingRecord::new("b")
            .with_location("Boston", "MA")
            .with_value(col::ELEC_KWH, 1_000.0)
            .with_value(col::ELEC_KBTU, 3_412.0)
            .with_value(col::ELEC_RATE_KWH, 0.5)
            .with_value(col::ELEC_RATE_DEMAND_KW, 0.0);
        let outcome = evaluate(&CostsStage, &record);

        assert_eq!(number(&outcome, col::COST_ELEC_ENERGY), Some(550.0));
        assert_eq!(number(&outcome, col::COST_ELEC_DEMAND), Some(0.0));
        assert_eq!(number(&outcome, col::COST_ELEC_TOTAL), Some(550.0));
        assert!(is_blanked(&outcome, col::COST_GAS));
        assert!(matches!(
            outcome,
            RowOutcome::Updated {
                resolution: Resolution::Exact,
                ..
            }
        ));
    }

    #[test]
    fn test_schedule_fallback_for_unlisted_city() {
        let record = BuildingRecord::new("b")
            .with_location("Buffalo", "NY")
            .with_value(col::ELEC_KBTU, 3_412.0)
            .with_value(col::GAS_KBTU, 1_000.0);
        let outcome = evaluate(&CostsStage, &record);

        assert!(number(&outcome, col::COST_ELEC_TOTAL).unwrap() > 0.0);
        assert!(number(&outcome, col::COST_GAS).unwrap() > 0.0);
        assert!(!matches!(
            outcome,
            RowOutcome::Updated {
                resolution: Resolution::Exact,
                ..
            }
        ));
    }

    #[test]
    fn test_no_consumption_is_skipped() {
        let record = BuildingRecord::new("b").with_location("Boston", "MA");
        assert_eq!(
            evaluate(&CostsStage, &record),
            RowOutcome::Skipped(SkipReason::NoFuelData)
        );
    }
}
