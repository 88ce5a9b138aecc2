//! Utility rate schedule and billing constants.

use super::lookup::GeoTable;
use serde::{Deserialize, Serialize};

/// Taxes, fees and riders on energy charges.
pub const ENERGY_CHARGE_MULTIPLIER: f64 = 1.10;
/// Ratchet clauses and seasonal peaks on demand charges.
pub const DEMAND_CHARGE_MULTIPLIER: f64 = 1.265;
pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const HOURS_PER_YEAR: f64 = 8760.0;

pub const KBTU_PER_THERM: f64 = 100.0;
pub const KBTU_PER_MLB_STEAM: f64 = 909.0;
pub const KBTU_PER_MMBTU: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricRate {
    /// $/kWh
    pub energy: f64,
    /// $/kW-month. Zero means no demand charge.
    #[serde(default)]
    pub demand: f64,
    #[serde(default = "default_load_factor")]
    pub load_factor: f64,
}

pub fn default_load_factor() -> f64 {
    0.45
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    #[serde(default = "default_electricity")]
    pub electricity: GeoTable<ElectricRate>,
    /// $/therm
    #[serde(default = "default_gas")]
    pub gas: GeoTable<f64>,
    /// $/Mlb
    #[serde(default = "default_steam")]
    pub steam: GeoTable<f64>,
    /// $/MMBtu
    #[serde(default = "default_fuel_oil")]
    pub fuel_oil: GeoTable<f64>,
}

impl Default for RateSchedule {
    fn default() -> Self {
        Self {
            electricity: default_electricity(),
            gas: default_gas(),
            steam: default_steam(),
            fuel_oil: default_fuel_oil(),
        }
    }
}

impl RateSchedule {
    pub fn normalized(self) -> Self {
        Self {
            electricity: self.electricity.normalized(),
            gas: self.gas.normalized(),
            steam: self.steam.normalized(),
            fuel_oil: self.fuel_oil.normalized(),
        }
    }

    /// Every numeric rate in the schedule, for validation.
    pub fn all_rates(&self) -> Vec<f64> {
        let electric = self
            .electricity
            .values()
            .flat_map(|rate| [rate.energy, rate.demand]);
        electric
            .chain(self.gas.values().copied())
            .chain(self.steam.values().copied())
            .chain(self.fuel_oil.values().copied())
            .collect()
    }
}

fn elec(energy: f64, demand: f64) -> ElectricRate {
    ElectricRate {
        energy,
        demand,
        load_factor: default_load_factor(),
    }
}

pub fn default_electricity() -> GeoTable<ElectricRate> {
    GeoTable::new(elec(0.13, 15.0))
        .with_city("New York", elec(0.24, 32.0))
        .with_city("Boston", elec(0.22, 20.0))
        .with_city("San Francisco", elec(0.26, 24.0))
        .with_city("Los Angeles", elec(0.22, 22.0))
        .with_city("Chicago", elec(0.11, 16.0))
        .with_city("Seattle", elec(0.11, 8.0))
        .with_state("NY", elec(0.20, 25.0))
        .with_state("MA", elec(0.21, 18.0))
        .with_state("CA", elec(0.23, 22.0))
        .with_state("IL", elec(0.12, 15.0))
        .with_state("CO", elec(0.12, 18.0))
        .with_state("WA", elec(0.11, 8.0))
        .with_state("TX", elec(0.10, 10.0))
        .with_state("DC", elec(0.15, 18.0))
        .with_state("GA", elec(0.11, 14.0))
}

pub fn default_gas() -> GeoTable<f64> {
    GeoTable::new(1.10)
        .with_state("NY", 1.25)
        .with_state("MA", 1.55)
        .with_state("CA", 1.45)
        .with_state("IL", 0.85)
        .with_state("CO", 0.95)
        .with_state("TX", 0.80)
}

pub fn default_steam() -> GeoTable<f64> {
    GeoTable::new(30.0)
        .with_city("New York", 35.0)
        .with_city("Boston", 32.0)
        .with_city("Denver", 28.0)
}

pub fn default_fuel_oil() -> GeoTable<f64> {
    GeoTable::new(25.0).with_state("NY", 27.0).with_state("MA", 26.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lookup::Resolution;

    #[test]
    fn test_electric_rate_chain() {
        let schedule = RateSchedule::default();
        let nyc = schedule.electricity.resolve(Some("New York"), Some("NY"));
        assert_eq!(nyc.value.energy, 0.24);
        assert_eq!(nyc.resolution, Resolution::Exact);

        let albany = schedule.electricity.resolve(Some("Albany"), Some("NY"));
        assert_eq!(albany.value.energy, 0.20);
        assert_eq!(albany.resolution, Resolution::Fallback);
    }

    #[test]
    fn test_all_rates_non_negative() {
        assert!(RateSchedule::default().all_rates().iter().all(|r| *r >= 0.0));
    }
}
