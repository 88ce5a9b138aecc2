//! Fuel types and the per-fuel column layout.

use super::columns as col;
use serde::{Deserialize, Serialize};
use std::fmt;

/// kBtu per kWh of site electricity.
pub const KBTU_PER_KWH: f64 = 3.412;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fuel {
    Electricity,
    Gas,
    Steam,
    FuelOil,
}

impl Fuel {
    pub const ALL: [Fuel; 4] = [Fuel::Electricity, Fuel::Gas, Fuel::Steam, Fuel::FuelOil];

    pub fn label(self) -> &'static str {
        match self {
            Fuel::Electricity => "electricity",
            Fuel::Gas => "gas",
            Fuel::Steam => "steam",
            Fuel::FuelOil => "fuel oil",
        }
    }

    /// Current consumption column (kBtu).
    pub fn energy_column(self) -> &'static str {
        match self {
            Fuel::Electricity => col::ELEC_KBTU,
            Fuel::Gas => col::GAS_KBTU,
            Fuel::Steam => col::STEAM_KBTU,
            Fuel::FuelOil => col::FUEL_OIL_KBTU,
        }
    }

    pub fn post_energy_column(self) -> &'static str {
        match self {
            Fuel::Electricity => col::ELEC_KBTU_POST,
            Fuel::Gas => col::GAS_KBTU_POST,
            Fuel::Steam => col::STEAM_KBTU_POST,
            Fuel::FuelOil => col::FUEL_OIL_KBTU_POST,
        }
    }

    pub fn hvac_pct_column(self) -> &'static str {
        match self {
            Fuel::Electricity => col::HVAC_PCT_ELEC,
            Fuel::Gas => col::HVAC_PCT_GAS,
            Fuel::Steam => col::HVAC_PCT_STEAM,
            Fuel::FuelOil => col::HVAC_PCT_FUEL_OIL,
        }
    }

    /// Annual cost column. Electricity reports its total (energy + demand).
    pub fn cost_column(self) -> &'static str {
        match self {
            Fuel::Electricity => col::COST_ELEC_TOTAL,
            Fuel::Gas => col::COST_GAS,
            Fuel::Steam => col::COST_STEAM,
            Fuel::FuelOil => col::COST_FUEL_OIL,
        }
    }

    pub fn post_cost_column(self) -> &'static str {
        match self {
            Fuel::Electricity => col::COST_ELEC_TOTAL_POST,
            Fuel::Gas => col::COST_GAS_POST,
            Fuel::Steam => col::COST_STEAM_POST,
            Fuel::FuelOil => col::COST_FUEL_OIL_POST,
        }
    }

    /// Per-building rate override column, in the fuel's billing unit.
    pub fn rate_column(self) -> &'static str {
        match self {
            Fuel::Electricity => col::ELEC_RATE_KWH,
            Fuel::Gas => col::GAS_RATE_THERM,
            Fuel::Steam => col::STEAM_RATE_MLB,
            Fuel::FuelOil => col::FUEL_OIL_RATE_MMBTU,
        }
    }
}

impl fmt::Display for Fuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per fuel. Used for lookup parameters and emission factors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerFuel<T> {
    #[serde(alias = "electricity")]
    pub elec: T,
    pub gas: T,
    pub steam: T,
    pub fuel_oil: T,
}

impl<T: Copy> PerFuel<T> {
    pub const fn new(elec: T, gas: T, steam: T, fuel_oil: T) -> Self {
        Self {
            elec,
            gas,
            steam,
            fuel_oil,
        }
    }

    pub fn get(&self, fuel: Fuel) -> T {
        match fuel {
            Fuel::Electricity => self.elec,
            Fuel::Gas => self.gas,
            Fuel::Steam => self.steam,
            Fuel::FuelOil => self.fuel_oil,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Fuel, T)> + '_ {
        Fuel::ALL.into_iter().map(move |fuel| (fuel, self.get(fuel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_distinct_per_fuel() {
        let mut seen = std::collections::HashSet::new();
        for fuel in Fuel::ALL {
            for column in [
                fuel.energy_column(),
                fuel.post_energy_column(),
                fuel.hvac_pct_column(),
                fuel.cost_column(),
                fuel.post_cost_column(),
                fuel.rate_column(),
            ] {
                assert!(seen.insert(column), "{column} used twice");
            }
        }
    }

    #[test]
    fn test_per_fuel_get() {
        let factors = PerFuel::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(factors.get(Fuel::Steam), 3.0);
        let total: f64 = factors.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 10.0);
    }
}
