//! Emission factors (tCO2e per kBtu) by location.
//!
//! Electricity factors follow the local grid mix; the other fuels are
//! combustion factors and rarely vary by city.

use super::lookup::GeoTable;
use crate::core::PerFuel;

pub const DEFAULT_FACTORS: PerFuel<f64> = PerFuel::new(0.0000922, 0.00005311, 0.00004493, 0.00007315);

fn with_elec(elec: f64) -> PerFuel<f64> {
    PerFuel {
        elec,
        ..DEFAULT_FACTORS
    }
}

pub fn default_emission_factors() -> GeoTable<PerFuel<f64>> {
    GeoTable::new(DEFAULT_FACTORS)
        .with_city("New York", with_elec(0.0000847))
        .with_city("Boston", with_elec(0.0000717))
        .with_city("Cambridge", with_elec(0.0000717))
        .with_city("Washington", with_elec(0.0000794))
        .with_city("Denver", with_elec(0.0001378))
        .with_city(
            "Seattle",
            PerFuel {
                elec: 0.0000029,
                gas: 0.000053,
                steam: 0.000081,
                ..DEFAULT_FACTORS
            },
        )
        .with_city("San Francisco", with_elec(0.0000570))
        .with_city("Los Angeles", with_elec(0.0000570))
        .with_city("Berkeley", with_elec(0.0000570))
        .with_city("St. Louis", with_elec(0.0001649))
        .with_city("Chicago", with_elec(0.0001649))
        .with_city("Portland", with_elec(0.0000595))
        .with_city("Atlanta", with_elec(0.0000988))
}
