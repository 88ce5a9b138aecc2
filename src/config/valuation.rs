//! Income-capitalization parameters.

use super::lookup::GeoTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    #[serde(default = "default_cap_rates")]
    pub cap_rates: GeoTable<f64>,
    /// Energy cost as a share of gross income.
    #[serde(default = "default_energy_cost_share")]
    pub energy_cost_share: f64,
    /// Net operating income as a share of gross income.
    #[serde(default = "default_noi_margin")]
    pub noi_margin: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            cap_rates: default_cap_rates(),
            energy_cost_share: default_energy_cost_share(),
            noi_margin: default_noi_margin(),
        }
    }
}

pub fn default_energy_cost_share() -> f64 {
    0.12
}

pub fn default_noi_margin() -> f64 {
    0.60
}

pub fn default_cap_rates() -> GeoTable<f64> {
    GeoTable::new(0.07)
        .with_city("New York", 0.055)
        .with_city("San Francisco", 0.06)
        .with_city("Boston", 0.06)
        .with_state("NY", 0.062)
        .with_state("CA", 0.062)
        .with_state("MA", 0.063)
        .with_state("DC", 0.06)
        .with_state("WA", 0.064)
        .with_state("IL", 0.072)
        .with_state("CO", 0.068)
        .with_state("TX", 0.071)
}

/// Interpret a cap rate cell: values above 1 are percentages.
pub fn normalize_cap_rate(value: f64) -> Option<f64> {
    let rate = if value > 1.0 { value / 100.0 } else { value };
    (rate > 0.0).then_some(rate)
}
