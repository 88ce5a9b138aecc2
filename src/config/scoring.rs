//! Efficiency-score distribution parameters.

use super::lookup::TypeTable;
use crate::core::BuildingType;
use serde::{Deserialize, Serialize};

/// Gamma distribution of efficiency ratios (actual / predicted EUI) for a type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaParams {
    pub shape: f64,
    pub scale: f64,
}

impl GammaParams {
    pub const fn new(shape: f64, scale: f64) -> Self {
        Self { shape, scale }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_gamma_params")]
    pub gamma: TypeTable<GammaParams>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma_params(),
        }
    }
}

pub fn default_gamma_params() -> TypeTable<GammaParams> {
    let g = GammaParams::new;
    let mut table = [
        (BuildingType::Office, g(2.0, 0.42)),
        (BuildingType::MedicalOffice, g(2.1, 0.40)),
        (BuildingType::BankBranch, g(2.0, 0.42)),
        (BuildingType::Courthouse, g(2.0, 0.45)),
        (BuildingType::Hotel, g(1.8, 0.48)),
        (BuildingType::K12School, g(2.2, 0.38)),
        (BuildingType::HigherEd, g(2.0, 0.45)),
        (BuildingType::RetailStore, g(1.9, 0.45)),
        (BuildingType::Supermarket, g(1.8, 0.50)),
        (BuildingType::InpatientHospital, g(2.3, 0.38)),
        (BuildingType::OutpatientClinic, g(2.1, 0.40)),
        (BuildingType::DataCenter, g(1.5, 0.55)),
    ]
    .into_iter()
    .fold(TypeTable::new(g(2.0, 0.43)), |table, (kind, params)| {
        table.with(kind, params)
    });
    table
        .types
        .insert("warehouse".to_string(), g(1.7, 0.52));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_is_matched_as_other_type() {
        let table = default_gamma_params();
        let params = table.resolve(&BuildingType::parse("Warehouse"));
        assert_eq!(*params.value, GammaParams::new(1.7, 0.52));
    }
}
