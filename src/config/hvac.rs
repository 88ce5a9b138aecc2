//! HVAC share benchmarks.
//!
//! Baselines approximate the CBECS end-use split by building activity. The
//! chain is (type, climate zone), then type national, then the office
//! baseline used as the global default.

use super::lookup::{Resolution, Resolved, TypeTable};
use crate::core::{BuildingType, ClimateZone, PerFuel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacBenchmark {
    pub national: PerFuel<f64>,
    /// Keyed by climate zone name (`Northern`, `North-Central`, ...).
    #[serde(default)]
    pub climate: BTreeMap<String, PerFuel<f64>>,
}

impl HvacBenchmark {
    fn national(elec: f64, gas: f64, steam: f64) -> Self {
        Self {
            national: PerFuel::new(elec, gas, steam, default_fuel_oil_pct()),
            climate: BTreeMap::new(),
        }
    }

    fn with_zone(mut self, zone: ClimateZone, elec: f64, gas: f64, steam: f64) -> Self {
        self.climate.insert(
            zone.as_str().to_string(),
            PerFuel::new(elec, gas, steam, default_fuel_oil_pct()),
        );
        self
    }

    fn for_zone(&self, zone: ClimateZone) -> Option<&PerFuel<f64>> {
        self.climate
            .iter()
            .find(|(name, _)| ClimateZone::parse(name) == Some(zone))
            .map(|(_, pct)| pct)
    }
}

/// Bounds on the per-building adjustments to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HvacAdjustments {
    pub score: f64,
    pub year: f64,
    pub eui: f64,
    pub combined_cap: f64,
}

impl Default for HvacAdjustments {
    fn default() -> Self {
        Self {
            score: 0.05,
            year: 0.04,
            eui: 0.06,
            combined_cap: 0.12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacConfig {
    #[serde(default = "default_benchmarks")]
    pub benchmarks: TypeTable<HvacBenchmark>,
    #[serde(default)]
    pub adjustments: HvacAdjustments,
    #[serde(default = "default_fuel_oil_pct")]
    pub fuel_oil_pct: f64,
    #[serde(default = "default_data_center_pct")]
    pub data_center: PerFuel<f64>,
}

impl Default for HvacConfig {
    fn default() -> Self {
        Self {
            benchmarks: default_benchmarks(),
            adjustments: HvacAdjustments::default(),
            fuel_oil_pct: default_fuel_oil_pct(),
            data_center: default_data_center_pct(),
        }
    }
}

impl HvacConfig {
    /// Baseline HVAC share per fuel for a type and optional climate zone.
    pub fn baseline(
        &self,
        building_type: &BuildingType,
        zone: Option<ClimateZone>,
    ) -> Resolved<PerFuel<f64>> {
        match self.benchmarks.get(building_type) {
            Some(benchmark) => match zone.and_then(|z| benchmark.for_zone(z)) {
                Some(pct) => Resolved::new(*pct, Resolution::Exact),
                None => Resolved::new(benchmark.national, Resolution::Fallback),
            },
            None => Resolved::new(self.benchmarks.default.national, Resolution::Default),
        }
    }
}

pub fn default_fuel_oil_pct() -> f64 {
    0.93
}

/// Electricity, gas and steam shares for data centers. Fuel oil always takes
/// `fuel_oil_pct`.
pub fn default_data_center_pct() -> PerFuel<f64> {
    PerFuel::new(0.42, 0.0, 0.0, default_fuel_oil_pct())
}

pub fn default_benchmarks() -> TypeTable<HvacBenchmark> {
    use BuildingType::*;
    let office = HvacBenchmark::national(0.42, 0.78, 0.85)
        .with_zone(ClimateZone::Northern, 0.38, 0.85, 0.88)
        .with_zone(ClimateZone::NorthCentral, 0.42, 0.80, 0.85)
        .with_zone(ClimateZone::SouthCentral, 0.48, 0.70, 0.80)
        .with_zone(ClimateZone::Southern, 0.52, 0.60, 0.75);
    let assembly = || HvacBenchmark::national(0.40, 0.82, 0.88);
    let public_order = || HvacBenchmark::national(0.38, 0.80, 0.85);
    let service = || HvacBenchmark::national(0.35, 0.80, 0.85);
    let hospital = || HvacBenchmark::national(0.38, 0.60, 0.75);
    let clinic = || HvacBenchmark::national(0.40, 0.75, 0.85);
    let education = || HvacBenchmark::national(0.35, 0.85, 0.90);

    [
        (Office, office.clone()),
        (BankBranch, office.clone()),
        (MedicalOffice, clinic()),
        (OutpatientClinic, clinic()),
        (MixedUse, HvacBenchmark::national(0.40, 0.70, 0.80)),
        (K12School, education()),
        (PreschoolDaycare, education()),
        (HigherEd, HvacBenchmark::national(0.38, 0.80, 0.88)),
        (Hotel, HvacBenchmark::national(0.30, 0.55, 0.75)),
        (RetailStore, HvacBenchmark::national(0.35, 0.85, 0.85)),
        (WholesaleClub, HvacBenchmark::national(0.35, 0.85, 0.85)),
        (StripMall, HvacBenchmark::national(0.33, 0.80, 0.85)),
        (EnclosedMall, HvacBenchmark::national(0.40, 0.85, 0.88)),
        (Supermarket, HvacBenchmark::national(0.20, 0.70, 0.80)),
        (RestaurantBar, HvacBenchmark::national(0.20, 0.35, 0.70)),
        (InpatientHospital, hospital()),
        (SpecialtyHospital, hospital()),
        (ResidentialCare, HvacBenchmark::national(0.30, 0.55, 0.70)),
        (Laboratory, HvacBenchmark::national(0.50, 0.75, 0.85)),
        (PoliceStation, public_order()),
        (FireStation, public_order()),
        (Courthouse, public_order()),
        (Venue, assembly()),
        (EventSpace, assembly()),
        (Theater, assembly()),
        (ArtsCulture, assembly()),
        (LibraryMuseum, assembly()),
        (Gym, assembly()),
        (SportsGaming, assembly()),
        (VehicleDealership, service()),
        (PublicService, service()),
        (PublicTransit, service()),
    ]
    .into_iter()
    .fold(TypeTable::new(office), |table, (kind, benchmark)| {
        table.with(kind, benchmark)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_chain() {
        let config = HvacConfig::default();

        let exact = config.baseline(&BuildingType::Office, Some(ClimateZone::Southern));
        assert_eq!(exact.resolution, Resolution::Exact);
        assert_eq!(exact.value.elec, 0.52);

        let national = config.baseline(&BuildingType::Hotel, Some(ClimateZone::Southern));
        assert_eq!(national.resolution, Resolution::Fallback);
        assert_eq!(national.value.elec, 0.30);

        let global = config.baseline(&BuildingType::Other("Warehouse".into()), None);
        assert_eq!(global.resolution, Resolution::Default);
        assert_eq!(global.value.elec, 0.42);
    }

    #[test]
    fn test_all_baselines_are_fractions() {
        let config = HvacConfig::default();
        for benchmark in config.benchmarks.values() {
            for (_, pct) in benchmark.national.iter() {
                assert!((0.0..=1.0).contains(&pct));
            }
        }
    }
}
