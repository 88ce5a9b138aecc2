use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::emissions::default_emission_factors;
use super::hvac::HvacConfig;
use super::lookup::GeoTable;
use super::occupancy::OccupancyConfig;
use super::odcv::OdcvConfig;
use super::rates::RateSchedule;
use super::scoring::ScoringConfig;
use super::valuation::ValuationConfig;
use crate::core::PerFuel;

/// Root configuration structure for odcvmap.
///
/// Every section is optional in `.odcvmap.toml`; missing sections and fields
/// fall back to the compiled-in tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdcvmapConfig {
    /// Dataset-adjacent paths
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub occupancy: OccupancyConfig,

    #[serde(default)]
    pub hvac: HvacConfig,

    #[serde(default)]
    pub odcv: OdcvConfig,

    #[serde(default)]
    pub rates: RateSchedule,

    /// tCO2e per kBtu, by fuel
    #[serde(default = "default_emission_factors")]
    pub emissions: GeoTable<PerFuel<f64>>,

    #[serde(default)]
    pub valuation: ValuationConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for OdcvmapConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            occupancy: OccupancyConfig::default(),
            hvac: HvacConfig::default(),
            odcv: OdcvConfig::default(),
            rates: RateSchedule::default(),
            emissions: default_emission_factors(),
            valuation: ValuationConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl OdcvmapConfig {
    /// Re-key every lookup table so city, state and type matching is
    /// case-insensitive regardless of how the config file spelled them.
    pub fn normalized(self) -> Self {
        Self {
            data: self.data,
            occupancy: self.occupancy.normalized(),
            hvac: super::hvac::HvacConfig {
                benchmarks: self.hvac.benchmarks.normalized(),
                ..self.hvac
            },
            odcv: super::odcv::OdcvConfig {
                bounds: self.odcv.bounds.normalized(),
                ..self.odcv
            },
            rates: self.rates.normalized(),
            emissions: self.emissions.normalized(),
            valuation: ValuationConfig {
                cap_rates: self.valuation.cap_rates.normalized(),
                ..self.valuation
            },
            scoring: ScoringConfig {
                gamma: self.scoring.gamma.normalized(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Backup directory; defaults to `<data dir>/backups`.
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,

    /// Per-building override file applied by the final stage.
    #[serde(default)]
    pub overrides: Option<PathBuf>,
}
