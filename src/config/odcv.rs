//! ODCV savings parameters.

use super::lookup::TypeTable;
use crate::core::{BuildingType, ClimateZone};
use serde::{Deserialize, Serialize};

/// Type-specific [floor, ceiling] for the savings fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsBounds {
    pub floor: f64,
    pub ceiling: f64,
}

impl SavingsBounds {
    pub const fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.floor).min(self.ceiling)
    }

    pub fn range(&self) -> f64 {
        self.ceiling - self.floor
    }
}

/// Multipliers for how much conditioning each unit of outside air costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateModifiers {
    pub northern: f64,
    pub north_central: f64,
    pub south_central: f64,
    pub southern: f64,
}

impl Default for ClimateModifiers {
    fn default() -> Self {
        Self {
            northern: 1.10,
            north_central: 1.05,
            south_central: 1.00,
            southern: 0.95,
        }
    }
}

impl ClimateModifiers {
    pub fn for_zone(&self, zone: ClimateZone) -> f64 {
        match zone {
            ClimateZone::Northern => self.northern,
            ClimateZone::NorthCentral => self.north_central,
            ClimateZone::SouthCentral => self.south_central,
            ClimateZone::Southern => self.southern,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdcvConfig {
    #[serde(default = "default_bounds")]
    pub bounds: TypeTable<SavingsBounds>,

    /// Multiplicative uplift applied after the modifiers.
    #[serde(default = "default_uplift")]
    pub uplift: f64,

    #[serde(default)]
    pub climate: ClimateModifiers,

    /// Share of opportunity kept for continuously occupied types.
    #[serde(default = "default_low_opportunity_factor")]
    pub low_opportunity_factor: f64,

    // Fallbacks for rows with missing inputs
    #[serde(default = "default_vacancy")]
    pub default_vacancy: f64,
    #[serde(default = "default_utilization")]
    pub default_utilization: f64,
    #[serde(default = "default_year_built")]
    pub default_year_built: f64,
    #[serde(default = "default_sqft")]
    pub default_sqft: f64,
}

impl Default for OdcvConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
            uplift: default_uplift(),
            climate: ClimateModifiers::default(),
            low_opportunity_factor: default_low_opportunity_factor(),
            default_vacancy: default_vacancy(),
            default_utilization: default_utilization(),
            default_year_built: default_year_built(),
            default_sqft: default_sqft(),
        }
    }
}

pub fn default_uplift() -> f64 {
    1.20
}

pub fn default_low_opportunity_factor() -> f64 {
    0.3
}

pub fn default_vacancy() -> f64 {
    0.15
}

pub fn default_utilization() -> f64 {
    0.60
}

pub fn default_year_built() -> f64 {
    1982.0
}

pub fn default_sqft() -> f64 {
    89_000.0
}

pub fn default_bounds() -> TypeTable<SavingsBounds> {
    use BuildingType::*;
    let b = SavingsBounds::new;
    [
        (Office, b(0.20, 0.40)),
        (MedicalOffice, b(0.20, 0.40)),
        (MixedUse, b(0.18, 0.38)),
        (StripMall, b(0.15, 0.35)),
        (K12School, b(0.20, 0.45)),
        (HigherEd, b(0.20, 0.45)),
        (PreschoolDaycare, b(0.18, 0.38)),
        (RetailStore, b(0.15, 0.35)),
        (Supermarket, b(0.10, 0.25)),
        (WholesaleClub, b(0.10, 0.25)),
        (EnclosedMall, b(0.12, 0.30)),
        (Hotel, b(0.15, 0.35)),
        (RestaurantBar, b(0.10, 0.25)),
        (Gym, b(0.15, 0.35)),
        (EventSpace, b(0.20, 0.45)),
        (Venue, b(0.20, 0.45)),
        (Theater, b(0.18, 0.40)),
        (ArtsCulture, b(0.15, 0.35)),
        (LibraryMuseum, b(0.12, 0.28)),
        (BankBranch, b(0.12, 0.28)),
        (VehicleDealership, b(0.15, 0.35)),
        (Courthouse, b(0.10, 0.25)),
        (PublicService, b(0.10, 0.25)),
        (OutpatientClinic, b(0.15, 0.32)),
        (SportsGaming, b(0.18, 0.40)),
        (InpatientHospital, b(0.05, 0.15)),
        (SpecialtyHospital, b(0.05, 0.15)),
        (ResidentialCare, b(0.05, 0.15)),
        (Laboratory, b(0.05, 0.15)),
        (PoliceStation, b(0.05, 0.15)),
        (FireStation, b(0.05, 0.15)),
        (PublicTransit, b(0.05, 0.15)),
        (DataCenter, b(0.0, 0.0)),
    ]
    .into_iter()
    .fold(TypeTable::new(b(0.15, 0.35)), |table, (kind, bounds)| {
        table.with(kind, bounds)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_clamp() {
        let bounds = SavingsBounds::new(0.20, 0.40);
        assert_eq!(bounds.clamp(0.5), 0.40);
        assert_eq!(bounds.clamp(0.1), 0.20);
        assert_eq!(bounds.clamp(0.3), 0.3);
    }

    #[test]
    fn test_default_bounds_table() {
        let table = default_bounds();
        assert_eq!(
            *table.resolve(&BuildingType::Office).value,
            SavingsBounds::new(0.20, 0.40)
        );
        assert_eq!(
            *table.resolve(&BuildingType::DataCenter).value,
            SavingsBounds::new(0.0, 0.0)
        );
        assert_eq!(
            *table.resolve(&BuildingType::Other("Warehouse".into())).value,
            SavingsBounds::new(0.15, 0.35)
        );
    }
}
