//! Building type classification.
//!
//! The portfolio uses a fixed vocabulary of building types. Names outside it
//! are kept verbatim as [`BuildingType::Other`] so lookups can still fall back
//! to the global defaults.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildingType {
    Office,
    MedicalOffice,
    MixedUse,
    StripMall,
    RetailStore,
    EnclosedMall,
    Supermarket,
    WholesaleClub,
    Hotel,
    RestaurantBar,
    K12School,
    HigherEd,
    PreschoolDaycare,
    Venue,
    EventSpace,
    Theater,
    ArtsCulture,
    LibraryMuseum,
    Gym,
    SportsGaming,
    BankBranch,
    VehicleDealership,
    Courthouse,
    PublicService,
    OutpatientClinic,
    InpatientHospital,
    SpecialtyHospital,
    ResidentialCare,
    Laboratory,
    PoliceStation,
    FireStation,
    PublicTransit,
    DataCenter,
    Other(String),
}

/// Which occupancy figure drives the ODCV opportunity for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancySignal {
    /// Multi-tenant buildings: empty suites dominate.
    Vacancy,
    /// Owner-occupied or schedule-driven buildings.
    Utilization,
}

/// Portfolio vertical a building type rolls up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Commercial,
    Education,
    Healthcare,
    Hospitality,
    Government,
}

impl Vertical {
    pub fn as_str(self) -> &'static str {
        match self {
            Vertical::Commercial => "Commercial",
            Vertical::Education => "Education",
            Vertical::Healthcare => "Healthcare",
            Vertical::Hospitality => "Hospitality",
            Vertical::Government => "Government",
        }
    }
}

const NAMED: &[(&str, BuildingType)] = &[
    ("Office", BuildingType::Office),
    ("Medical Office", BuildingType::MedicalOffice),
    ("Mixed Use", BuildingType::MixedUse),
    ("Strip Mall", BuildingType::StripMall),
    ("Retail Store", BuildingType::RetailStore),
    ("Enclosed Mall", BuildingType::EnclosedMall),
    ("Supermarket/Grocery", BuildingType::Supermarket),
    ("Wholesale Club", BuildingType::WholesaleClub),
    ("Hotel", BuildingType::Hotel),
    ("Restaurant/Bar", BuildingType::RestaurantBar),
    ("K-12 School", BuildingType::K12School),
    ("Higher Ed", BuildingType::HigherEd),
    ("Preschool/Daycare", BuildingType::PreschoolDaycare),
    ("Venue", BuildingType::Venue),
    ("Event Space", BuildingType::EventSpace),
    ("Theater", BuildingType::Theater),
    ("Arts & Culture", BuildingType::ArtsCulture),
    ("Library/Museum", BuildingType::LibraryMuseum),
    ("Gym", BuildingType::Gym),
    ("Sports/Gaming Center", BuildingType::SportsGaming),
    ("Bank Branch", BuildingType::BankBranch),
    ("Vehicle Dealership", BuildingType::VehicleDealership),
    ("Courthouse", BuildingType::Courthouse),
    ("Public Service", BuildingType::PublicService),
    ("Outpatient Clinic", BuildingType::OutpatientClinic),
    ("Inpatient Hospital", BuildingType::InpatientHospital),
    ("Specialty Hospital", BuildingType::SpecialtyHospital),
    ("Residential Care Facility", BuildingType::ResidentialCare),
    ("Laboratory", BuildingType::Laboratory),
    ("Police Station", BuildingType::PoliceStation),
    ("Fire Station", BuildingType::FireStation),
    ("Public Transit", BuildingType::PublicTransit),
    ("Data Center", BuildingType::DataCenter),
];

impl BuildingType {
    /// Parse a `bldg_type` cell. Matching is case-insensitive on the canonical name.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        NAMED
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(trimmed))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| BuildingType::Other(trimmed.to_string()))
    }

    /// Canonical name, as written in the table and used as a lookup key.
    pub fn as_str(&self) -> &str {
        match self {
            BuildingType::Other(name) => name,
            known => NAMED
                .iter()
                .find(|(_, kind)| kind == known)
                .map(|(label, _)| *label)
                .unwrap_or_default(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BuildingType::Other(_))
    }

    pub fn occupancy_signal(&self) -> OccupancySignal {
        match self {
            BuildingType::Office
            | BuildingType::MedicalOffice
            | BuildingType::MixedUse
            | BuildingType::StripMall => OccupancySignal::Vacancy,
            _ => OccupancySignal::Utilization,
        }
    }

    /// Continuously occupied or process-heavy types where ventilation cannot
    /// follow occupancy closely.
    pub fn is_low_opportunity(&self) -> bool {
        matches!(
            self,
            BuildingType::InpatientHospital
                | BuildingType::SpecialtyHospital
                | BuildingType::ResidentialCare
                | BuildingType::Laboratory
                | BuildingType::PoliceStation
                | BuildingType::FireStation
                | BuildingType::PublicTransit
        )
    }

    /// Income-producing types valued by capitalization.
    pub fn is_commercial(&self) -> bool {
        match self {
            BuildingType::Office
            | BuildingType::MedicalOffice
            | BuildingType::MixedUse
            | BuildingType::RetailStore
            | BuildingType::StripMall
            | BuildingType::Hotel
            | BuildingType::Supermarket
            | BuildingType::EnclosedMall
            | BuildingType::RestaurantBar
            | BuildingType::Gym
            | BuildingType::VehicleDealership
            | BuildingType::WholesaleClub
            | BuildingType::BankBranch
            | BuildingType::Venue
            | BuildingType::Theater
            | BuildingType::SportsGaming => true,
            BuildingType::Other(name) => name.eq_ignore_ascii_case("Outlet Mall"),
            _ => false,
        }
    }

    pub fn vertical(&self) -> Option<Vertical> {
        let vertical = match self {
            BuildingType::K12School | BuildingType::HigherEd | BuildingType::PreschoolDaycare => {
                Vertical::Education
            }
            BuildingType::OutpatientClinic
            | BuildingType::InpatientHospital
            | BuildingType::SpecialtyHospital
            | BuildingType::ResidentialCare
            | BuildingType::Laboratory
            | BuildingType::MedicalOffice => Vertical::Healthcare,
            BuildingType::Hotel | BuildingType::RestaurantBar => Vertical::Hospitality,
            BuildingType::Courthouse
            | BuildingType::PublicService
            | BuildingType::PoliceStation
            | BuildingType::FireStation
            | BuildingType::PublicTransit
            | BuildingType::LibraryMuseum => Vertical::Government,
            BuildingType::Other(_) => return None,
            _ => Vertical::Commercial,
        };
        Some(vertical)
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ENERGY STAR climate region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateZone {
    Northern,
    NorthCentral,
    SouthCentral,
    Southern,
}

impl ClimateZone {
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "northern" => Some(ClimateZone::Northern),
            "north central" => Some(ClimateZone::NorthCentral),
            "south central" => Some(ClimateZone::SouthCentral),
            "southern" => Some(ClimateZone::Southern),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClimateZone::Northern => "Northern",
            ClimateZone::NorthCentral => "North-Central",
            ClimateZone::SouthCentral => "South-Central",
            ClimateZone::Southern => "Southern",
        }
    }
}
