//! Occupancy profiles by building type.
//!
//! Vacancy-driven types carry both a vacancy and a utilization table.
//! Utilization-driven types carry only utilization; their vacancy is always
//! written as zero. Hotels and residential care scale a room-occupancy figure
//! by how much of the day occupants are actually present.

use super::lookup::{GeoTable, Resolution, Resolved};
use crate::core::BuildingType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyProfile {
    #[serde(default)]
    pub vacancy: Option<GeoTable<f64>>,
    pub utilization: GeoTable<f64>,
    #[serde(default = "default_presence_factor")]
    pub presence_factor: f64,
}

pub fn default_presence_factor() -> f64 {
    1.0
}

/// Resolved occupancy for one building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupancy {
    pub vacancy: f64,
    pub utilization: f64,
    pub resolution: Resolution,
}

impl OccupancyProfile {
    fn utilization_only(table: GeoTable<f64>) -> Self {
        Self {
            vacancy: None,
            utilization: table,
            presence_factor: default_presence_factor(),
        }
    }

    fn vacancy_driven(vacancy: GeoTable<f64>, utilization: GeoTable<f64>) -> Self {
        Self {
            vacancy: Some(vacancy),
            utilization,
            presence_factor: default_presence_factor(),
        }
    }

    fn with_presence(mut self, factor: f64) -> Self {
        self.presence_factor = factor;
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            vacancy: self.vacancy.map(GeoTable::normalized),
            utilization: self.utilization.normalized(),
            presence_factor: self.presence_factor,
        }
    }

    /// Resolve occupancy for a location. Values are clamped to [0, 1].
    pub fn resolve(&self, city: Option<&str>, state: Option<&str>) -> Occupancy {
        let utilization: Resolved<&f64> = self.utilization.resolve(city, state);
        let (vacancy, resolution) = match &self.vacancy {
            Some(table) => {
                let vacancy = table.resolve(city, state);
                (
                    *vacancy.value,
                    utilization.resolution.widen(vacancy.resolution),
                )
            }
            None => (0.0, utilization.resolution),
        };

        Occupancy {
            vacancy: vacancy.clamp(0.0, 1.0),
            utilization: (utilization.value * self.presence_factor).clamp(0.0, 1.0),
            resolution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyConfig {
    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, OccupancyProfile>,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

impl OccupancyConfig {
    pub fn profile(&self, building_type: &BuildingType) -> Option<&OccupancyProfile> {
        self.profiles.get(&building_type.as_str().to_lowercase())
    }

    pub fn normalized(self) -> Self {
        Self {
            profiles: self
                .profiles
                .into_iter()
                .map(|(name, profile)| (name.trim().to_lowercase(), profile.normalized()))
                .collect(),
        }
    }
}

fn geo(default: f64, cities: &[(&str, f64)], states: &[(&str, f64)]) -> GeoTable<f64> {
    let table = cities
        .iter()
        .fold(GeoTable::new(default), |t, (city, v)| t.with_city(city, *v));
    states
        .iter()
        .fold(table, |t, (state, v)| t.with_state(state, *v))
}

/// Split (vacancy, utilization) city pairs into two tables.
fn paired(
    default: (f64, f64),
    cities: &[(&str, f64, f64)],
    states: &[(&str, f64, f64)],
) -> (GeoTable<f64>, GeoTable<f64>) {
    let vac_cities: Vec<_> = cities.iter().map(|(c, v, _)| (*c, *v)).collect();
    let util_cities: Vec<_> = cities.iter().map(|(c, _, u)| (*c, *u)).collect();
    let vac_states: Vec<_> = states.iter().map(|(s, v, _)| (*s, *v)).collect();
    let util_states: Vec<_> = states.iter().map(|(s, _, u)| (*s, *u)).collect();
    (
        geo(default.0, &vac_cities, &vac_states),
        geo(default.1, &util_cities, &util_states),
    )
}

pub fn default_profiles() -> BTreeMap<String, OccupancyProfile> {
    let mut profiles = BTreeMap::new();
    let mut add = |kind: BuildingType, profile: OccupancyProfile| {
        profiles.insert(kind.as_str().to_lowercase(), profile);
    };

    let (vac, util) = paired(
        (0.20, 0.42),
        &[
            ("San Francisco", 0.34, 0.38),
            ("San Diego", 0.16, 0.45),
            ("Los Angeles", 0.239, 0.48),
            ("San Jose", 0.222, 0.49),
            ("Sacramento", 0.188, 0.43),
            ("Portland", 0.266, 0.34),
            ("New York", 0.15, 0.55),
            ("Washington", 0.224, 0.34),
            ("Boston", 0.236, 0.42),
            ("Atlanta", 0.25, 0.48),
            ("Denver", 0.26, 0.39),
            ("Seattle", 0.27, 0.42),
            ("Chicago", 0.255, 0.37),
            ("Philadelphia", 0.193, 0.44),
            ("Kansas City", 0.178, 0.49),
            ("St. Louis", 0.33, 0.40),
            ("Orlando", 0.20, 0.45),
            ("Cambridge", 0.12, 0.42),
            ("Oakland", 0.24, 0.38),
            ("Berkeley", 0.21, 0.38),
            ("Irvine", 0.15, 0.48),
            ("Long Beach", 0.10, 0.48),
            ("Pasadena", 0.15, 0.48),
            ("Fresno", 0.12, 0.43),
        ],
        &[],
    );
    add(BuildingType::Office, OccupancyProfile::vacancy_driven(vac, util));

    let (vac, util) = paired(
        (0.095, 0.55),
        &[
            ("New York", 0.08, 0.58),
            ("Los Angeles", 0.106, 0.55),
            ("San Francisco", 0.12, 0.52),
            ("Chicago", 0.10, 0.54),
            ("Boston", 0.09, 0.56),
            ("Washington", 0.10, 0.52),
            ("Seattle", 0.11, 0.54),
            ("Denver", 0.10, 0.55),
            ("Atlanta", 0.11, 0.56),
            ("Philadelphia", 0.09, 0.55),
            ("San Diego", 0.10, 0.56),
            ("Houston", 0.10, 0.58),
        ],
        &[
            ("CA", 0.11, 0.54),
            ("TX", 0.10, 0.57),
            ("FL", 0.10, 0.57),
            ("NY", 0.09, 0.56),
            ("PA", 0.09, 0.55),
            ("IL", 0.10, 0.54),
            ("MA", 0.09, 0.55),
            ("GA", 0.11, 0.56),
            ("WA", 0.11, 0.54),
            ("CO", 0.10, 0.55),
        ],
    );
    add(
        BuildingType::MedicalOffice,
        OccupancyProfile::vacancy_driven(vac, util),
    );

    let (vac, util) = paired(
        (0.22, 0.45),
        &[
            ("San Francisco", 0.30, 0.40),
            ("Los Angeles", 0.22, 0.46),
            ("New York", 0.14, 0.52),
            ("Chicago", 0.24, 0.38),
            ("Boston", 0.22, 0.44),
            ("Washington", 0.21, 0.36),
            ("Seattle", 0.25, 0.44),
            ("Denver", 0.24, 0.40),
        ],
        &[
            ("CA", 0.22, 0.44),
            ("NY", 0.16, 0.50),
            ("TX", 0.23, 0.47),
            ("IL", 0.23, 0.40),
            ("MA", 0.21, 0.44),
            ("CO", 0.24, 0.42),
        ],
    );
    add(BuildingType::MixedUse, OccupancyProfile::vacancy_driven(vac, util));

    let (vac, util) = paired((0.10, 0.40), &[], &[]);
    add(BuildingType::StripMall, OccupancyProfile::vacancy_driven(vac, util));

    add(
        BuildingType::Hotel,
        OccupancyProfile::utilization_only(geo(
            0.63,
            &[
                ("New York", 0.87),
                ("Miami", 0.83),
                ("Seattle", 0.82),
                ("Boston", 0.78),
                ("San Francisco", 0.75),
                ("Los Angeles", 0.74),
                ("Chicago", 0.72),
                ("Washington", 0.71),
                ("San Diego", 0.73),
                ("Denver", 0.68),
                ("Atlanta", 0.70),
                ("Philadelphia", 0.69),
                ("Portland", 0.65),
                ("Phoenix", 0.55),
                ("Houston", 0.56),
                ("Orlando", 0.75),
            ],
            &[
                ("NY", 0.80),
                ("CA", 0.68),
                ("FL", 0.72),
                ("TX", 0.62),
                ("IL", 0.68),
                ("MA", 0.75),
                ("WA", 0.72),
                ("CO", 0.65),
                ("DC", 0.71),
                ("NV", 0.75),
            ],
        ))
        .with_presence(0.45),
    );

    add(
        BuildingType::ResidentialCare,
        OccupancyProfile::utilization_only(geo(
            0.87,
            &[
                ("Boston", 0.91),
                ("San Francisco", 0.87),
                ("New York", 0.87),
                ("Los Angeles", 0.86),
                ("Chicago", 0.85),
            ],
            &[("MA", 0.90), ("CA", 0.86), ("NY", 0.86), ("FL", 0.88)],
        ))
        .with_presence(0.95),
    );

    add(
        BuildingType::RestaurantBar,
        OccupancyProfile::utilization_only(geo(
            0.37,
            &[
                ("Boston", 0.40),
                ("New York", 0.42),
                ("Washington", 0.38),
                ("Los Angeles", 0.40),
                ("Denver", 0.38),
                ("Chicago", 0.40),
                ("Cambridge", 0.38),
                ("Atlanta", 0.38),
                ("Irvine", 0.36),
                ("Sacramento", 0.36),
                ("San Diego", 0.38),
                ("San Mateo", 0.38),
            ],
            &[
                ("MA", 0.39),
                ("NY", 0.41),
                ("CA", 0.37),
                ("DC", 0.38),
                ("CO", 0.37),
                ("IL", 0.39),
                ("GA", 0.37),
                ("TX", 0.36),
                ("FL", 0.37),
            ],
        )),
    );

    add(
        BuildingType::Venue,
        OccupancyProfile::utilization_only(geo(
            0.17,
            &[
                ("Boston", 0.20),
                ("New York", 0.22),
                ("Chicago", 0.19),
                ("Denver", 0.18),
                ("Washington", 0.19),
                ("Los Angeles", 0.20),
                ("Cambridge", 0.18),
                ("San Diego", 0.17),
                ("Sacramento", 0.16),
                ("Kansas City", 0.17),
                ("Fresno", 0.15),
                ("Riverside", 0.15),
                ("Ontario", 0.15),
                ("Stanford", 0.18),
            ],
            &[
                ("MA", 0.19),
                ("NY", 0.21),
                ("CA", 0.17),
                ("IL", 0.18),
                ("CO", 0.18),
                ("DC", 0.18),
                ("TX", 0.17),
                ("FL", 0.17),
            ],
        )),
    );

    add(
        BuildingType::RetailStore,
        OccupancyProfile::utilization_only(geo(
            0.40,
            &[
                ("New York", 0.48),
                ("San Francisco", 0.45),
                ("Chicago", 0.45),
                ("Boston", 0.45),
                ("Washington", 0.44),
                ("Seattle", 0.43),
                ("Philadelphia", 0.43),
                ("Los Angeles", 0.40),
                ("Atlanta", 0.38),
                ("Minneapolis", 0.35),
            ],
            &[
                ("NY", 0.45),
                ("CA", 0.40),
                ("IL", 0.42),
                ("TX", 0.38),
                ("MA", 0.44),
                ("WA", 0.42),
            ],
        )),
    );

    add(
        BuildingType::EnclosedMall,
        OccupancyProfile::utilization_only(geo(
            0.40,
            &[
                ("Los Angeles", 0.42),
                ("Chicago", 0.40),
                ("Cambridge", 0.44),
                ("Boston", 0.44),
                ("Denver", 0.38),
            ],
            &[
                ("CA", 0.40),
                ("IL", 0.39),
                ("MA", 0.43),
                ("CO", 0.38),
                ("NY", 0.42),
            ],
        )),
    );

    add(
        BuildingType::Supermarket,
        OccupancyProfile::utilization_only(geo(
            0.48,
            &[
                ("New York", 0.55),
                ("San Francisco", 0.52),
                ("Chicago", 0.52),
                ("Boston", 0.53),
                ("Washington", 0.50),
                ("Los Angeles", 0.48),
                ("Houston", 0.45),
            ],
            &[
                ("NY", 0.52),
                ("CA", 0.48),
                ("TX", 0.45),
                ("IL", 0.50),
                ("MA", 0.52),
            ],
        )),
    );

    add(
        BuildingType::WholesaleClub,
        OccupancyProfile::utilization_only(geo(
            0.33,
            &[
                ("New York", 0.38),
                ("Los Angeles", 0.35),
                ("Chicago", 0.36),
                ("Denver", 0.34),
                ("San Jose", 0.35),
                ("Sacramento", 0.33),
                ("Fresno", 0.30),
            ],
            &[("NY", 0.36), ("CA", 0.34), ("TX", 0.32), ("IL", 0.35)],
        )),
    );

    add(
        BuildingType::Theater,
        OccupancyProfile::utilization_only(geo(
            0.16,
            &[
                ("New York", 0.22),
                ("Chicago", 0.18),
                ("Los Angeles", 0.16),
                ("Boston", 0.18),
                ("San Francisco", 0.18),
                ("Washington", 0.18),
            ],
            &[("NY", 0.20), ("CA", 0.16), ("IL", 0.17), ("MA", 0.17)],
        )),
    );

    add(
        BuildingType::LibraryMuseum,
        OccupancyProfile::utilization_only(geo(
            0.28,
            &[
                ("Boston", 0.32),
                ("Washington", 0.35),
                ("New York", 0.36),
                ("Chicago", 0.32),
                ("Denver", 0.30),
                ("Los Angeles", 0.32),
            ],
            &[("MA", 0.31), ("NY", 0.34), ("CA", 0.28), ("DC", 0.34)],
        )),
    );

    add(
        BuildingType::InpatientHospital,
        OccupancyProfile::utilization_only(geo(
            0.56,
            &[
                ("New York", 0.62),
                ("Boston", 0.60),
                ("Chicago", 0.58),
                ("Los Angeles", 0.57),
                ("Philadelphia", 0.58),
                ("San Francisco", 0.58),
            ],
            &[
                ("NY", 0.60),
                ("MA", 0.59),
                ("IL", 0.57),
                ("CA", 0.56),
                ("PA", 0.58),
            ],
        )),
    );

    add(
        BuildingType::SpecialtyHospital,
        OccupancyProfile::utilization_only(geo(
            0.74,
            &[
                ("New York", 0.82),
                ("Boston", 0.80),
                ("Houston", 0.78),
                ("Cleveland", 0.80),
                ("Baltimore", 0.78),
            ],
            &[("NY", 0.78), ("MA", 0.78), ("TX", 0.75), ("OH", 0.76)],
        )),
    );

    add(
        BuildingType::OutpatientClinic,
        OccupancyProfile::utilization_only(geo(
            0.44,
            &[
                ("Boston", 0.48),
                ("Atlanta", 0.45),
                ("Denver", 0.44),
                ("Chicago", 0.46),
                ("Washington", 0.46),
            ],
            &[("MA", 0.47), ("GA", 0.44), ("IL", 0.45), ("CA", 0.43)],
        )),
    );

    add(
        BuildingType::K12School,
        OccupancyProfile::utilization_only(geo(
            0.22,
            &[],
            &[
                ("CA", 0.28),
                ("AZ", 0.27),
                ("TX", 0.26),
                ("FL", 0.26),
                ("NY", 0.25),
                ("IL", 0.24),
                ("MA", 0.24),
                ("DC", 0.25),
                ("WA", 0.22),
                ("CO", 0.22),
                ("MN", 0.21),
            ],
        )),
    );

    add(
        BuildingType::HigherEd,
        OccupancyProfile::utilization_only(geo(
            0.26,
            &[],
            &[
                ("CA", 0.30),
                ("FL", 0.29),
                ("TX", 0.28),
                ("MA", 0.26),
                ("NY", 0.27),
                ("IL", 0.26),
                ("DC", 0.27),
                ("CO", 0.25),
            ],
        )),
    );

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OccupancyConfig {
        OccupancyConfig::default()
    }

    #[test]
    fn test_venue_unlisted_city_uses_state() {
        let profile = config().profile(&BuildingType::Venue).cloned().unwrap();
        let occupancy = profile.resolve(Some("Aurora"), Some("CO"));
        assert_eq!(occupancy.utilization, 0.18);
        assert_eq!(occupancy.vacancy, 0.0);
        assert_eq!(occupancy.resolution, Resolution::Fallback);
    }

    #[test]
    fn test_restaurant_in_boston() {
        let profile = config()
            .profile(&BuildingType::RestaurantBar)
            .cloned()
            .unwrap();
        let occupancy = profile.resolve(Some("Boston"), Some("MA"));
        assert_eq!(occupancy.utilization, 0.40);
        assert_eq!(occupancy.vacancy, 0.0);
        assert_eq!(occupancy.resolution, Resolution::Exact);
    }

    #[test]
    fn test_hotel_scales_by_guest_presence() {
        let profile = config().profile(&BuildingType::Hotel).cloned().unwrap();
        let occupancy = profile.resolve(Some("New York"), Some("NY"));
        assert!((occupancy.utilization - 0.87 * 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_office_reports_broadest_scope() {
        let profile = config().profile(&BuildingType::Office).cloned().unwrap();
        let occupancy = profile.resolve(Some("Nowhere"), Some("ZZ"));
        assert_eq!(occupancy.vacancy, 0.20);
        assert_eq!(occupancy.utilization, 0.42);
        assert_eq!(occupancy.resolution, Resolution::Default);
    }

    #[test]
    fn test_unprofiled_type_has_no_profile() {
        assert!(config().profile(&BuildingType::Gym).is_none());
    }
}
