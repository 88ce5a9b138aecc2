//! Typed per-row view of a building.
//!
//! A [`BuildingRecord`] is parsed fresh from the table before every stage
//! pass, so each stage sees the values written by the stages before it.

use super::building_type::{BuildingType, ClimateZone};
use super::columns as col;
use super::fuel::{Fuel, KBTU_PER_KWH};
use super::value::{parse_number, parse_text};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingRecord {
    pub id: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub building_type: Option<BuildingType>,
    pub climate_zone: Option<ClimateZone>,
    values: HashMap<&'static str, f64>,
}

impl BuildingRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Build a record from a cell accessor (column name to raw text).
    pub fn from_cells<'a, F>(cell: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let text = |column: &str| cell(column).and_then(parse_text).map(str::to_string);

        let values = col::NUMERIC_COLUMNS
            .iter()
            .filter_map(|&column| {
                cell(column)
                    .and_then(parse_number)
                    .map(|value| (column, value))
            })
            .collect();

        Self {
            id: text(col::ID_BUILDING).unwrap_or_default(),
            city: text(col::LOC_CITY),
            state: text(col::LOC_STATE),
            building_type: text(col::BLDG_TYPE).map(|name| BuildingType::parse(&name)),
            climate_zone: cell(col::CLIMATE_ZONE).and_then(ClimateZone::parse),
            values,
        }
    }

    pub fn with_type(mut self, building_type: BuildingType) -> Self {
        self.building_type = Some(building_type);
        self
    }

    pub fn with_location(mut self, city: &str, state: &str) -> Self {
        self.city = Some(city.to_string());
        self.state = Some(state.to_string());
        self
    }

    pub fn with_climate_zone(mut self, zone: ClimateZone) -> Self {
        self.climate_zone = Some(zone);
        self
    }

    pub fn with_value(mut self, column: &'static str, value: f64) -> Self {
        self.set(column, Some(value));
        self
    }

    pub fn set(&mut self, column: &'static str, value: Option<f64>) {
        match value {
            Some(v) if v.is_finite() => {
                self.values.insert(column, v);
            }
            _ => {
                self.values.remove(column);
            }
        }
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    /// Value only when strictly positive.
    pub fn positive(&self, column: &str) -> Option<f64> {
        self.value(column).filter(|v| *v > 0.0)
    }

    pub fn energy(&self, fuel: Fuel) -> Option<f64> {
        self.value(fuel.energy_column())
    }

    pub fn post_energy(&self, fuel: Fuel) -> Option<f64> {
        self.value(fuel.post_energy_column())
    }

    /// Fuels the building actually consumes.
    pub fn fuels_in_use(&self) -> impl Iterator<Item = Fuel> + '_ {
        Fuel::ALL
            .into_iter()
            .filter(move |fuel| self.positive(fuel.energy_column()).is_some())
    }

    /// Annual electricity in kWh, derived from kBtu when the kWh column is blank.
    pub fn elec_kwh(&self) -> Option<f64> {
        self.positive(col::ELEC_KWH)
            .or_else(|| self.positive(col::ELEC_KBTU).map(|kbtu| kbtu / KBTU_PER_KWH))
    }

    pub fn building_type_or_other(&self) -> BuildingType {
        self.building_type
            .clone()
            .unwrap_or_else(|| BuildingType::Other(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record_from(cells: &[(&str, &'static str)]) -> BuildingRecord {
        let map: HashMap<String, &'static str> =
            cells.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        BuildingRecord::from_cells(|column| map.get(column).copied())
    }

    #[test]
    fn test_from_cells_parses_identity_and_numbers() {
        let record = record_from(&[
            ("id_building", "B-1"),
            ("loc_city", " Boston "),
            ("loc_state", "MA"),
            ("bldg_type", "Restaurant/Bar"),
            ("energy_climate_zone", "Northern"),
            ("energy_elec_kbtu", "1,000"),
            ("energy_gas_kbtu", "NaN"),
        ]);

        assert_eq!(record.id, "B-1");
        assert_eq!(record.city.as_deref(), Some("Boston"));
        assert_eq!(record.building_type, Some(BuildingType::RestaurantBar));
        assert_eq!(record.climate_zone, Some(ClimateZone::Northern));
        assert_eq!(record.energy(Fuel::Electricity), Some(1000.0));
        assert_eq!(record.energy(Fuel::Gas), None);
    }

    #[test]
    fn test_elec_kwh_falls_back_to_kbtu() {
        let record = BuildingRecord::new("B").with_value(col::ELEC_KBTU, 3412.0);
        let kwh = record.elec_kwh().unwrap();
        assert!((kwh - 1000.0).abs() < 1e-9);

        let explicit = record.with_value(col::ELEC_KWH, 900.0);
        assert_eq!(explicit.elec_kwh(), Some(900.0));
    }

    #[test]
    fn test_fuels_in_use_ignores_zero_and_missing() {
        let record = BuildingRecord::new("B")
            .with_value(col::ELEC_KBTU, 10.0)
            .with_value(col::GAS_KBTU, 0.0)
            .with_value(col::STEAM_KBTU, 5.0);
        let fuels: Vec<_> = record.fuels_in_use().collect();
        assert_eq!(fuels, vec![Fuel::Electricity, Fuel::Steam]);
    }

    #[test]
    fn test_set_none_clears_value() {
        let mut record = BuildingRecord::new("B").with_value(col::BLDG_SQFT, 1.0);
        record.set(col::BLDG_SQFT, None);
        assert_eq!(record.value(col::BLDG_SQFT), None);
    }
}
