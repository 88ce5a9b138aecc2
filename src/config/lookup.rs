//! Geography and building-type lookup tables.
//!
//! Every parameter that varies by place resolves through the same chain:
//! the building's city, then its state, then a global default. The scope that
//! answered is reported with the value so stages can count fallbacks.

use crate::core::BuildingType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which scope of a lookup chain produced a value.
///
/// Ordered from narrowest to broadest, so the broadest scope used by a row is
/// simply the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resolution {
    Exact,
    Fallback,
    Default,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Exact => "exact",
            Resolution::Fallback => "fallback",
            Resolution::Default => "default",
        }
    }

    pub fn widen(self, other: Resolution) -> Resolution {
        self.max(other)
    }
}

/// A looked-up value and the scope it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub resolution: Resolution,
}

impl<T> Resolved<T> {
    pub fn new(value: T, resolution: Resolution) -> Self {
        Self { value, resolution }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            resolution: self.resolution,
        }
    }
}

/// Pure function to normalize a city key: trimmed, lower-case, single spaces.
///
/// A state-qualified key is re-joined as `"city, st"` whatever the spacing
/// around the comma was.
pub fn normalize_city(city: &str) -> String {
    match city.split_once(',') {
        Some((name, state)) => format!(
            "{}, {}",
            collapse_whitespace(name),
            collapse_whitespace(state)
        ),
        None => collapse_whitespace(city),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Pure function to normalize a two-letter state code.
pub fn normalize_state(state: &str) -> String {
    state.trim().to_uppercase()
}

/// City → state → global default table.
///
/// City keys may be plain (`"Portland"`) or state-qualified (`"Portland, OR"`);
/// a qualified key wins over a plain one when the row carries a state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTable<T> {
    #[serde(default = "BTreeMap::new")]
    pub cities: BTreeMap<String, T>,
    #[serde(default = "BTreeMap::new")]
    pub states: BTreeMap<String, T>,
    pub default: T,
}

impl<T> GeoTable<T> {
    pub fn new(default: T) -> Self {
        Self {
            cities: BTreeMap::new(),
            states: BTreeMap::new(),
            default,
        }
    }

    pub fn with_city(mut self, city: &str, value: T) -> Self {
        self.cities.insert(normalize_city(city), value);
        self
    }

    pub fn with_state(mut self, state: &str, value: T) -> Self {
        self.states.insert(normalize_state(state), value);
        self
    }

    /// Re-key a table loaded from a config file so lookups are case-insensitive.
    pub fn normalized(self) -> Self {
        Self {
            cities: self
                .cities
                .into_iter()
                .map(|(city, value)| (normalize_city(&city), value))
                .collect(),
            states: self
                .states
                .into_iter()
                .map(|(state, value)| (normalize_state(&state), value))
                .collect(),
            default: self.default,
        }
    }

    pub fn resolve(&self, city: Option<&str>, state: Option<&str>) -> Resolved<&T> {
        let state = state.map(normalize_state).filter(|s| !s.is_empty());

        if let Some(city) = city.map(normalize_city).filter(|c| !c.is_empty()) {
            let qualified = state
                .as_ref()
                .and_then(|s| self.cities.get(&format!("{city}, {}", s.to_lowercase())));
            if let Some(value) = qualified.or_else(|| self.cities.get(&city)) {
                return Resolved::new(value, Resolution::Exact);
            }
        }

        if let Some(value) = state.as_ref().and_then(|s| self.states.get(s)) {
            return Resolved::new(value, Resolution::Fallback);
        }

        Resolved::new(&self.default, Resolution::Default)
    }

    /// Every value in the table, for validation.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cities
            .values()
            .chain(self.states.values())
            .chain(std::iter::once(&self.default))
    }
}

/// Building type → parameters, with a global default entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTable<T> {
    #[serde(default = "BTreeMap::new")]
    pub types: BTreeMap<String, T>,
    pub default: T,
}

impl<T> TypeTable<T> {
    pub fn new(default: T) -> Self {
        Self {
            types: BTreeMap::new(),
            default,
        }
    }

    pub fn with(mut self, building_type: BuildingType, value: T) -> Self {
        self.types
            .insert(building_type.as_str().to_lowercase(), value);
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            types: self
                .types
                .into_iter()
                .map(|(name, value)| (name.trim().to_lowercase(), value))
                .collect(),
            default: self.default,
        }
    }

    pub fn get(&self, building_type: &BuildingType) -> Option<&T> {
        self.types.get(&building_type.as_str().to_lowercase())
    }

    pub fn resolve(&self, building_type: &BuildingType) -> Resolved<&T> {
        match self.get(building_type) {
            Some(value) => Resolved::new(value, Resolution::Exact),
            None => Resolved::new(&self.default, Resolution::Default),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.types.values().chain(std::iter::once(&self.default))
    }
}
