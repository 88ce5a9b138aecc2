//! Configuration validation with error accumulation.
//!
//! Each rule group returns a stillwater `Validation`, and the groups are
//! combined so a bad config file is reported in full in one pass rather than
//! one field at a time.

use super::hvac::HvacConfig;
use super::lookup::GeoTable;
use super::occupancy::OccupancyConfig;
use super::odcv::OdcvConfig;
use super::rates::RateSchedule;
use super::OdcvmapConfig;
use crate::errors::ConfigError;
use std::fmt;
use stillwater::{NonEmptyVec, Validation};

/// One rule violation, with the dotted path of the offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result carrying every violation found.
pub type ConfigValidation<T> = Validation<T, NonEmptyVec<ValidationError>>;

fn from_errors(errors: Vec<ValidationError>) -> ConfigValidation<()> {
    NonEmptyVec::from_vec(errors).map_or(Validation::Success(()), Validation::Failure)
}

/// Combine validations, keeping the errors of every failed one.
fn combine(validations: Vec<ConfigValidation<()>>) -> ConfigValidation<()> {
    let errors = validations
        .into_iter()
        .flat_map(|validation| match validation {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        })
        .collect();
    from_errors(errors)
}

fn fraction(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::new(field, format!("{value} outside [0, 1]")));
    }
}

fn positive(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if value <= 0.0 {
        errors.push(ValidationError::new(
            field,
            format!("must be positive, got {value}"),
        ));
    }
}

/// Validate an entire config, accumulating every violation.
pub fn validate(config: &OdcvmapConfig) -> ConfigValidation<()> {
    combine(vec![
        validate_rates(&config.rates),
        validate_odcv(&config.odcv),
        validate_occupancy(&config.occupancy),
        validate_hvac(&config.hvac),
        validate_geo_keys(config),
        validate_factors(config),
    ])
}

/// Validate with a `Result` API for the loader.
pub fn validate_config(config: &OdcvmapConfig) -> Result<(), ConfigError> {
    match validate(config) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(ConfigError::Invalid(
            errors
                .into_vec()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}

fn validate_rates(rates: &RateSchedule) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    for rate in rates.all_rates() {
        if rate < 0.0 {
            errors.push(ValidationError::new("rates", format!("negative rate {rate}")));
        }
    }
    for rate in rates.electricity.values() {
        if !(rate.load_factor > 0.0 && rate.load_factor <= 1.0) {
            errors.push(ValidationError::new(
                "rates.electricity.load_factor",
                format!("{} outside (0, 1]", rate.load_factor),
            ));
        }
    }
    from_errors(errors)
}

fn validate_odcv(odcv: &OdcvConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    for bounds in odcv.bounds.values() {
        if !(0.0..=1.0).contains(&bounds.floor) || !(0.0..=1.0).contains(&bounds.ceiling) {
            errors.push(ValidationError::new(
                "odcv.bounds",
                format!("[{}, {}] outside [0, 1]", bounds.floor, bounds.ceiling),
            ));
        } else if bounds.floor > bounds.ceiling {
            errors.push(ValidationError::new(
                "odcv.bounds",
                format!("floor {} above ceiling {}", bounds.floor, bounds.ceiling),
            ));
        }
    }
    fraction(&mut errors, "odcv.default_vacancy", odcv.default_vacancy);
    fraction(&mut errors, "odcv.default_utilization", odcv.default_utilization);
    positive(&mut errors, "odcv.uplift", odcv.uplift);
    from_errors(errors)
}

fn validate_occupancy(occupancy: &OccupancyConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    for (name, profile) in &occupancy.profiles {
        for value in profile.utilization.values() {
            fraction(&mut errors, &format!("occupancy.{name}.utilization"), *value);
        }
        for value in profile.vacancy.iter().flat_map(|table| table.values()) {
            fraction(&mut errors, &format!("occupancy.{name}.vacancy"), *value);
        }
        fraction(
            &mut errors,
            &format!("occupancy.{name}.presence_factor"),
            profile.presence_factor,
        );
    }
    from_errors(errors)
}

fn validate_hvac(hvac: &HvacConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    for benchmark in hvac.benchmarks.values() {
        let zones = benchmark.climate.values();
        for pct in std::iter::once(&benchmark.national).chain(zones) {
            for (fuel, value) in pct.iter() {
                fraction(&mut errors, &format!("hvac.benchmarks.{fuel}"), value);
            }
        }
    }
    for (fuel, value) in hvac.data_center.iter() {
        fraction(&mut errors, &format!("hvac.data_center.{fuel}"), value);
    }
    fraction(&mut errors, "hvac.fuel_oil_pct", hvac.fuel_oil_pct);
    from_errors(errors)
}

/// City keys must name a city, and a qualified key must name its state.
fn geo_keys<T>(errors: &mut Vec<ValidationError>, field: &str, table: &GeoTable<T>) {
    for key in table.cities.keys() {
        let (city, state) = match key.split_once(',') {
            Some((city, state)) => (city.trim(), Some(state.trim())),
            None => (key.trim(), None),
        };
        if city.is_empty() || state.is_some_and(str::is_empty) {
            errors.push(ValidationError::new(
                format!("{field}.cities"),
                format!("malformed city key '{key}'"),
            ));
        }
    }
    if table.states.keys().any(|state| state.trim().is_empty()) {
        errors.push(ValidationError::new(
            format!("{field}.states"),
            "empty state key",
        ));
    }
}

fn validate_geo_keys(config: &OdcvmapConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    let rates = &config.rates;
    geo_keys(&mut errors, "rates.electricity", &rates.electricity);
    geo_keys(&mut errors, "rates.gas", &rates.gas);
    geo_keys(&mut errors, "rates.steam", &rates.steam);
    geo_keys(&mut errors, "rates.fuel_oil", &rates.fuel_oil);
    for (name, profile) in &config.occupancy.profiles {
        geo_keys(&mut errors, &format!("occupancy.{name}.utilization"), &profile.utilization);
        if let Some(vacancy) = &profile.vacancy {
            geo_keys(&mut errors, &format!("occupancy.{name}.vacancy"), vacancy);
        }
    }
    from_errors(errors)
}

fn validate_factors(config: &OdcvmapConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    for factors in config.emissions.values() {
        for (fuel, value) in factors.iter() {
            if value < 0.0 {
                errors.push(ValidationError::new(
                    format!("emissions.{fuel}"),
                    format!("negative factor {value}"),
                ));
            }
        }
    }
    for cap in config.valuation.cap_rates.values() {
        positive(&mut errors, "valuation.cap_rates", *cap);
    }
    for params in config.scoring.gamma.values() {
        if params.shape <= 0.0 || params.scale <= 0.0 {
            errors.push(ValidationError::new(
                "scoring.gamma",
                format!(
                    "shape and scale must be positive, got ({}, {})",
                    params.shape, params.scale
                ),
            ));
        }
    }
    from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::odcv::SavingsBounds;
    use crate::core::BuildingType;

    fn failures(config: &OdcvmapConfig) -> Vec<ValidationError> {
        match validate(config) {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&OdcvmapConfig::default()).is_success());
        assert!(validate_config(&OdcvmapConfig::default()).is_ok());
    }

    #[test]
    fn test_accumulates_violations_across_groups() {
        let mut config = OdcvmapConfig::default();
        config.rates.gas.default = -1.0;
        config.odcv.bounds = config
            .odcv
            .bounds
            .clone()
            .with(BuildingType::Office, SavingsBounds::new(0.5, 0.2));
        config.valuation.cap_rates.default = 0.0;

        let errors = failures(&config);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.message.contains("negative rate")));
        assert!(errors
            .iter()
            .any(|e| e.field == "odcv.bounds" && e.message == "floor 0.5 above ceiling 0.2"));
        assert!(errors.iter().any(|e| e.field == "valuation.cap_rates"));
    }

    #[test]
    fn test_hvac_shares_must_be_fractions() {
        let mut config = OdcvmapConfig::default();
        config.hvac.fuel_oil_pct = 1.2;
        config.hvac.data_center.elec = -0.1;

        let fields: Vec<_> = failures(&config).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["hvac.data_center.electricity", "hvac.fuel_oil_pct"]);
    }

    #[test]
    fn test_malformed_city_key_is_reported() {
        let mut config = OdcvmapConfig::default();
        config.rates.gas.cities.insert(", or".to_string(), 1.0);

        let errors = failures(&config);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].field, "rates.gas.cities");
    }

    #[test]
    fn test_result_joins_every_violation() {
        let mut config = OdcvmapConfig::default();
        config.odcv.uplift = 0.0;
        config.odcv.default_vacancy = 2.0;

        match validate_config(&config) {
            Err(ConfigError::Invalid(message)) => {
                assert!(message.contains("odcv.default_vacancy: 2 outside [0, 1]"));
                assert!(message.contains("odcv.uplift: must be positive, got 0"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
