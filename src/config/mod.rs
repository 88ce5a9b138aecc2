//! Lookup tables and the TOML configuration that overrides them.
//!
//! The config is loaded once per run, normalized, validated and then passed
//! by reference into every stage.

mod core;
pub mod emissions;
pub mod hvac;
mod loader;
pub mod lookup;
pub mod occupancy;
pub mod odcv;
pub mod rates;
pub mod scoring;
pub mod validation;
pub mod valuation;

pub use self::core::{DataConfig, OdcvmapConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use lookup::{GeoTable, Resolution, Resolved, TypeTable};
