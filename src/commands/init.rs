use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const STARTER_CONFIG: &str = r#"# odcvmap configuration
#
# Every section is optional. A table section (anything with cities/states/default)
# replaces the built-in table for that key, so copy the defaults you want to keep.

[data]
# backup_dir = "backups"
# overrides = "overrides.csv"

[odcv]
uplift = 1.20
low_opportunity_factor = 0.3
default_vacancy = 0.15
default_utilization = 0.60
default_year_built = 1982.0
default_sqft = 89000.0

[hvac]
fuel_oil_pct = 0.93

[valuation]
energy_cost_share = 0.12
noi_margin = 0.60

# [valuation.cap_rates]
# default = 0.07
# [valuation.cap_rates.states]
# NY = 0.055

# [rates.gas]
# default = 1.10
# [rates.gas.cities]
# "Portland, OR" = 1.30
"#;

/// Write a starter `.odcvmap.toml` into the current directory.
pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_and_validate_config, OdcvmapConfig};
    use tempfile::TempDir;

    #[test]
    fn test_starter_config_matches_defaults() {
        let parsed = parse_and_validate_config(STARTER_CONFIG, Path::new("starter.toml")).unwrap();
        let defaults = OdcvmapConfig::default();
        assert_eq!(parsed.odcv.uplift, defaults.odcv.uplift);
        assert_eq!(parsed.odcv.default_sqft, defaults.odcv.default_sqft);
        assert_eq!(parsed.hvac.fuel_oil_pct, defaults.hvac.fuel_oil_pct);
        assert_eq!(parsed.valuation.noi_margin, defaults.valuation.noi_margin);
        assert_eq!(parsed.data.overrides, None);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        init_config_in(dir.path(), false).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "# mine\n").unwrap();

        assert!(init_config_in(dir.path(), false).is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            "# mine\n"
        );

        init_config_in(dir.path(), true).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            STARTER_CONFIG
        );
    }
}
