use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::core::OdcvmapConfig;
use super::validation::validate_config;
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".odcvmap.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse, normalize and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str, path: &Path) -> Result<OdcvmapConfig, ConfigError> {
    let config = toml::from_str::<OdcvmapConfig>(contents)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
        .normalized();
    validate_config(&config)?;
    Ok(config)
}

/// Load a config file that must exist.
pub fn load_config_from_path(path: &Path) -> Result<OdcvmapConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_and_validate_config(&contents, path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try a candidate location during discovery. A missing file is not an error.
pub(crate) fn try_load_config_from_path(
    config_path: &Path,
) -> Option<Result<OdcvmapConfig, ConfigError>> {
    match read_config_file(config_path) {
        Ok(contents) => Some(parse_and_validate_config(&contents, config_path).inspect(|_| {
            debug!("Loaded config from {}", config_path.display());
        })),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => Some(Err(ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })),
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find `.odcvmap.toml` in `start` or one of its ancestors.
pub fn discover_config(start: PathBuf) -> Result<OdcvmapConfig, ConfigError> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(OdcvmapConfig::default())
        })
}

/// Explicit `--config` wins; otherwise discover from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<OdcvmapConfig, ConfigError> {
    match explicit {
        Some(path) => load_config_from_path(path),
        None => match std::env::current_dir() {
            Ok(dir) => discover_config(dir),
            Err(e) => {
                tracing::warn!("Failed to get current directory: {}. Using default config.", e);
                Ok(OdcvmapConfig::default())
            }
        },
    }
}
