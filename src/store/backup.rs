//! Timestamped backups taken before every rewrite of the dataset.

use crate::errors::StorageError;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<data dir>/backups`
pub fn default_backup_dir(data_path: &Path) -> PathBuf {
    data_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join("backups")
}

/// Pure function: `<stem>_backup_<YYYYMMDD_HHMMSS>[_<n>].csv`
pub fn backup_file_name(stem: &str, timestamp: &DateTime<Local>, counter: usize) -> String {
    let stamp = timestamp.format(BACKUP_TIMESTAMP_FORMAT);
    if counter == 0 {
        format!("{stem}_backup_{stamp}.csv")
    } else {
        format!("{stem}_backup_{stamp}_{counter}.csv")
    }
}

/// First backup path in `dir` that does not exist yet.
pub fn unique_backup_path(dir: &Path, stem: &str, timestamp: &DateTime<Local>) -> PathBuf {
    (0..)
        .map(|counter| dir.join(backup_file_name(stem, timestamp, counter)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(backup_file_name(stem, timestamp, 0)))
}

/// Copy `source` into `dir` under a fresh timestamped name.
pub fn create_backup(
    source: &Path,
    dir: &Path,
    timestamp: DateTime<Local>,
) -> Result<PathBuf, StorageError> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");

    fs::create_dir_all(dir).map_err(|e| StorageError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let backup_path = unique_backup_path(dir, stem, &timestamp);
    fs::copy(source, &backup_path).map_err(|e| StorageError::Backup {
        source_path: source.to_path_buf(),
        backup_path: backup_path.clone(),
        source: e,
    })?;

    info!("Backup created: {}", backup_path.display());
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_backup_file_name_format() {
        assert_eq!(
            backup_file_name("portfolio_data", &fixed_time(), 0),
            "portfolio_data_backup_20250314_092653.csv"
        );
        assert_eq!(
            backup_file_name("portfolio_data", &fixed_time(), 2),
            "portfolio_data_backup_20250314_092653_2.csv"
        );
    }

    #[test]
    fn test_default_backup_dir() {
        assert_eq!(
            default_backup_dir(Path::new("/data/source/portfolio.csv")),
            PathBuf::from("/data/source/backups")
        );
    }

    #[test]
    fn test_create_backup_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("portfolio.csv");
        fs::write(&source, "id_building\n1\n").unwrap();
        let backups = dir.path().join("backups");

        let first = create_backup(&source, &backups, fixed_time()).unwrap();
        let second = create_backup(&source, &backups, fixed_time()).unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("portfolio_backup_20250314_092653.csv"));
        assert!(second.ends_with("portfolio_backup_20250314_092653_1.csv"));
        assert_eq!(fs::read_to_string(second).unwrap(), "id_building\n1\n");
    }
}
