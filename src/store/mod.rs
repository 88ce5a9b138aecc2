//! Dataset storage: CSV load/save and backups.

pub mod backup;
pub mod dataset;

pub use backup::{create_backup, default_backup_dir};
pub use dataset::{Dataset, Row, Schema};
