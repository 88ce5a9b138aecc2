//! Error types for pipeline runs.
//!
//! Fatal conditions (storage, dependency, configuration) abort a run and
//! surface through [`PipelineError`]. Per-row conditions never abort: a row
//! missing a value is reported as a [`RowSkipped`], a lookup answered by a
//! broader scope as a [`LookupFallback`], and both are counted in the stage
//! summary.

use crate::config::lookup::Resolution;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The dataset could not be read, parsed, backed up or written.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("duplicate column '{column}' in {}", path.display())]
    DuplicateColumn { path: PathBuf, column: String },

    #[error("{} is missing identity column '{column}'", path.display())]
    MissingIdentity { path: PathBuf, column: String },

    #[error("failed to back up {} to {}: {source}", source_path.display(), backup_path.display())]
    Backup {
        source_path: PathBuf,
        backup_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A stage needs a column the table does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stage '{stage}' requires column '{column}' (produced by {producer})")]
pub struct DependencyError {
    pub stage: String,
    pub column: String,
    /// Stage that writes the column, or `source data` for raw inputs.
    pub producer: String,
}

/// Configuration file or lookup tables are unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("override column '{column}' is not a derived column")]
    OverrideNotDerived { column: String },
}

/// Any condition that stops a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown stage '{0}'")]
    UnknownStage(String),
}

/// Why a row was left unchanged by a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingValue(&'static str),
    NoFuelData,
    NotPositive(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingValue(column) => write!(f, "missing {column}"),
            SkipReason::NoFuelData => f.write_str("no fuel consumption recorded"),
            SkipReason::NotPositive(column) => write!(f, "{column} is not positive"),
        }
    }
}

/// A row a stage could not compute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage}: building {building_id} skipped ({reason})")]
pub struct RowSkipped {
    pub stage: &'static str,
    pub building_id: String,
    pub reason: SkipReason,
}

/// A lookup answered from a broader scope than the building's own city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFallback {
    pub stage: &'static str,
    pub building_id: String,
    pub scope: Resolution,
}

impl fmt::Display for LookupFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: building {} resolved at {} scope",
            self.stage,
            self.building_id,
            self.scope.as_str()
        )
    }
}
