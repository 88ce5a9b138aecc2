//! odcvmap: recompute the derived columns of a commercial building portfolio.
//!
//! The table is a single CSV keyed by `id_building`. A fixed catalogue of
//! stages derives occupancy, HVAC shares, ODCV savings, costs, post-ODCV
//! energy, carbon, valuation and Energy Star scores, each from columns that
//! earlier stages or the source data provide.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod math;
pub mod pipeline;
pub mod store;

pub use crate::config::{load_config, OdcvmapConfig};
pub use crate::core::{BuildingRecord, BuildingType, Fuel};
pub use crate::errors::{DependencyError, PipelineError, StorageError};
pub use crate::pipeline::{PipelineBuilder, RunSummary};
pub use crate::store::Dataset;
