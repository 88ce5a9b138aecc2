//! Stage pipeline over the building table.
//!
//! Stages are pure functions from a record to a set of cell updates. The
//! builder orders them and the orchestrator checks dependencies, applies a
//! full pass, and collects per-stage summaries.

pub mod builder;
pub mod stage;
pub mod stages;
pub mod summary;

pub use builder::{check_dependencies, run_stage, BuiltPipeline, PipelineBuilder};
pub use stage::{RowOutcome, Stage, StageClass, StageContext};
pub use stages::{all_stages, catalogue, select, OverrideTable};
pub use summary::{RunSummary, StageSummary};
