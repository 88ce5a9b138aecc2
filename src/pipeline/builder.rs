//! Pipeline builder and orchestrator.
//!
//! Stages are composed with a fluent builder and executed one full pass at a
//! time over the table. Final-class stages are moved behind every catalogue
//! stage when the pipeline is built, whatever order they were added in.

use super::stage::{PeerStats, RowOutcome, Stage, StageClass, StageContext, Update};
use super::stages::producer_of;
use super::summary::{RunSummary, StageSummary};
use crate::config::{OdcvmapConfig, Resolution};
use crate::errors::{DependencyError, LookupFallback, PipelineError};
use crate::store::{Dataset, Row, Schema};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Builder for constructing pipelines.
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new()
///     .stage(OccupancyStage)
///     .stage(OdcvSavingsStage)
///     .when(overrides.is_some(), |p| p.stage(OverridesStage::new(table)))
///     .build();
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
    progress_enabled: bool,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage<S: Stage + 'static>(self, stage: S) -> Self {
        self.boxed(Box::new(stage))
    }

    pub fn boxed(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Add stages conditionally.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Log a line per stage as the run advances.
    pub fn with_progress(mut self) -> Self {
        self.progress_enabled = true;
        self
    }

    pub fn build(mut self) -> BuiltPipeline {
        // Stable: catalogue order is preserved within each class
        self.stages.sort_by_key(|stage| stage.class());
        BuiltPipeline {
            stages: self.stages,
            progress_enabled: self.progress_enabled,
        }
    }
}

impl FromIterator<Box<dyn Stage>> for PipelineBuilder {
    fn from_iter<I: IntoIterator<Item = Box<dyn Stage>>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), PipelineBuilder::boxed)
    }
}

/// A built pipeline ready for execution.
pub struct BuiltPipeline {
    stages: Vec<Box<dyn Stage>>,
    progress_enabled: bool,
}

impl BuiltPipeline {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in memory without persisting anything.
    pub fn execute(
        &self,
        dataset: &mut Dataset,
        config: &OdcvmapConfig,
    ) -> Result<RunSummary, PipelineError> {
        self.execute_with(dataset, config, |_, _| Ok(None))
    }

    /// Run every stage, calling `after_stage` once each pass has been applied.
    /// A returned path is recorded as a backup in the summary.
    pub fn execute_with<F>(
        &self,
        dataset: &mut Dataset,
        config: &OdcvmapConfig,
        mut after_stage: F,
    ) -> Result<RunSummary, PipelineError>
    where
        F: FnMut(&StageSummary, &Dataset) -> Result<Option<PathBuf>, PipelineError>,
    {
        let mut summary = RunSummary::default();
        let total = self.stages.len();

        for (i, stage) in self.stages.iter().enumerate() {
            if self.progress_enabled {
                info!("Stage {}/{}: {}", i + 1, total, stage.name());
            }
            let stage_summary = run_stage(stage.as_ref(), dataset, config)?;
            if let Some(backup) = after_stage(&stage_summary, dataset)? {
                summary.backups.push(backup);
            }
            summary.stages.push(stage_summary);
        }

        Ok(summary)
    }
}

/// Fail if any column `stage` reads is absent from the table.
pub fn check_dependencies(stage: &dyn Stage, schema: &Schema) -> Result<(), DependencyError> {
    match stage.requires().iter().find(|column| !schema.contains(column)) {
        Some(column) => Err(DependencyError {
            stage: stage.name().to_string(),
            column: column.to_string(),
            producer: producer_of(column).unwrap_or("source data").to_string(),
        }),
        None => Ok(()),
    }
}

/// Evaluate one stage over every row, then swap the new rows in.
pub fn run_stage(
    stage: &dyn Stage,
    dataset: &mut Dataset,
    config: &OdcvmapConfig,
) -> Result<StageSummary, PipelineError> {
    let span = info_span!("stage", name = stage.name());
    let _enter = span.enter();
    let start = Instant::now();

    check_dependencies(stage, dataset.schema())?;
    for column in stage.outputs() {
        dataset.ensure_column(column);
    }

    let records = dataset.records();
    let peers = PeerStats::from_records(&records);
    let ctx = StageContext {
        config,
        peers: &peers,
    };

    let mut summary = StageSummary::new(stage.name());
    let rows: Vec<Row> = records
        .iter()
        .zip(dataset.rows())
        .map(|(record, row)| match stage.evaluate(record, &ctx) {
            RowOutcome::Updated {
                updates,
                resolution,
            } => {
                summary.record_resolution(resolution);
                if resolution != Resolution::Exact {
                    let fallback = LookupFallback {
                        stage: stage.name(),
                        building_id: record.id.clone(),
                        scope: resolution,
                    };
                    debug!("{}", fallback);
                }
                apply_updates(row, dataset.schema(), &updates)
            }
            RowOutcome::Skipped(reason) => {
                debug!("{}: building {} skipped ({})", stage.name(), record.id, reason);
                summary.record_skip(&record.id, reason);
                row.clone()
            }
            RowOutcome::NotApplicable => {
                summary.record_not_applicable();
                row.clone()
            }
        })
        .collect();

    dataset.replace_rows(rows);
    summary.duration = start.elapsed();

    info!(
        "{}: {} updated, {} skipped, {} not applicable",
        stage.name(),
        summary.updated(),
        summary.skipped,
        summary.not_applicable
    );
    if summary.skipped > 0 {
        warn!("{}: {} row(s) skipped", stage.name(), summary.skipped);
    }

    Ok(summary)
}

fn apply_updates(row: &Row, schema: &Schema, updates: &[Update]) -> Row {
    let mut row = row.clone();
    for update in updates {
        let Some(position) = schema.position(update.column) else {
            warn!("Undeclared output column {}", update.column);
            continue;
        };
        row[position] = update.value.render();
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns as col;
    use crate::core::{BuildingRecord, Precision};
    use crate::errors::SkipReason;
    use crate::pipeline::stage::Updates;
    use std::path::Path;

    struct Doubler;

    impl Stage for Doubler {
        fn name(&self) -> &'static str {
            "doubler"
        }

        fn description(&self) -> &'static str {
            "double the square footage"
        }

        fn requires(&self) -> &'static [&'static str] {
            &[col::BLDG_SQFT]
        }

        fn outputs(&self) -> Vec<&'static str> {
            vec![col::ENERGY_TOTAL_KBTU]
        }

        fn evaluate(&self, record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
            match record.value(col::BLDG_SQFT) {
                Some(sqft) => Updates::new()
                    .number(col::ENERGY_TOTAL_KBTU, sqft * 2.0, Precision::Amount)
                    .exact(),
                None => RowOutcome::Skipped(SkipReason::MissingValue(col::BLDG_SQFT)),
            }
        }
    }

    struct Finisher;

    impl Stage for Finisher {
        fn name(&self) -> &'static str {
            "finisher"
        }

        fn description(&self) -> &'static str {
            "runs last"
        }

        fn class(&self) -> StageClass {
            StageClass::Final
        }

        fn requires(&self) -> &'static [&'static str] {
            &[]
        }

        fn outputs(&self) -> Vec<&'static str> {
            vec![]
        }

        fn evaluate(&self, _record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
            RowOutcome::NotApplicable
        }
    }

    fn dataset(csv: &str) -> Dataset {
        Dataset::from_reader(csv.as_bytes(), Path::new("test.csv")).unwrap()
    }

    #[test]
    fn test_final_stages_are_scheduled_last() {
        let pipeline = PipelineBuilder::new()
            .stage(Finisher)
            .stage(Doubler)
            .build();
        assert_eq!(pipeline.stage_names(), vec!["doubler", "finisher"]);
    }

    #[test]
    fn test_when_adds_conditionally() {
        let pipeline = PipelineBuilder::new()
            .stage(Doubler)
            .when(false, |p| p.stage(Finisher))
            .build();
        assert_eq!(pipeline.stage_count(), 1);
    }

    #[test]
    fn test_missing_column_names_source_data() {
        let mut data = dataset("id_building,loc_city,loc_state,bldg_type\nB1,Boston,MA,Office\n");
        let err = PipelineBuilder::new()
            .stage(Doubler)
            .build()
            .execute(&mut data, &OdcvmapConfig::default())
            .unwrap_err();
        match err {
            PipelineError::Dependency(dep) => {
                assert_eq!(dep.stage, "doubler");
                assert_eq!(dep.column, "bldg_sqft");
                assert_eq!(dep.producer, "source data");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_run_writes_new_column_and_counts() {
        let mut data = dataset(
            "id_building,loc_city,loc_state,bldg_type,bldg_sqft\nB1,Boston,MA,Office,10\nB2,Boston,MA,Office,\n",
        );
        let summary = PipelineBuilder::new()
            .stage(Doubler)
            .build()
            .execute(&mut data, &OdcvmapConfig::default())
            .unwrap();

        assert_eq!(data.cell(0, col::ENERGY_TOTAL_KBTU), Some("20"));
        assert_eq!(data.cell(1, col::ENERGY_TOTAL_KBTU), Some(""));
        let stage = summary.stage("doubler").unwrap();
        assert_eq!(stage.exact, 1);
        assert_eq!(stage.skipped, 1);
    }

    #[test]
    fn test_after_stage_backups_are_collected() {
        let mut data = dataset("id_building,loc_city,loc_state,bldg_type,bldg_sqft\nB1,A,MA,Office,1\n");
        let summary = PipelineBuilder::new()
            .stage(Doubler)
            .stage(Finisher)
            .build()
            .execute_with(&mut data, &OdcvmapConfig::default(), |stage, _| {
                Ok(Some(PathBuf::from(format!("{}.bak", stage.name))))
            })
            .unwrap();
        assert_eq!(
            summary.backups,
            vec![PathBuf::from("doubler.bak"), PathBuf::from("finisher.bak")]
        );
    }
}
