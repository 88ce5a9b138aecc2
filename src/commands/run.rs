use crate::config::{load_config, OdcvmapConfig};
use crate::pipeline::{select, OverrideTable, PipelineBuilder, RunSummary};
use crate::store::{default_backup_dir, Dataset};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments of `odcvmap run`.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub data: PathBuf,
    pub config: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub stages: Vec<String>,
    pub overrides: Option<PathBuf>,
    pub save_each: bool,
    pub dry_run: bool,
}

impl RunConfig {
    /// Flag first, then the config file, then `<data dir>/backups`.
    pub fn resolve_backup_dir(&self, config: &OdcvmapConfig) -> PathBuf {
        self.backup_dir
            .clone()
            .or_else(|| config.data.backup_dir.clone())
            .unwrap_or_else(|| default_backup_dir(&self.data))
    }

    /// Flag first, then the config file.
    pub fn resolve_overrides<'a>(&'a self, config: &'a OdcvmapConfig) -> Option<&'a Path> {
        self.overrides
            .as_deref()
            .or(config.data.overrides.as_deref())
    }
}

/// Run the pipeline and print the summary.
pub fn handle_run(run: RunConfig) -> Result<RunSummary> {
    let summary = execute_run(&run)?;
    println!("{}", summary.report());
    Ok(summary)
}

/// Load, recompute and (unless dry-run) save the dataset.
pub fn execute_run(run: &RunConfig) -> Result<RunSummary> {
    let config = load_config(run.config.as_deref()).context("Failed to load configuration")?;

    let overrides = run
        .resolve_overrides(&config)
        .map(OverrideTable::load)
        .transpose()
        .context("Failed to load override file")?;

    let stages = select(&run.stages, overrides)?;
    let pipeline = stages
        .into_iter()
        .collect::<PipelineBuilder>()
        .with_progress()
        .build();
    debug!("Execution order: {}", pipeline.stage_names().join(" -> "));

    let mut dataset = Dataset::load(&run.data)
        .with_context(|| format!("Failed to load dataset {}", run.data.display()))?;
    if run.dry_run {
        info!("Dry run: {} will not be written", run.data.display());
    }

    let backup_dir = run.resolve_backup_dir(&config);

    let mut summary = if run.save_each && !run.dry_run {
        pipeline.execute_with(&mut dataset, &config, |_, dataset| {
            dataset.save(&backup_dir).map(Some).map_err(Into::into)
        })?
    } else {
        let mut summary = pipeline.execute(&mut dataset, &config)?;
        if !run.dry_run {
            summary.backups.push(dataset.save(&backup_dir)?);
        }
        summary
    };
    summary.dry_run = run.dry_run;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;

    fn config_with(backup_dir: Option<&str>, overrides: Option<&str>) -> OdcvmapConfig {
        OdcvmapConfig {
            data: DataConfig {
                backup_dir: backup_dir.map(PathBuf::from),
                overrides: overrides.map(PathBuf::from),
            },
            ..OdcvmapConfig::default()
        }
    }

    #[test]
    fn test_backup_dir_precedence() {
        let mut run = RunConfig {
            data: PathBuf::from("portfolio/buildings.csv"),
            ..RunConfig::default()
        };
        assert_eq!(
            run.resolve_backup_dir(&config_with(None, None)),
            PathBuf::from("portfolio/backups")
        );
        assert_eq!(
            run.resolve_backup_dir(&config_with(Some("cfg"), None)),
            PathBuf::from("cfg")
        );
        run.backup_dir = Some(PathBuf::from("flag"));
        assert_eq!(
            run.resolve_backup_dir(&config_with(Some("cfg"), None)),
            PathBuf::from("flag")
        );
    }

    #[test]
    fn test_override_flag_wins() {
        let config = config_with(None, Some("from_config.csv"));
        let mut run = RunConfig::default();
        assert_eq!(
            run.resolve_overrides(&config),
            Some(Path::new("from_config.csv"))
        );
        run.overrides = Some(PathBuf::from("from_flag.csv"));
        assert_eq!(
            run.resolve_overrides(&config),
            Some(Path::new("from_flag.csv"))
        );
        assert_eq!(RunConfig::default().resolve_overrides(&OdcvmapConfig::default()), None);
    }
}
