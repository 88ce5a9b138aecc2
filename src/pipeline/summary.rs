//! Per-stage outcome counts and the end-of-run report.

use crate::config::Resolution;
use crate::errors::{RowSkipped, SkipReason};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

const MAX_SAMPLES: usize = 5;

/// Outcome counts for one stage pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageSummary {
    pub name: &'static str,
    pub exact: usize,
    pub fallback: usize,
    pub default: usize,
    pub skipped: usize,
    pub not_applicable: usize,
    /// Skip counts grouped by reason text.
    pub skip_reasons: BTreeMap<String, usize>,
    pub sample_skips: Vec<RowSkipped>,
    pub duration: Duration,
}

impl StageSummary {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn record_resolution(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Exact => self.exact += 1,
            Resolution::Fallback => self.fallback += 1,
            Resolution::Default => self.default += 1,
        }
    }

    pub fn record_skip(&mut self, building_id: &str, reason: SkipReason) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason.to_string()).or_insert(0) += 1;
        if self.sample_skips.len() < MAX_SAMPLES {
            self.sample_skips.push(RowSkipped {
                stage: self.name,
                building_id: building_id.to_string(),
                reason,
            });
        }
    }

    pub fn record_not_applicable(&mut self) {
        self.not_applicable += 1;
    }

    pub fn updated(&self) -> usize {
        self.exact + self.fallback + self.default
    }

    pub fn total(&self) -> usize {
        self.updated() + self.skipped + self.not_applicable
    }
}

/// Everything a run produced, in execution order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub stages: Vec<StageSummary>,
    pub backups: Vec<PathBuf>,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn stage(&self, name: &str) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn total_skipped(&self) -> usize {
        self.stages.iter().map(|s| s.skipped).sum()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Stage",
            "Exact",
            "Fallback",
            "Default",
            "Skipped",
            "N/A",
            "Time",
        ]);
        for stage in &self.stages {
            let count = |n: usize| Cell::new(n).set_alignment(CellAlignment::Right);
            table.add_row(vec![
                Cell::new(stage.name),
                count(stage.exact),
                count(stage.fallback),
                count(stage.default),
                count(stage.skipped),
                count(stage.not_applicable),
                Cell::new(format!("{:.1?}", stage.duration)).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }

    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("{}\n", "Stage summary".bold()));
        report.push_str(&format!("{}\n", self.table()));

        let skipping: Vec<_> = self.stages.iter().filter(|s| s.skipped > 0).collect();
        if !skipping.is_empty() {
            report.push_str(&format!("\n{}\n", "Skipped rows".yellow().bold()));
            for stage in skipping {
                for (reason, count) in &stage.skip_reasons {
                    report.push_str(&format!("  {}: {} ({} row(s))\n", stage.name, reason, count));
                }
                for sample in &stage.sample_skips {
                    report.push_str(&format!("    - {}\n", sample.building_id));
                }
                if stage.skipped > stage.sample_skips.len() {
                    report.push_str(&format!(
                        "    ... and {} more\n",
                        stage.skipped - stage.sample_skips.len()
                    ));
                }
            }
        }

        if self.dry_run {
            report.push_str(&format!("\n{}\n", "Dry run: dataset not written".cyan()));
        } else {
            for backup in &self.backups {
                report.push_str(&format!("\nBackup: {}\n", backup.display()));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_resolution() {
        let mut summary = StageSummary::new("occupancy");
        summary.record_resolution(Resolution::Exact);
        summary.record_resolution(Resolution::Fallback);
        summary.record_resolution(Resolution::Fallback);
        summary.record_resolution(Resolution::Default);
        summary.record_not_applicable();

        assert_eq!(summary.exact, 1);
        assert_eq!(summary.fallback, 2);
        assert_eq!(summary.default, 1);
        assert_eq!(summary.updated(), 4);
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_skip_samples_are_capped() {
        let mut summary = StageSummary::new("carbon");
        for i in 0..8 {
            summary.record_skip(&format!("B{i}"), SkipReason::NoFuelData);
        }
        assert_eq!(summary.skipped, 8);
        assert_eq!(summary.sample_skips.len(), MAX_SAMPLES);
        assert_eq!(summary.skip_reasons["no fuel consumption recorded"], 8);
    }

    #[test]
    fn test_report_mentions_skips_and_backup() {
        let mut stage = StageSummary::new("costs");
        stage.record_skip("B-9", SkipReason::MissingValue("energy_elec_kbtu"));
        let run = RunSummary {
            stages: vec![stage],
            backups: vec![PathBuf::from("backups/data_backup_20250101_000000.csv")],
            dry_run: false,
        };

        let report = run.report();
        assert!(report.contains("costs"));
        assert!(report.contains("missing energy_elec_kbtu"));
        assert!(report.contains("B-9"));
        assert!(report.contains("data_backup_20250101_000000.csv"));
        assert_eq!(run.total_skipped(), 1);
    }
}
