//! Stage abstraction for the recomputation cascade.
//!
//! A stage is a pure per-row function: it reads a [`BuildingRecord`] and the
//! immutable lookup tables and returns the cells it wants written. It never
//! touches the table itself; the pipeline applies the updates to new rows and
//! swaps them in after the whole pass.

use crate::config::{OdcvmapConfig, Resolution};
use crate::core::value::format_number;
use crate::core::{BuildingRecord, BuildingType, Precision};
use crate::errors::SkipReason;
use std::collections::HashMap;

/// When a stage is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageClass {
    /// Runs in declared catalogue order.
    Catalogue,
    /// Always scheduled after every catalogue stage.
    Final,
}

/// A value to write into one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64, Precision),
    Text(String),
    Empty,
}

impl CellValue {
    /// The cell text as it is stored in the table.
    pub fn render(&self) -> String {
        match self {
            CellValue::Number(value, precision) => format_number(Some(*value), *precision),
            CellValue::Text(text) => text.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub column: &'static str,
    pub value: CellValue,
}

/// Result of evaluating a stage on one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Updated {
        updates: Vec<Update>,
        resolution: Resolution,
    },
    Skipped(SkipReason),
    NotApplicable,
}

/// Fluent collector for a row's updates.
#[derive(Debug, Default)]
pub struct Updates {
    updates: Vec<Update>,
}

impl Updates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, column: &'static str, value: f64, precision: Precision) -> Self {
        self.updates.push(Update {
            column,
            value: CellValue::Number(value, precision),
        });
        self
    }

    /// Write `value` if present, otherwise blank the cell.
    pub fn optional(self, column: &'static str, value: Option<f64>, precision: Precision) -> Self {
        match value {
            Some(v) => self.number(column, v, precision),
            None => self.empty(column),
        }
    }

    pub fn text(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.updates.push(Update {
            column,
            value: CellValue::Text(value.into()),
        });
        self
    }

    pub fn empty(mut self, column: &'static str) -> Self {
        self.updates.push(Update {
            column,
            value: CellValue::Empty,
        });
        self
    }

    pub fn resolved(self, resolution: Resolution) -> RowOutcome {
        RowOutcome::Updated {
            updates: self.updates,
            resolution,
        }
    }

    pub fn exact(self) -> RowOutcome {
        self.resolved(Resolution::Exact)
    }
}

/// Per-type medians over the current table, used as peer benchmarks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeerStats {
    median_eui: HashMap<String, f64>,
    median_year: HashMap<String, f64>,
}

impl PeerStats {
    pub fn from_records(records: &[BuildingRecord]) -> Self {
        use crate::core::columns::{BLDG_YEAR_BUILT, SITE_EUI};

        let mut eui: HashMap<String, Vec<f64>> = HashMap::new();
        let mut year: HashMap<String, Vec<f64>> = HashMap::new();
        for record in records {
            let Some(kind) = &record.building_type else {
                continue;
            };
            let key = type_key(kind);
            if let Some(v) = record.positive(SITE_EUI) {
                eui.entry(key.clone()).or_default().push(v);
            }
            if let Some(v) = record.positive(BLDG_YEAR_BUILT) {
                year.entry(key).or_default().push(v);
            }
        }

        Self {
            median_eui: medians(eui),
            median_year: medians(year),
        }
    }

    pub fn median_eui(&self, building_type: &BuildingType) -> Option<f64> {
        self.median_eui.get(&type_key(building_type)).copied()
    }

    pub fn median_year(&self, building_type: &BuildingType) -> Option<f64> {
        self.median_year.get(&type_key(building_type)).copied()
    }
}

fn type_key(building_type: &BuildingType) -> String {
    building_type.as_str().to_lowercase()
}

fn medians(groups: HashMap<String, Vec<f64>>) -> HashMap<String, f64> {
    groups
        .into_iter()
        .filter_map(|(key, values)| median(values).map(|m| (key, m)))
        .collect()
}

/// Pure function: median of a sample, averaging the middle pair.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Everything a stage may read besides the row itself.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub config: &'a OdcvmapConfig,
    pub peers: &'a PeerStats,
}

/// One step of the cascade.
pub trait Stage: Send + Sync {
    /// Stable identifier used on the command line and in summaries.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn class(&self) -> StageClass {
        StageClass::Catalogue
    }

    /// Columns that must exist in the table before the stage can run.
    fn requires(&self) -> &'static [&'static str];

    /// Columns the stage may write.
    fn outputs(&self) -> Vec<&'static str>;

    fn evaluate(&self, record: &BuildingRecord, ctx: &StageContext<'_>) -> RowOutcome;
}
