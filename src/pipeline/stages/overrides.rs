//! Per-building replacement of derived values from an override file.
//!
//! The file is a CSV keyed by `id_building`. Every other header must name a
//! derived column; a blank cell leaves the computed value in place. The stage
//! is final-class, so it always runs after everything it could overwrite.

use super::derived_columns;
use crate::core::columns::ID_BUILDING;
use crate::core::BuildingRecord;
use crate::errors::{ConfigError, PipelineError, StorageError};
use crate::pipeline::stage::{RowOutcome, Stage, StageClass, StageContext, Updates};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    columns: Vec<&'static str>,
    values: HashMap<String, Vec<(&'static str, String)>>,
}

impl OverrideTable {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(StorageError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let file = fs::File::open(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, path)?;
        info!(
            "Loaded overrides for {} buildings ({} columns) from {}",
            table.len(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, PipelineError> {
        let csv_error = |source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers().map_err(csv_error)?.clone();

        let Some(id_position) = headers.iter().position(|h| h.trim() == ID_BUILDING) else {
            return Err(StorageError::MissingIdentity {
                path: path.to_path_buf(),
                column: ID_BUILDING.to_string(),
            }
            .into());
        };

        let derived = derived_columns();
        let mut targets: Vec<(usize, &'static str)> = Vec::new();
        for (position, header) in headers.iter().enumerate() {
            if position == id_position {
                continue;
            }
            let header = header.trim();
            match derived.iter().find(|column| **column == header) {
                Some(column) => targets.push((position, *column)),
                None => {
                    return Err(ConfigError::OverrideNotDerived {
                        column: header.to_string(),
                    }
                    .into())
                }
            }
        }

        let mut values: HashMap<String, Vec<(&'static str, String)>> = HashMap::new();
        for record in rdr.records() {
            let record = record.map_err(csv_error)?;
            let id = record.get(id_position).unwrap_or_default().trim();
            if id.is_empty() {
                continue;
            }
            let cells = targets.iter().filter_map(|(position, column)| {
                record
                    .get(*position)
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .map(|cell| (*column, cell.to_string()))
            });
            // Later rows for the same building win cell by cell
            let entry = values.entry(id.to_string()).or_default();
            for (column, cell) in cells {
                entry.retain(|(existing, _)| *existing != column);
                entry.push((column, cell));
            }
        }

        Ok(Self {
            columns: targets.into_iter().map(|(_, column)| column).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, building_id: &str) -> Option<&[(&'static str, String)]> {
        self.values.get(building_id.trim()).map(Vec::as_slice)
    }
}

pub struct OverridesStage {
    table: Option<OverrideTable>,
}

impl OverridesStage {
    pub fn new(table: Option<OverrideTable>) -> Self {
        Self { table }
    }
}

impl Stage for OverridesStage {
    fn name(&self) -> &'static str {
        "overrides"
    }

    fn description(&self) -> &'static str {
        "Replace derived values from the override file"
    }

    fn class(&self) -> StageClass {
        StageClass::Final
    }

    fn requires(&self) -> &'static [&'static str] {
        &[ID_BUILDING]
    }

    fn outputs(&self) -> Vec<&'static str> {
        self.table
            .as_ref()
            .map(|table| table.columns.clone())
            .unwrap_or_default()
    }

    fn evaluate(&self, record: &BuildingRecord, _ctx: &StageContext<'_>) -> RowOutcome {
        let cells = self
            .table
            .as_ref()
            .and_then(|table| table.get(&record.id))
            .filter(|cells| !cells.is_empty());
        match cells {
            Some(cells) => cells
                .iter()
                .fold(Updates::new(), |updates, (column, value)| {
                    updates.text(*column, value.as_str())
                })
                .exact(),
            None => RowOutcome::NotApplicable,
        }
    }
}
