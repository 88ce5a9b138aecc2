//! In-memory portfolio table.
//!
//! Cells are kept as raw text. Only columns a stage writes are ever
//! re-formatted; everything else is written back exactly as it was read.

use crate::core::columns::IDENTITY_SCHEMA;
use crate::core::BuildingRecord;
use crate::errors::StorageError;
use chrono::Local;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::backup::create_backup;

/// Ordered column names with a name → position index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self, StorageError> {
        let mut schema = Schema::default();
        for name in headers.iter() {
            if schema.contains(name) {
                return Err(StorageError::DuplicateColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                });
            }
            schema.push(name);
        }
        Ok(schema)
    }

    fn push(&mut self, name: &str) -> usize {
        let position = self.columns.len();
        self.columns.push(name.to_string());
        self.index.insert(name.to_string(), position);
        position
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub type Row = Vec<String>;

#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    schema: Schema,
    rows: Vec<Row>,
}

impl Dataset {
    /// Load a portfolio CSV. The identity columns must be present.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Err(StorageError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = fs::File::open(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file, path)?;
        info!(
            "Loaded {} buildings ({} columns) from {}",
            dataset.len(),
            dataset.schema.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse CSV from any reader; `path` is used for error messages and saving.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self, StorageError> {
        let csv_error = |source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = rdr.headers().map_err(csv_error)?.clone();
        let schema = Schema::from_headers(&headers, path)?;

        if let Some(missing) = IDENTITY_SCHEMA.iter().find(|c| !schema.contains(c)) {
            return Err(StorageError::MissingIdentity {
                path: path.to_path_buf(),
                column: missing.to_string(),
            });
        }

        let rows = rdr
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect::<Row>())
                    .map_err(csv_error)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            schema,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let position = self.schema.position(column)?;
        self.rows.get(row)?.get(position).map(String::as_str)
    }

    pub fn record(&self, row: usize) -> BuildingRecord {
        BuildingRecord::from_cells(|column| self.cell(row, column))
    }

    pub fn records(&self) -> Vec<BuildingRecord> {
        (0..self.rows.len()).map(|row| self.record(row)).collect()
    }

    /// Append `column` to the schema if absent, padding every row. Returns its position.
    pub fn ensure_column(&mut self, column: &str) -> usize {
        if let Some(position) = self.schema.position(column) {
            return position;
        }
        debug!("Adding column {}", column);
        let position = self.schema.push(column);
        for row in &mut self.rows {
            row.resize(position + 1, String::new());
        }
        position
    }

    /// Swap in a fully computed row set. Row count must not change.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        debug_assert_eq!(rows.len(), self.rows.len());
        self.rows = rows;
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(self.schema.columns())?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Back up the file on disk, then rewrite it. Returns the backup path.
    pub fn save(&self, backup_dir: &Path) -> Result<PathBuf, StorageError> {
        let backup = create_backup(&self.path, backup_dir, Local::now())?;

        let tmp_path = self.path.with_extension("csv.tmp");
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StorageError::Io { path, source }
        };

        let file = fs::File::create(&tmp_path).map_err(io_error(&tmp_path))?;
        self.write_to(file).map_err(|source| StorageError::Csv {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))?;

        info!("Saved {} buildings to {}", self.len(), self.path.display());
        Ok(backup)
    }
}
