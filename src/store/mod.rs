pub mod schema;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::metadata::MeasurementRecord;
use schema::{header_matches, CsvRow, COLUMNS};

/// Append-only CSV table of measurement records.
///
/// Appends load the whole table, add one row and rewrite it through a
/// sibling temp file. Writers inside this process are serialized; a second
/// process writing the same file is not coordinated with.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unexpected header in {path}: found [{}]", .found.join(", "))]
    SchemaMismatch { path: String, found: Vec<String> },
}

/// Result of a successful append, taken from the rows just written.
#[derive(Debug, Clone, PartialEq)]
pub struct Appended {
    pub total_rows: usize,
    /// Last rows of the table, oldest first, ending with the new one.
    pub recent: Vec<CsvRow>,
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl RecordStore {
    /// Prepares the parent directory; the table itself is created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Appends one record. The returned tail holds up to `recent_limit` rows.
    pub fn append(
        &self,
        record: &MeasurementRecord,
        recent_limit: usize,
    ) -> Result<Appended, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut rows = if self.exists() {
            self.read_rows()?
        } else {
            Vec::new()
        };
        rows.push(CsvRow::from(record));
        self.rewrite(&rows)?;

        tracing::info!(
            path = %self.path.display(),
            patient_id = %record.patient_id,
            rows = rows.len(),
            "Measurement record appended"
        );

        let total_rows = rows.len();
        let recent = rows.split_off(total_rows.saturating_sub(recent_limit));
        Ok(Appended { total_rows, recent })
    }

    pub fn load_all(&self) -> Result<Vec<CsvRow>, StoreError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        self.read_rows()
    }

    /// Last `limit` rows, oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<CsvRow>, StoreError> {
        let mut rows = self.load_all()?;
        let skip = rows.len().saturating_sub(limit);
        Ok(rows.split_off(skip))
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.load_all()?.len())
    }

    fn read_rows(&self) -> Result<Vec<CsvRow>, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let header = reader.headers()?;
        if !header_matches(header.iter()) {
            return Err(StoreError::SchemaMismatch {
                path: self.path.display().to_string(),
                found: header.iter().map(str::to_string).collect(),
            });
        }

        let mut rows = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            rows.push(row?);
        }
        Ok(rows)
    }

    fn rewrite(&self, rows: &[CsvRow]) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("csv.tmp");
        let file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(COLUMNS)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|e| StoreError::io(&tmp_path, e))?;

        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }
}
