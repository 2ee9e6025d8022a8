//! Table providers.
//!
//! A [`TableSource`] turns a table id into a `DataFrame`. [`CsvSource`] reads
//! `<data_dir>/<id>` (adding `.csv` when the id has no extension);
//! [`MemorySource`] serves frames registered in memory.

use std::collections::BTreeMap;
use std::path::PathBuf;

use polars::prelude::DataFrame;

use crate::config::ProjectConfig;
use crate::csv::read_csv_table;
use crate::error::{IngestError, Result};

/// Provider of rectangular tables by id.
pub trait TableSource {
    /// Read the table identified by `id`.
    fn read_table(&self, id: &str) -> Result<DataFrame>;
}

/// Reads CSV files from the configured data directory.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    config: ProjectConfig,
}

impl CsvSource {
    pub fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    /// Source configured from `COPPER_DATA_DIR` or the defaults.
    pub fn from_env() -> Self {
        Self::new(ProjectConfig::from_env())
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Path a table id resolves to.
    pub fn resolve(&self, id: &str) -> PathBuf {
        let mut path = self.config.data_dir.join(id);
        if path.extension().is_none() {
            path.set_extension("csv");
        }
        path
    }
}

impl TableSource for CsvSource {
    fn read_table(&self, id: &str) -> Result<DataFrame> {
        let path = self.resolve(id);
        tracing::debug!(id, path = %path.display(), "Resolved table id");
        read_csv_table(&path, &self.config)
    }
}

/// In-memory frames keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<String, DataFrame>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, id: impl Into<String>, df: DataFrame) -> Self {
        self.insert(id, df);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, df: DataFrame) {
        self.tables.insert(id.into(), df);
    }
}

impl TableSource for MemorySource {
    fn read_table(&self, id: &str) -> Result<DataFrame> {
        self.tables
            .get(id)
            .cloned()
            .ok_or_else(|| IngestError::FileNotFound {
                path: PathBuf::from(id),
            })
    }
}
