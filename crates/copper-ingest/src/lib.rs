//! Tabular-data providers for copper datasets.
//!
//! - [`TableSource`]: the provider seam a dataset loads through
//! - [`CsvSource`]: CSV files under a project data directory
//! - [`ProjectConfig`]: data directory, size limit, and schema inference depth

pub mod config;
pub mod csv;
pub mod error;
pub mod source;

pub use config::{DATA_DIR_ENV_VAR, DEFAULT_INFER_SCHEMA_LENGTH, MAX_CSV_FILE_SIZE, ProjectConfig};
pub use csv::{check_file_size_with_limit, read_csv_table, read_header, validate_encoding};
pub use error::{IngestError, Result};
pub use source::{CsvSource, MemorySource, TableSource};
