//! Project configuration for table providers.
//!
//! Resolution order for the data directory:
//! 1. `COPPER_DATA_DIR` environment variable
//! 2. `data_dir` from a `copper.toml` file, when one is loaded
//! 3. `data/` relative to the working directory

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "COPPER_DATA_DIR";

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Rows scanned when inferring column dtypes.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 100;

/// Where tables live and how they are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory that table ids are resolved against.
    pub data_dir: PathBuf,
    /// Files larger than this are refused.
    pub max_file_size: u64,
    /// Rows scanned for dtype inference.
    pub infer_schema_length: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            max_file_size: MAX_CSV_FILE_SIZE,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

impl ProjectConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults, with the data directory taken from `COPPER_DATA_DIR` when set.
    pub fn from_env() -> Self {
        Self::default().with_env_override(std::env::var_os(DATA_DIR_ENV_VAR))
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a TOML config file, then apply the environment override.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::Config {
                    path: path.to_path_buf(),
                    message: "file not found".to_string(),
                }
            } else {
                IngestError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| IngestError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), data_dir = %config.data_dir.display(), "Loaded project config");
        Ok(config.with_env_override(std::env::var_os(DATA_DIR_ENV_VAR)))
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    #[must_use]
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    fn with_env_override(mut self, value: Option<OsString>) -> Self {
        if let Some(dir) = value.filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }
}
