//! Error types for classified-table operations.

use copper_ingest::IngestError;
use copper_model::{ColumnType, StorageKind};
use thiserror::Error;

/// Errors that can occur while working with a [`Dataset`](crate::Dataset).
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No column holds the Target role.
    #[error("no column has the Target role")]
    NoTargetColumn,

    /// Imputation method name is not recognised.
    #[error("unsupported imputation method '{method}'")]
    UnsupportedImputationMethod { method: String },

    /// Column type and storage cannot be combined into a model input.
    #[error("column '{column}' is typed {column_type} but stored as {storage}")]
    MalformedColumnClassification {
        column: String,
        column_type: ColumnType,
        storage: StorageKind,
    },

    /// An encoded input would reuse a name already in the inputs matrix.
    #[error("input column '{column}' encodes to '{output}', which is already taken")]
    InputNameClash { column: String, output: String },

    /// Column is not part of the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Numeric operation requested on a non-numeric column.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    /// Two joined tables share a column name.
    #[error("duplicate column '{column}' in join")]
    DuplicateColumn { column: String },

    /// Singular values could not be computed within the iteration cap.
    #[error("singular value decomposition of a {rows}x{features} matrix did not converge")]
    SvdDidNotConverge { rows: usize, features: usize },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Table could not be loaded.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<polars::prelude::PolarsError> for DatasetError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
