//! Column classification model for copper datasets.
//!
//! - [`Role`] and [`ColumnType`]: the two classifications every column holds
//! - [`StorageKind`]: how the values are physically stored
//! - [`ColumnMetadata`]: one row of a dataset's metadata view
//! - [`ClassifyOptions`]: heuristics used when a table is classified

pub mod enums;
pub mod metadata;
pub mod options;

pub use enums::{ColumnType, Role, StorageKind};
pub use metadata::ColumnMetadata;
pub use options::{ClassifyOptions, DEFAULT_MAX_MISSING_RATIO};
