//! Per-column metadata snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::{ColumnType, Role, StorageKind};

/// Read-only description of one column: its classification and raw storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Current role.
    pub role: Role,
    /// Current value type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Storage kind derived from the dtype.
    pub storage: StorageKind,
    /// Polars dtype as displayed by Polars (e.g. "i64", "str").
    pub dtype: String,
}
