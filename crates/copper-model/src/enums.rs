//! Type-safe enumerations for column classification.
//!
//! Every column of a dataset carries exactly one [`Role`] and one
//! [`ColumnType`]. The [`StorageKind`] is not part of the classification; it
//! describes how Polars physically stores the values and is used to pick the
//! default [`ColumnType`] and the encoding applied to model inputs.

use polars::prelude::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Intended analytical use of a column.
///
/// - **Identifier**: non-predictive key (e.g. a row id)
/// - **Input**: feature used for modelling
/// - **Target**: label to predict
/// - **Rejected**: excluded from modelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Non-predictive key.
    Identifier,
    /// Feature column.
    Input,
    /// Label to predict.
    Target,
    /// Excluded from modelling.
    Rejected,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [Role::Identifier, Role::Input, Role::Target, Role::Rejected];

    /// Returns the display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Identifier => "ID",
            Role::Input => "Input",
            Role::Target => "Target",
            Role::Rejected => "Reject",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parse a role name (case-insensitive, accepts short and long forms).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ID" | "IDENTIFIER" => Ok(Role::Identifier),
            "INPUT" => Ok(Role::Input),
            "TARGET" => Ok(Role::Target),
            "REJECT" | "REJECTED" => Ok(Role::Rejected),
            _ => Err(format!("Unknown column role: {s}")),
        }
    }
}

/// Value domain classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnType {
    /// Continuous or integer quantities.
    Numeric,
    /// Discrete levels, whatever their storage.
    Categorical,
}

impl ColumnType {
    /// Every type, in declaration order.
    pub const ALL: [ColumnType; 2] = [ColumnType::Numeric, ColumnType::Categorical];

    /// Returns the display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "Number",
            ColumnType::Categorical => "Category",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "NUMBER" | "NUMERIC" => Ok(ColumnType::Numeric),
            "CATEGORY" | "CATEGORICAL" => Ok(ColumnType::Categorical),
            _ => Err(format!("Unknown column type: {s}")),
        }
    }
}

/// Physical representation of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    /// Signed or unsigned integers of any width.
    Integer,
    /// 32 or 64 bit floating point.
    Float,
    /// UTF-8 strings.
    Text,
    /// True/false values.
    Boolean,
    /// Column with no inferred dtype (every value missing).
    Null,
    /// Dates, lists, and anything else.
    Other,
}

impl StorageKind {
    /// Classify a Polars dtype.
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => StorageKind::Integer,
            DataType::Float32 | DataType::Float64 => StorageKind::Float,
            DataType::String => StorageKind::Text,
            DataType::Boolean => StorageKind::Boolean,
            DataType::Null => StorageKind::Null,
            _ => StorageKind::Other,
        }
    }

    /// Returns true for integer and floating point storage.
    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageKind::Integer | StorageKind::Float)
    }

    /// Default column type for this storage.
    pub fn default_type(&self) -> ColumnType {
        if self.is_numeric() {
            ColumnType::Numeric
        } else {
            ColumnType::Categorical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Integer => "integer",
            StorageKind::Float => "float",
            StorageKind::Text => "text",
            StorageKind::Boolean => "boolean",
            StorageKind::Null => "null",
            StorageKind::Other => "other",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("id".parse::<Role>().unwrap(), Role::Identifier);
        assert_eq!("Identifier".parse::<Role>().unwrap(), Role::Identifier);
        assert_eq!("INPUT".parse::<Role>().unwrap(), Role::Input);
        assert_eq!("target".parse::<Role>().unwrap(), Role::Target);
        assert_eq!("Reject".parse::<Role>().unwrap(), Role::Rejected);
        assert!("feature".parse::<Role>().is_err());
    }

    #[test]
    fn test_column_type_from_str() {
        assert_eq!("Number".parse::<ColumnType>().unwrap(), ColumnType::Numeric);
        assert_eq!(
            "categorical".parse::<ColumnType>().unwrap(),
            ColumnType::Categorical
        );
        assert!("money".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_storage_kind_from_dtype() {
        assert_eq!(StorageKind::from_dtype(&DataType::Int64), StorageKind::Integer);
        assert_eq!(StorageKind::from_dtype(&DataType::UInt8), StorageKind::Integer);
        assert_eq!(StorageKind::from_dtype(&DataType::Float32), StorageKind::Float);
        assert_eq!(StorageKind::from_dtype(&DataType::String), StorageKind::Text);
        assert_eq!(StorageKind::from_dtype(&DataType::Boolean), StorageKind::Boolean);
        assert_eq!(StorageKind::from_dtype(&DataType::Null), StorageKind::Null);
    }

    #[test]
    fn test_default_type_follows_storage() {
        assert_eq!(StorageKind::Integer.default_type(), ColumnType::Numeric);
        assert_eq!(StorageKind::Float.default_type(), ColumnType::Numeric);
        assert_eq!(StorageKind::Text.default_type(), ColumnType::Categorical);
        assert_eq!(StorageKind::Boolean.default_type(), ColumnType::Categorical);
    }
}
