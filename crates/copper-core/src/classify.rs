//! Role and type inference for a freshly assigned table.
//!
//! Roles are decided in order:
//! 1. names matching `ClassifyOptions::id_names` become Identifier
//! 2. the first name matching `target_names` becomes Target, later ones Rejected
//! 3. a missing ratio above `max_missing_ratio` rejects the column, whatever
//!    rules 1 and 2 decided
//! 4. everything else is Input
//!
//! Types follow storage: integer and float columns are Numeric, the rest
//! Categorical.

use std::collections::BTreeMap;

use copper_common::column_f64_values;
use copper_model::{ClassifyOptions, ColumnType, Role, StorageKind};
use polars::prelude::*;

/// Inferred role and type for every column of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub roles: BTreeMap<String, Role>,
    pub types: BTreeMap<String, ColumnType>,
}

/// Number of missing cells: nulls, plus NaN in float columns.
pub fn missing_count(column: &Column) -> PolarsResult<usize> {
    match StorageKind::from_dtype(column.dtype()) {
        StorageKind::Float => Ok(column_f64_values(column)?
            .iter()
            .filter(|v| v.is_none_or(f64::is_nan))
            .count()),
        _ => Ok(column.null_count()),
    }
}

/// Fraction of missing cells; 0.0 for a column with no rows.
pub fn missing_ratio(column: &Column) -> PolarsResult<f64> {
    let len = column.len();
    if len == 0 {
        return Ok(0.0);
    }
    Ok(missing_count(column)? as f64 / len as f64)
}

/// Infers the initial role of a single column from its name.
fn role_from_name(name: &str, options: &ClassifyOptions, target_taken: &mut bool) -> Role {
    if options.is_target_name(name) {
        if *target_taken {
            return Role::Rejected;
        }
        *target_taken = true;
        return Role::Target;
    }
    if options.is_id_name(name) {
        return Role::Identifier;
    }
    Role::Input
}

/// Classifies every column of `df`.
pub fn classify(df: &DataFrame, options: &ClassifyOptions) -> PolarsResult<Classification> {
    let mut classification = Classification::default();
    let mut target_taken = false;

    for column in df.get_columns() {
        let name = column.name().to_string();
        let mut role = role_from_name(&name, options, &mut target_taken);

        let ratio = missing_ratio(column)?;
        if ratio > options.max_missing_ratio {
            tracing::debug!(column = %name, ratio, "Rejecting column with too many missing values");
            role = Role::Rejected;
        }

        let column_type = StorageKind::from_dtype(column.dtype()).default_type();
        tracing::debug!(column = %name, role = %role, column_type = %column_type, "Classified column");

        classification.roles.insert(name.clone(), role);
        classification.types.insert(name, column_type);
    }

    Ok(classification)
}
