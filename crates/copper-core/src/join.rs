//! Horizontal joins of classified tables.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::dataset::Dataset;
use crate::error::{DatasetError, Result};

/// Pad `column` with missing cells up to `height` rows.
fn pad(column: &Column, height: usize) -> Result<Column> {
    let missing = height - column.len();
    if missing == 0 {
        return Ok(column.clone());
    }
    let mut series = column.as_materialized_series().clone();
    series.append(&Series::full_null(column.name().clone(), missing, column.dtype()))?;
    Ok(series.into_column())
}

/// Join datasets side by side on row position.
///
/// The result has as many rows as the longest input; shorter inputs are
/// padded with missing cells. Every column keeps the role and type it had in
/// its source. Column names must be unique across inputs.
pub fn join(datasets: &[&Dataset]) -> Result<Dataset> {
    let height = datasets.iter().map(|ds| ds.len()).max().unwrap_or(0);
    let mut columns = Vec::new();
    let mut roles = BTreeMap::new();
    let mut types = BTreeMap::new();

    for ds in datasets {
        for column in ds.frame().get_columns() {
            let name = column.name().to_string();
            if roles.contains_key(&name) {
                return Err(DatasetError::DuplicateColumn { column: name });
            }
            if let (Some(role), Some(column_type)) = (ds.role(&name), ds.column_type(&name)) {
                roles.insert(name.clone(), role);
                types.insert(name, column_type);
            }
            columns.push(pad(column, height)?);
        }
    }

    let options = datasets
        .first()
        .map(|ds| ds.options().clone())
        .unwrap_or_default();
    let frame = DataFrame::new(columns)?;
    tracing::debug!(
        tables = datasets.len(),
        rows = frame.height(),
        columns = frame.width(),
        "Joined datasets"
    );
    Ok(Dataset::from_parts(frame, roles, types, options))
}
