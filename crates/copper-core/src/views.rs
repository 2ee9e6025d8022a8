//! Model-ready projections: the inputs matrix and the target vector.
//!
//! | type \ storage | integer / float          | text                        |
//! |----------------|--------------------------|-----------------------------|
//! | Numeric        | passed through           | parsed, bad tokens missing  |
//! | Categorical    | one indicator per code   | one indicator per level     |
//!
//! Any other combination cannot be encoded and the column is skipped. So is
//! a column whose output names clash with a column already encoded.

use std::collections::{BTreeSet, HashMap, HashSet};

use copper_common::{column_f64_values, column_string_values, format_numeric};
use copper_model::{ColumnType, Role, StorageKind};
use polars::prelude::*;

use crate::dataset::Dataset;
use crate::error::{DatasetError, Result};

/// Inputs matrix plus the columns that could not be encoded.
#[derive(Debug)]
pub struct InputsReport {
    pub frame: DataFrame,
    pub skipped: Vec<DatasetError>,
}

impl Dataset {
    /// Input columns encoded for modelling, row-aligned with the table.
    ///
    /// Columns that cannot be encoded are skipped with a warning.
    pub fn inputs(&self) -> Result<DataFrame> {
        Ok(self.inputs_report()?.frame)
    }

    /// Like [`Dataset::inputs`], also returning the skipped columns.
    pub fn inputs_report(&self) -> Result<InputsReport> {
        let mut encoded: Vec<Column> = Vec::new();
        let mut names: HashSet<PlSmallStr> = HashSet::new();
        let mut skipped = Vec::new();

        for name in self.filter_columns(Some(&[Role::Input]), None) {
            let column = self.column(&name)?;
            let storage = StorageKind::from_dtype(column.dtype());
            let column_type = self
                .column_type(&name)
                .unwrap_or_else(|| storage.default_type());

            let produced = match (column_type, storage) {
                (ColumnType::Numeric, StorageKind::Integer | StorageKind::Float) => {
                    vec![column.clone()]
                }
                (ColumnType::Numeric, StorageKind::Text) => {
                    let values = column_f64_values(column)?;
                    vec![Column::new(name.as_str().into(), values)]
                }
                (ColumnType::Categorical, StorageKind::Integer | StorageKind::Float) => {
                    numeric_indicators(&name, column)?
                }
                (ColumnType::Categorical, StorageKind::Text) => text_indicators(&name, column)?,
                (column_type, storage) => {
                    tracing::warn!(
                        column = %name,
                        column_type = %column_type,
                        storage = %storage,
                        "Skipping input column that cannot be encoded"
                    );
                    skipped.push(DatasetError::MalformedColumnClassification {
                        column: name,
                        column_type,
                        storage,
                    });
                    continue;
                }
            };

            let clash = {
                let mut fresh = HashSet::new();
                produced
                    .iter()
                    .map(Column::name)
                    .find(|output| names.contains(*output) || !fresh.insert(*output))
                    .cloned()
            };
            if let Some(clash) = clash {
                tracing::warn!(
                    column = %name,
                    output = %clash,
                    "Skipping input column whose encoding clashes with another column"
                );
                skipped.push(DatasetError::InputNameClash {
                    column: name.clone(),
                    output: clash.to_string(),
                });
                continue;
            }
            names.extend(produced.iter().map(|column| column.name().clone()));
            encoded.extend(produced);
        }

        tracing::debug!(
            columns = encoded.len(),
            skipped = skipped.len(),
            "Encoded inputs"
        );
        let frame = if encoded.is_empty() {
            DataFrame::empty_with_height(self.len())
        } else {
            DataFrame::new(encoded)?
        };
        Ok(InputsReport { frame, skipped })
    }

    /// The first Target-role column, in table order.
    ///
    /// Numeric storage is returned unchanged. Other storage is coded as
    /// integers, numbering levels by first occurrence; missing stays missing.
    pub fn target(&self) -> Result<Column> {
        let name = self
            .filter_columns(Some(&[Role::Target]), None)
            .into_iter()
            .next()
            .ok_or(DatasetError::NoTargetColumn)?;
        let column = self.column(&name)?;
        if StorageKind::from_dtype(column.dtype()).is_numeric() {
            return Ok(column.clone());
        }

        let mut codes: HashMap<String, i64> = HashMap::new();
        let values: Vec<Option<i64>> = column_string_values(column)?
            .into_iter()
            .map(|value| {
                value.map(|level| {
                    let next = codes.len() as i64;
                    *codes.entry(level).or_insert(next)
                })
            })
            .collect();
        tracing::debug!(column = %name, levels = codes.len(), "Encoded target levels");
        Ok(Column::new(name.as_str().into(), values))
    }
}

fn indicator(name: &str, level: &str, hits: impl Iterator<Item = bool>) -> Column {
    let values: Vec<u8> = hits.map(u8::from).collect();
    Column::new(format!("{name}_{level}").into(), values)
}

fn numeric_indicators(name: &str, column: &Column) -> Result<Vec<Column>> {
    let values = column_f64_values(column)?;
    let mut levels: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();

    Ok(levels
        .iter()
        .map(|&level| {
            indicator(
                name,
                &format_numeric(level),
                values.iter().map(|v| *v == Some(level)),
            )
        })
        .collect())
}

fn text_indicators(name: &str, column: &Column) -> Result<Vec<Column>> {
    let values = column_string_values(column)?;
    let levels: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();

    Ok(levels
        .into_iter()
        .map(|level| {
            indicator(
                name,
                level,
                values.iter().map(|v| v.as_deref() == Some(level)),
            )
        })
        .collect())
}
