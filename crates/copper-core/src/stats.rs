//! Column statistics: missing ratio, unique counts, correlation, and
//! variance explained.

use std::cmp::Ordering;
use std::collections::HashSet;

use copper_common::{column_f64_values, column_string_values};
use copper_model::{ColumnType, Role, StorageKind};
use nalgebra::DMatrix;
use polars::prelude::*;

use crate::classify::missing_ratio;
use crate::dataset::Dataset;
use crate::error::{DatasetError, Result};

/// Iteration cap for the singular value decomposition.
const SVD_MAX_ITERATIONS: usize = 10_000;

/// Direction for [`ColumnStats::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Values that can be ranked; missing values sort last in either direction.
pub trait StatValue: Copy + PartialOrd {
    fn is_missing(&self) -> bool {
        false
    }
}

impl StatValue for f64 {
    fn is_missing(&self) -> bool {
        self.is_nan()
    }
}

impl StatValue for usize {}

/// One value per column, kept in table order until sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats<T> {
    entries: Vec<(String, T)>,
}

impl<T: StatValue> ColumnStats<T> {
    pub fn new(entries: Vec<(String, T)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, column: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<T> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }

    /// Stable sort by value; ties keep their current order.
    #[must_use]
    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.entries.sort_by(|(_, a), (_, b)| match (a.is_missing(), b.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            }
        });
        self
    }

    pub fn into_vec(self) -> Vec<(String, T)> {
        self.entries
    }
}

/// Columns a correlation is computed for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorrelationSelection {
    /// The Target-role column if there is one, otherwise every numeric column.
    #[default]
    Auto,
    /// Every numeric column.
    All,
    /// Named columns; a single name yields a vector.
    Columns(Vec<String>),
}

/// Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    /// One column against every other numeric column, sorted descending.
    Vector {
        column: String,
        values: ColumnStats<f64>,
    },
    /// Every numeric column (rows) against the selected columns.
    Matrix(CorrelationMatrix),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// Row-major, `rows.len() × columns.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.values[i][j])
    }
}

/// Pearson correlation over pairwise-complete observations.
///
/// NaN when fewer than two pairs remain or either side has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

fn distinct_count(column: &Column) -> PolarsResult<usize> {
    if StorageKind::from_dtype(column.dtype()).is_numeric() {
        let distinct: HashSet<u64> = column_f64_values(column)?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .map(|v| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
            .collect();
        return Ok(distinct.len());
    }
    let distinct: HashSet<String> = column_string_values(column)?.into_iter().flatten().collect();
    Ok(distinct.len())
}

impl Dataset {
    /// Fraction of missing cells per column; 0.0 for every column of an empty table.
    pub fn missing_ratio(&self) -> Result<ColumnStats<f64>> {
        let mut entries = Vec::with_capacity(self.width());
        for column in self.frame().get_columns() {
            entries.push((column.name().to_string(), missing_ratio(column)?));
        }
        Ok(ColumnStats::new(entries))
    }

    /// Distinct non-missing values per column.
    pub fn unique_count(&self) -> Result<ColumnStats<usize>> {
        let mut entries = Vec::with_capacity(self.width());
        for column in self.frame().get_columns() {
            entries.push((column.name().to_string(), distinct_count(column)?));
        }
        Ok(ColumnStats::new(entries))
    }

    /// Columns with integer or float storage, in table order.
    fn numeric_columns(&self) -> Vec<String> {
        self.frame()
            .get_columns()
            .iter()
            .filter(|column| StorageKind::from_dtype(column.dtype()).is_numeric())
            .map(|column| column.name().to_string())
            .collect()
    }

    /// Pearson correlation between numeric columns.
    ///
    /// A single-column selection gives a vector sorted descending; use
    /// [`Dataset::correlation_with_order`] for ascending.
    pub fn correlation(&self, selection: &CorrelationSelection) -> Result<Correlation> {
        self.correlation_with_order(selection, SortOrder::Descending)
    }

    /// Like [`Dataset::correlation`], sorting a vector result by `order`.
    pub fn correlation_with_order(&self, selection: &CorrelationSelection, order: SortOrder) -> Result<Correlation> {
        let numeric = self.numeric_columns();
        let selected: Vec<String> = match selection {
            CorrelationSelection::Auto => {
                match self.filter_columns(Some(&[Role::Target]), None).into_iter().next() {
                    Some(target) => vec![target],
                    None => {
                        return self.correlation_matrix(&numeric, numeric.clone());
                    }
                }
            }
            CorrelationSelection::All => {
                return self.correlation_matrix(&numeric, numeric.clone());
            }
            CorrelationSelection::Columns(columns) => columns.clone(),
        };

        for name in &selected {
            if !self.storage(name)?.is_numeric() {
                return Err(DatasetError::NonNumericColumn {
                    column: name.clone(),
                });
            }
        }

        match selected.as_slice() {
            [single] => {
                let base = column_f64_values(self.column(single)?)?;
                let mut entries = Vec::with_capacity(numeric.len());
                for other in numeric.iter().filter(|name| *name != single) {
                    let values = column_f64_values(self.column(other)?)?;
                    entries.push((other.clone(), pearson(&base, &values)));
                }
                Ok(Correlation::Vector {
                    column: single.clone(),
                    values: ColumnStats::new(entries).sorted(order),
                })
            }
            _ => self.correlation_matrix(&numeric, selected),
        }
    }

    fn correlation_matrix(&self, rows: &[String], columns: Vec<String>) -> Result<Correlation> {
        let mut row_values = Vec::with_capacity(rows.len());
        for name in rows {
            row_values.push(column_f64_values(self.column(name)?)?);
        }
        let mut column_values = Vec::with_capacity(columns.len());
        for name in &columns {
            column_values.push(column_f64_values(self.column(name)?)?);
        }

        let values = row_values
            .iter()
            .map(|x| column_values.iter().map(|y| pearson(x, y)).collect())
            .collect();
        Ok(Correlation::Matrix(CorrelationMatrix {
            rows: rows.to_vec(),
            columns,
            values,
        }))
    }

    /// Share of the total squared singular values carried by each component,
    /// descending.
    ///
    /// Defaults to the Input, Numeric columns. Any missing or non-finite cell
    /// makes every share NaN, so impute first.
    pub fn variance_explained(&self, columns: Option<&[String]>) -> Result<Vec<f64>> {
        let columns = match columns {
            Some(columns) => columns.to_vec(),
            None => self.filter_columns(Some(&[Role::Input]), Some(&[ColumnType::Numeric])),
        };
        let rows = self.len();
        let features = columns.len();
        if rows == 0 || features == 0 {
            return Ok(Vec::new());
        }

        let mut values = Vec::with_capacity(features);
        for name in &columns {
            values.push(column_f64_values(self.column(name)?)?);
        }
        let components = rows.min(features);
        if values.iter().flatten().any(|v| !v.is_some_and(f64::is_finite)) {
            tracing::debug!(rows, features, "Missing values in variance explained input");
            return Ok(vec![f64::NAN; components]);
        }
        let matrix = DMatrix::from_fn(rows, features, |i, j| values[j][i].unwrap_or_default());

        let svd = matrix
            .try_svd(false, false, f64::EPSILON, SVD_MAX_ITERATIONS)
            .ok_or(DatasetError::SvdDidNotConverge { rows, features })?;
        let mut mass: Vec<f64> = svd.singular_values.iter().map(|s| s * s).collect();
        mass.sort_by(|a, b| b.total_cmp(a));

        let total: f64 = mass.iter().sum();
        tracing::debug!(rows, features, total, "Computed variance explained");
        Ok(mass.into_iter().map(|v| v / total).collect())
    }
}
