//! Missing-value imputation.
//!
//! [`Dataset::fill_missing`] fills the selected non-Rejected columns by mean
//! (Numeric) or mode (Categorical), by a constant, or through an [`Imputer`]
//! such as [`KnnImputer`].

use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;

use copper_common::{column_f64_values, column_string_values};
use copper_model::{ColumnType, Role, StorageKind};
use polars::prelude::*;

use crate::classify::missing_count;
use crate::dataset::Dataset;
use crate::error::{DatasetError, Result};

/// Neighbours averaged by [`KnnImputer::default`].
pub const DEFAULT_NEIGHBORS: usize = 10;

/// Constant used by [`FillMethod::Constant`].
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    /// Fills Numeric columns.
    Number(f64),
    /// Fills Categorical text columns.
    Text(String),
}

/// How missing cells are filled.
#[derive(Debug, Clone, PartialEq)]
pub enum FillMethod {
    /// Mean for Numeric columns, most frequent value for Categorical ones.
    MeanOrMode,
    /// Values from the nearest complete rows, via [`KnnImputer`].
    NearestNeighbor,
    /// A fixed value.
    Constant(FillValue),
}

impl FromStr for FillMethod {
    type Err = DatasetError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" | "mode" | "mean-or-mode" => Ok(FillMethod::MeanOrMode),
            "knn" | "nearest-neighbor" => Ok(FillMethod::NearestNeighbor),
            _ => Err(DatasetError::UnsupportedImputationMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// Produces a fully imputed copy of a table.
pub trait Imputer {
    fn impute(&self, frame: &DataFrame) -> Result<DataFrame>;
}

/// k-nearest-neighbour imputation over the numeric columns.
///
/// Distances are Euclidean over z-scored values, using only the features
/// both rows have observed, scaled by the number of shared features. A
/// missing cell takes the mean of its `k` nearest rows that observe the
/// column, or the column mean when no such row shares a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnImputer {
    k: usize,
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self {
            k: DEFAULT_NEIGHBORS,
        }
    }
}

impl KnnImputer {
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1) }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn impute_matrix(&self, data: &[Vec<Option<f64>>]) -> Vec<Vec<Option<f64>>> {
        let columns = data.len();
        let rows = data.first().map_or(0, Vec::len);

        let moments: Vec<(Option<f64>, f64)> = data
            .iter()
            .map(|values| {
                let observed: Vec<f64> = values.iter().flatten().copied().collect();
                if observed.is_empty() {
                    return (None, 1.0);
                }
                let n = observed.len() as f64;
                let mean = observed.iter().sum::<f64>() / n;
                let var = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let std = if var > 0.0 { var.sqrt() } else { 1.0 };
                (Some(mean), std)
            })
            .collect();
        let z = |c: usize, r: usize| -> Option<f64> {
            let (mean, std) = moments[c];
            Some((data[c][r]? - mean?) / std)
        };

        let mut out = data.to_vec();
        for c in 0..columns {
            for r in 0..rows {
                if data[c][r].is_some() {
                    continue;
                }
                let mut neighbours: Vec<(f64, usize)> = (0..rows)
                    .filter(|&j| j != r && data[c][j].is_some())
                    .filter_map(|j| {
                        let (sum, shared) = (0..columns)
                            .filter(|&f| f != c)
                            .filter_map(|f| Some((z(f, r)? - z(f, j)?).powi(2)))
                            .fold((0.0, 0usize), |(s, n), d| (s + d, n + 1));
                        (shared > 0).then(|| ((sum / shared as f64).sqrt(), j))
                    })
                    .collect();
                neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
                neighbours.truncate(self.k);

                out[c][r] = if neighbours.is_empty() {
                    moments[c].0
                } else {
                    let total: f64 = neighbours.iter().filter_map(|&(_, j)| data[c][j]).sum();
                    Some(total / neighbours.len() as f64)
                };
            }
        }
        out
    }
}

impl Imputer for KnnImputer {
    fn impute(&self, frame: &DataFrame) -> Result<DataFrame> {
        let numeric: Vec<&Column> = frame
            .get_columns()
            .iter()
            .filter(|column| StorageKind::from_dtype(column.dtype()).is_numeric())
            .collect();
        let mut data = Vec::with_capacity(numeric.len());
        for column in &numeric {
            let values: Vec<Option<f64>> = column_f64_values(column)?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            data.push(values);
        }

        let imputed = self.impute_matrix(&data);
        let mut out = frame.clone();
        for ((column, before), values) in numeric.iter().zip(&data).zip(imputed) {
            // Complete columns keep their original dtype.
            if before.iter().all(Option::is_some) {
                continue;
            }
            out.with_column(Column::new(column.name().clone(), values))?;
        }
        tracing::debug!(columns = numeric.len(), k = self.k, "Ran nearest-neighbour imputation");
        Ok(out)
    }
}

/// Most frequent value; ties go to the value seen first.
fn mode<T: Eq + Hash + Clone>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (idx, value) in values.enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(value, _)| value)
}

fn fill_numbers(column: &Column, value: f64) -> Result<Column> {
    let filled: Vec<Option<f64>> = column_f64_values(column)?
        .into_iter()
        .map(|v| match v {
            Some(x) if !x.is_nan() => Some(x),
            _ => Some(value),
        })
        .collect();
    Ok(Column::new(column.name().clone(), filled))
}

fn fill_text(column: &Column, value: &str) -> Result<Column> {
    let filled: Vec<String> = column_string_values(column)?
        .into_iter()
        .map(|v| v.unwrap_or_else(|| value.to_string()))
        .collect();
    Ok(Column::new(column.name().clone(), filled))
}

fn column_mean(column: &Column) -> Result<Option<f64>> {
    let observed: Vec<f64> = column_f64_values(column)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    if observed.is_empty() {
        return Ok(None);
    }
    Ok(Some(observed.iter().sum::<f64>() / observed.len() as f64))
}

/// Fills a Categorical column with its mode, keeping its dtype.
fn fill_mode(column: &Column) -> Result<Option<Column>> {
    match StorageKind::from_dtype(column.dtype()) {
        StorageKind::Text => {
            let values = column_string_values(column)?;
            let Some(level) = mode(values.iter().flatten().cloned()) else {
                return Ok(None);
            };
            Ok(Some(fill_text(column, &level)?))
        }
        StorageKind::Integer | StorageKind::Float => {
            let values = column_f64_values(column)?;
            let observed = values.iter().flatten().filter(|v| !v.is_nan()).map(|v| v.to_bits());
            let Some(bits) = mode(observed) else {
                return Ok(None);
            };
            let filled = fill_numbers(column, f64::from_bits(bits))?;
            Ok(Some(filled.cast(column.dtype())?))
        }
        StorageKind::Boolean => {
            let values: Vec<Option<bool>> = column.bool()?.into_iter().collect();
            let Some(flag) = mode(values.iter().flatten().copied()) else {
                return Ok(None);
            };
            let filled: Vec<bool> = values.into_iter().map(|v| v.unwrap_or(flag)).collect();
            Ok(Some(Column::new(column.name().clone(), filled)))
        }
        StorageKind::Null | StorageKind::Other => Ok(None),
    }
}

impl Dataset {
    /// Parse `method` and fill missing cells; see [`Dataset::fill_missing`].
    pub fn fill_missing_by_name(&mut self, columns: Option<&[String]>, method: &str) -> Result<usize> {
        let method: FillMethod = method.parse()?;
        self.fill_missing(columns, &method)
    }

    /// Fill missing cells in `columns` (default: every column).
    ///
    /// Returns the number of cells filled. Unknown column names fail before
    /// anything is modified.
    pub fn fill_missing(&mut self, columns: Option<&[String]>, method: &FillMethod) -> Result<usize> {
        match method {
            FillMethod::NearestNeighbor => self.fill_missing_with(columns, &KnnImputer::default()),
            FillMethod::MeanOrMode | FillMethod::Constant(_) => {
                let selected = self.selected_columns(columns)?;
                let before = self.missing_cells(&selected)?;

                for name in &selected {
                    if self.role(name) == Some(Role::Rejected) {
                        continue;
                    }
                    let column = self.column(name)?;
                    if missing_count(column)? == 0 {
                        continue;
                    }
                    let filled = match (method, self.column_type(name)) {
                        (FillMethod::MeanOrMode, Some(ColumnType::Numeric)) => column_mean(column)?
                            .map(|mean| fill_numbers(column, mean))
                            .transpose()?,
                        (FillMethod::MeanOrMode, Some(ColumnType::Categorical)) => fill_mode(column)?,
                        (FillMethod::Constant(FillValue::Number(value)), Some(ColumnType::Numeric)) => {
                            Some(fill_numbers(column, *value)?)
                        }
                        (FillMethod::Constant(FillValue::Text(value)), Some(ColumnType::Categorical))
                            if StorageKind::from_dtype(column.dtype()) == StorageKind::Text =>
                        {
                            Some(fill_text(column, value)?)
                        }
                        _ => None,
                    };
                    if let Some(filled) = filled {
                        self.set_column(filled)?;
                    }
                }

                let filled = before.saturating_sub(self.missing_cells(&selected)?);
                tracing::info!(columns = selected.len(), filled, "Filled missing values");
                Ok(filled)
            }
        }
    }

    /// Fill missing cells in `columns` with values from `imputer`.
    ///
    /// The imputer sees the whole table; only the selected columns that have
    /// missing cells are copied back.
    pub fn fill_missing_with<I: Imputer + ?Sized>(&mut self, columns: Option<&[String]>, imputer: &I) -> Result<usize> {
        let selected = self.selected_columns(columns)?;
        let before = self.missing_cells(&selected)?;
        let imputed = imputer.impute(self.frame())?;
        for name in &selected {
            if missing_count(self.column(name)?)? == 0 {
                continue;
            }
            let column = imputed.column(name)?.clone();
            self.set_column(column)?;
        }
        let filled = before.saturating_sub(self.missing_cells(&selected)?);
        tracing::info!(columns = selected.len(), filled, "Imputed missing values");
        Ok(filled)
    }

    fn selected_columns(&self, columns: Option<&[String]>) -> Result<Vec<String>> {
        let Some(columns) = columns else {
            return Ok(self.columns().to_vec());
        };
        for name in columns {
            if self.role(name).is_none() {
                return Err(DatasetError::ColumnNotFound {
                    column: name.clone(),
                });
            }
        }
        Ok(columns.to_vec())
    }

    fn missing_cells(&self, columns: &[String]) -> Result<usize> {
        let mut total = 0;
        for name in columns {
            total += missing_count(self.column(name)?)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!("mean".parse::<FillMethod>().unwrap(), FillMethod::MeanOrMode);
        assert_eq!("MODE".parse::<FillMethod>().unwrap(), FillMethod::MeanOrMode);
        assert_eq!("knn".parse::<FillMethod>().unwrap(), FillMethod::NearestNeighbor);
        assert!(matches!(
            "median".parse::<FillMethod>(),
            Err(DatasetError::UnsupportedImputationMethod { method }) if method == "median"
        ));
    }

    #[test]
    fn test_mode_ties_go_to_first_seen() {
        assert_eq!(mode(["b", "a", "a", "b", "c"].into_iter()), Some("b"));
        assert_eq!(mode(["x", "y", "y"].into_iter()), Some("y"));
        assert_eq!(mode(std::iter::empty::<u8>()), None);
    }

    #[test]
    fn test_mean_fill_widens_integers() {
        let df = DataFrame::new(vec![Column::new("x".into(), [Some(1i64), None, Some(3)])]).unwrap();
        let mut ds = Dataset::from_frame(df).unwrap();
        assert_eq!(ds.fill_missing(None, &FillMethod::MeanOrMode).unwrap(), 1);

        let values: Vec<Option<f64>> = ds.column("x").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_mode_fill_keeps_integer_codes() {
        let df = DataFrame::new(vec![Column::new("grade".into(), [Some(2i64), Some(1), None, Some(1)])]).unwrap();
        let mut ds = Dataset::from_frame(df).unwrap();
        ds.set_type("grade", ColumnType::Categorical).unwrap();
        ds.fill_missing(None, &FillMethod::MeanOrMode).unwrap();

        let column = ds.column("grade").unwrap();
        assert_eq!(column.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = column.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(2), Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn test_constant_fill_respects_type() {
        let df = DataFrame::new(vec![
            Column::new("n".into(), [Some(1.0f64), None, Some(2.0)]),
            Column::new("s".into(), [Some("a"), None, Some("b")]),
        ])
        .unwrap();
        let mut ds = Dataset::from_frame(df).unwrap();
        let filled = ds
            .fill_missing(None, &FillMethod::Constant(FillValue::Text("?".to_string())))
            .unwrap();

        assert_eq!(filled, 1);
        assert_eq!(ds.column("n").unwrap().null_count(), 1);
        assert_eq!(ds.column("s").unwrap().null_count(), 0);
    }

    #[test]
    fn test_knn_uses_nearest_rows() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), [1.0f64, 1.1, 10.0, 10.2, 1.05]),
            Column::new("b".into(), [Some(5.0f64), Some(7.0), Some(100.0), Some(102.0), None]),
        ])
        .unwrap();
        let imputer = KnnImputer::new(2);
        let out = imputer.impute(&df).unwrap();

        let b: Vec<Option<f64>> = out.column("b").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(b[4], Some(6.0));
        assert_eq!(out.column("a").unwrap().null_count(), 0);
    }

    #[test]
    fn test_knn_falls_back_to_mean() {
        let df = DataFrame::new(vec![Column::new("only".into(), [Some(2.0f64), None, Some(4.0)])]).unwrap();
        let out = KnnImputer::default().impute(&df).unwrap();
        let values: Vec<Option<f64>> = out.column("only").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_knn_keeps_complete_integer_columns() {
        let df = DataFrame::new(vec![
            Column::new("ID".into(), [1i64, 2, 3, 4]),
            Column::new("x".into(), [Some(1.0f64), Some(2.0), None, Some(4.0)]),
            Column::new("Target".into(), [0i64, 1, 0, 1]),
        ])
        .unwrap();
        let mut ds = Dataset::from_frame(df).unwrap();
        assert_eq!(ds.fill_missing(None, &FillMethod::NearestNeighbor).unwrap(), 1);

        assert_eq!(ds.column("ID").unwrap().dtype(), &DataType::Int64);
        assert_eq!(ds.target().unwrap().dtype(), &DataType::Int64);
        assert_eq!(ds.column("x").unwrap().null_count(), 0);
    }

    #[test]
    fn test_knn_leaves_complete_columns_untouched() {
        let df = DataFrame::new(vec![
            Column::new("n".into(), [1i32, 2, 3]),
            Column::new("m".into(), [Some(1.0f64), None, Some(3.0)]),
        ])
        .unwrap();
        let out = KnnImputer::default().impute(&df).unwrap();
        assert_eq!(out.column("n").unwrap().dtype(), &DataType::Int32);
        assert_eq!(out.column("m").unwrap().null_count(), 0);
    }

    #[test]
    fn test_unknown_column_is_rejected_before_filling() {
        let df = DataFrame::new(vec![Column::new("x".into(), [Some(1.0f64), None])]).unwrap();
        let mut ds = Dataset::from_frame(df).unwrap();
        let result = ds.fill_missing(Some(&["x".to_string(), "y".to_string()]), &FillMethod::MeanOrMode);

        assert!(matches!(result, Err(DatasetError::ColumnNotFound { .. })));
        assert_eq!(ds.column("x").unwrap().null_count(), 1);
    }
}
