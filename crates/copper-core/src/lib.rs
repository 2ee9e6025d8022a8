//! Classified tables for machine-learning data preparation.
//!
//! A [`Dataset`] wraps a Polars `DataFrame` and gives every column a
//! [`Role`](copper_model::Role) and a [`ColumnType`](copper_model::ColumnType).
//! Roles and types are inferred when a table is assigned and can be
//! overridden afterwards; every view is derived from the current
//! classification.
//!
//! # Example
//!
//! ```ignore
//! use copper_core::{Dataset, FillMethod};
//! use copper_ingest::CsvSource;
//!
//! let mut ds = Dataset::load(&CsvSource::from_env(), "train")?;
//! ds.fill_missing(None, &FillMethod::MeanOrMode)?;
//! let x = ds.inputs()?;
//! let y = ds.target()?;
//! ```

pub mod chart;
pub mod classify;
pub mod dataset;
pub mod error;
mod filter;
pub mod impute;
pub mod join;
mod metadata;
pub mod stats;
pub mod views;

pub use chart::{ChartSink, DEFAULT_BINS, HistogramBins, HistogramCollector, HistogramOptions};
pub use classify::{Classification, classify, missing_count, missing_ratio};
pub use dataset::{DEFAULT_PREVIEW_ROWS, Dataset};
pub use error::{DatasetError, Result};
pub use impute::{DEFAULT_NEIGHBORS, FillMethod, FillValue, Imputer, KnnImputer};
pub use join::join;
pub use stats::{
    ColumnStats, Correlation, CorrelationMatrix, CorrelationSelection, SortOrder, StatValue,
    pearson,
};
pub use views::InputsReport;

pub use copper_model::{ClassifyOptions, ColumnMetadata, ColumnType, Role, StorageKind};
