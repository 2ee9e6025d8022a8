//! Charting seam.
//!
//! Rendering lives outside this crate. [`Dataset::histogram`] hands the
//! numeric values of a column to a [`ChartSink`]; [`HistogramCollector`] is a
//! sink that only computes the bucket counts.

use copper_common::column_f64_values;
use copper_model::ColumnType;

use crate::dataset::Dataset;
use crate::error::{DatasetError, Result};

pub const DEFAULT_BINS: usize = 20;

/// Histogram drawing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramOptions {
    pub bins: usize,
    pub legend: bool,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            legend: false,
        }
    }
}

impl HistogramOptions {
    #[must_use]
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }
}

/// Receiver of chart requests.
pub trait ChartSink {
    fn histogram(&mut self, column: &str, values: &[f64], options: &HistogramOptions) -> Result<()>;
}

/// Equal-width buckets over the observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    /// `counts.len() + 1` boundaries, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramBins {
    /// Bucket `values` into `bins` equal-width bins.
    ///
    /// The last bin includes its upper edge. A constant sample is centred in
    /// a range of width one. No values (or zero bins) gives no buckets.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Self { edges, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Sink that records the bucket counts of every histogram it receives.
#[derive(Debug, Clone, Default)]
pub struct HistogramCollector {
    pub histograms: Vec<(String, HistogramBins)>,
}

impl ChartSink for HistogramCollector {
    fn histogram(&mut self, column: &str, values: &[f64], options: &HistogramOptions) -> Result<()> {
        self.histograms
            .push((column.to_string(), HistogramBins::compute(values, options.bins)));
        Ok(())
    }
}

impl Dataset {
    /// Send the observed numeric values of `column` to `sink`.
    ///
    /// Text columns are accepted when typed Numeric; their values are parsed.
    pub fn histogram<S: ChartSink + ?Sized>(
        &self,
        column: &str,
        options: &HistogramOptions,
        sink: &mut S,
    ) -> Result<()> {
        let data = self.column(column)?;
        if !self.storage(column)?.is_numeric() && self.column_type(column) != Some(ColumnType::Numeric) {
            return Err(DatasetError::NonNumericColumn {
                column: column.to_string(),
            });
        }
        let values: Vec<f64> = column_f64_values(data)?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        tracing::debug!(column, values = values.len(), bins = options.bins, "Sending histogram");
        sink.histogram(column, &values, options)
    }
}
