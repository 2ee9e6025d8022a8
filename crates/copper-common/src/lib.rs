//! Shared utilities for the copper crates.
//!
//! - [`polars`]: `AnyValue` conversions and column extraction helpers
//! - [`logging`]: `tracing-subscriber` setup for applications embedding copper

pub mod logging;
pub mod polars;

pub use logging::{LogConfig, LogFormat, init_logging, init_logging_with_writer};
pub use polars::{any_to_string, column_f64_values, column_string_values, format_numeric, parse_f64};
