//! CSV reading utilities.

mod header;
mod reader;

pub use header::{parse_csv_line, read_header};
pub use reader::{check_file_size_with_limit, read_csv_table, validate_encoding};
