//! Tests for column value extraction.

use copper_common::{column_f64_values, column_string_values};
use polars::prelude::*;

#[test]
fn boolean_columns_have_no_numeric_values() {
    let column = Column::new("flag".into(), vec![Some(true), None, Some(false)]);
    assert_eq!(column_f64_values(&column).unwrap(), vec![None, None, None]);
}

#[test]
fn boolean_columns_render_as_words() {
    let column = Column::new("flag".into(), vec![Some(true), None, Some(false)]);
    assert_eq!(
        column_string_values(&column).unwrap(),
        vec![Some("true".to_string()), None, Some("false".to_string())]
    );
}

#[test]
fn text_with_thousands_separators_parses() {
    let column = Column::new("income".into(), vec![Some("1,200"), Some(" 35 "), Some("")]);
    assert_eq!(
        column_f64_values(&column).unwrap(),
        vec![Some(1200.0), Some(35.0), None]
    );
}
