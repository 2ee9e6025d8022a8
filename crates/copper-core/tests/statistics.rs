//! Tests for column statistics and correlation.

use copper_core::{
    Correlation, CorrelationSelection, Dataset, DatasetError, Role, SortOrder,
};
use polars::prelude::*;

fn sample() -> Dataset {
    let df = DataFrame::new(vec![
        Column::new("id".into(), [1i64, 2, 3, 4, 5]),
        Column::new("a".into(), [Some(1.0f64), Some(2.0), Some(3.0), Some(5.0), None]),
        Column::new("b".into(), [Some(10i64), None, None, Some(40), Some(20)]),
        Column::new("c".into(), [Some("x"), Some("y"), Some("x"), Some("z"), Some("w")]),
        Column::new("target".into(), [2.0f64, 4.0, 6.0, 8.0, 10.0]),
    ])
    .unwrap();
    Dataset::from_frame(df).unwrap()
}

#[test]
fn missing_ratio_in_table_order() {
    let ratios = sample().missing_ratio().unwrap();
    assert_eq!(ratios.names(), ["id", "a", "b", "c", "target"]);
    assert_eq!(ratios.values(), vec![0.0, 0.2, 0.4, 0.0, 0.0]);
}

#[test]
fn sorted_stats_reverse_for_distinct_values() {
    let unique = sample().unique_count().unwrap();
    assert_eq!(unique.values(), vec![5, 4, 3, 4, 5]);

    let ratios = sample().missing_ratio().unwrap();
    let ascending = ratios.clone().sorted(SortOrder::Ascending);
    assert_eq!(ascending.names(), ["id", "c", "target", "a", "b"]);
    let descending = ratios.sorted(SortOrder::Descending);
    assert_eq!(descending.names(), ["b", "a", "id", "c", "target"]);

    let distinct = copper_core::ColumnStats::new(vec![
        ("p".to_string(), 3usize),
        ("q".to_string(), 1),
        ("r".to_string(), 2),
    ]);
    let up = distinct.clone().sorted(SortOrder::Ascending).into_vec();
    let mut down = distinct.sorted(SortOrder::Descending).into_vec();
    down.reverse();
    assert_eq!(up, down);
}

#[test]
fn empty_table_has_zero_missing_ratio() {
    let df = DataFrame::new(vec![Column::new("x".into(), Vec::<f64>::new())]).unwrap();
    let ds = Dataset::from_frame(df).unwrap();
    assert_eq!(ds.missing_ratio().unwrap().get("x"), Some(0.0));
    assert_eq!(ds.role("x"), Some(Role::Input));
}

#[test]
fn auto_correlation_uses_target() {
    let Correlation::Vector { column, values } =
        sample().correlation(&CorrelationSelection::Auto).unwrap()
    else {
        panic!("expected a vector");
    };
    assert_eq!(column, "target");
    assert_eq!(values.names(), ["id", "a", "b"]);
    assert!((values.get("id").unwrap() - 1.0).abs() < 1e-12);
    let a = values.get("a").unwrap();
    assert!(a > 0.98 && a < 1.0);
    assert!(values.get("b").unwrap() < a);
}

#[test]
fn correlation_vector_sorts_ascending_on_request() {
    let Correlation::Vector { values, .. } = sample()
        .correlation_with_order(&CorrelationSelection::Auto, SortOrder::Ascending)
        .unwrap()
    else {
        panic!("expected a vector");
    };
    assert_eq!(values.names(), ["b", "a", "id"]);
}

#[test]
fn auto_correlation_without_target_is_a_matrix() {
    let mut ds = sample();
    ds.set_role("target", Role::Input).unwrap();
    let Correlation::Matrix(matrix) = ds.correlation(&CorrelationSelection::Auto).unwrap() else {
        panic!("expected a matrix");
    };
    assert_eq!(matrix.rows, ["id", "a", "b", "target"]);
    assert_eq!(matrix.columns, matrix.rows);
    assert!((matrix.get("a", "a").unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(matrix.get("a", "b"), matrix.get("b", "a"));
}

#[test]
fn selected_columns_give_all_rows() {
    let selection = CorrelationSelection::Columns(vec!["a".to_string(), "b".to_string()]);
    let Correlation::Matrix(matrix) = sample().correlation(&selection).unwrap() else {
        panic!("expected a matrix");
    };
    assert_eq!(matrix.rows.len(), 4);
    assert_eq!(matrix.columns, ["a", "b"]);
    // a and b share only rows 0 and 3
    assert!((matrix.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn correlation_rejects_text_columns() {
    let selection = CorrelationSelection::Columns(vec!["c".to_string()]);
    assert!(matches!(
        sample().correlation(&selection),
        Err(DatasetError::NonNumericColumn { column }) if column == "c"
    ));
    let selection = CorrelationSelection::Columns(vec!["zz".to_string()]);
    assert!(matches!(
        sample().correlation(&selection),
        Err(DatasetError::ColumnNotFound { .. })
    ));
}

#[test]
fn variance_explained_defaults_to_numeric_inputs() {
    let mut ds = sample();
    ds.fill_missing(None, &copper_core::FillMethod::MeanOrMode)
        .unwrap();
    let variance = ds.variance_explained(None).unwrap();

    // inputs a and b
    assert_eq!(variance.len(), 2);
    assert!((variance.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!(variance[0] >= variance[1]);

    let only_a = ds.variance_explained(Some(&["a".to_string()])).unwrap();
    assert_eq!(only_a.len(), 1);
    assert!((only_a[0] - 1.0).abs() < 1e-12);
}

#[test]
fn variance_explained_propagates_missing() {
    let variance = sample().variance_explained(None).unwrap();
    assert!(variance.iter().all(|v| v.is_nan()));
}
