//! Tests for role and type inference on table assignment.

use std::collections::BTreeSet;

use copper_core::{ClassifyOptions, ColumnType, Dataset, Role};
use polars::prelude::*;
use proptest::prelude::*;

fn scenario_frame() -> DataFrame {
    let income: Vec<Option<f64>> = (0..10)
        .map(|i| if i < 6 { None } else { Some(40_000.0 + f64::from(i) * 1_000.0) })
        .collect();
    DataFrame::new(vec![
        Column::new("ID".into(), (1..=10).collect::<Vec<i64>>()),
        Column::new("Age".into(), [23i64, 35, 41, 29, 52, 61, 38, 44, 27, 33]),
        Column::new("Income".into(), income),
        Column::new("Target".into(), [0i64, 1, 0, 0, 1, 1, 0, 1, 0, 1]),
    ])
    .unwrap()
}

#[test]
fn scenario_roles_follow_names_and_missing_ratio() {
    let ds = Dataset::from_frame(scenario_frame()).unwrap();

    assert_eq!(ds.role("ID"), Some(Role::Identifier));
    assert_eq!(ds.role("Age"), Some(Role::Input));
    assert_eq!(ds.role("Income"), Some(Role::Rejected));
    assert_eq!(ds.role("Target"), Some(Role::Target));
    assert!(ds.types().all(|(_, t)| t == ColumnType::Numeric));
}

#[test]
fn second_target_named_column_is_rejected() {
    let df = DataFrame::new(vec![
        Column::new("Target".into(), [1i64, 0]),
        Column::new("target".into(), [0i64, 1]),
    ])
    .unwrap();
    let ds = Dataset::from_frame(df).unwrap();

    assert_eq!(ds.role("Target"), Some(Role::Target));
    assert_eq!(ds.role("target"), Some(Role::Rejected));
}

#[test]
fn lowercase_id_is_identifier() {
    let df = DataFrame::new(vec![
        Column::new("id".into(), ["a", "b", "c"]),
        Column::new("idx".into(), [1i64, 2, 3]),
    ])
    .unwrap();
    let ds = Dataset::from_frame(df).unwrap();

    assert_eq!(ds.role("id"), Some(Role::Identifier));
    assert_eq!(ds.column_type("id"), Some(ColumnType::Categorical));
    assert_eq!(ds.role("idx"), Some(Role::Input));
}

#[test]
fn custom_options_change_the_heuristics() {
    let options = ClassifyOptions::default()
        .with_id_names(["customer_id"])
        .with_target_names(["churned"])
        .with_max_missing_ratio(0.9);
    let df = DataFrame::new(vec![
        Column::new("Customer_ID".into(), [1i64, 2, 3]),
        Column::new("sparse".into(), [None, None, Some(1.0f64)]),
        Column::new("churned".into(), ["y", "n", "y"]),
    ])
    .unwrap();
    let ds = Dataset::with_options(df, options).unwrap();

    assert_eq!(ds.role("Customer_ID"), Some(Role::Identifier));
    assert_eq!(ds.role("sparse"), Some(Role::Input));
    assert_eq!(ds.role("churned"), Some(Role::Target));
}

#[test]
fn overrides_survive_until_next_assignment() {
    let mut ds = Dataset::from_frame(scenario_frame()).unwrap();
    ds.set_role("Income", Role::Input).unwrap();
    ds.set_type("Age", ColumnType::Categorical).unwrap();

    assert_eq!(ds.role("Income"), Some(Role::Input));
    assert_eq!(ds.column_type("Age"), Some(ColumnType::Categorical));

    ds.set_frame(scenario_frame()).unwrap();
    assert_eq!(ds.role("Income"), Some(Role::Rejected));
    assert_eq!(ds.column_type("Age"), Some(ColumnType::Numeric));
}

#[test]
fn target_requires_a_target_role() {
    let mut ds = Dataset::from_frame(scenario_frame()).unwrap();
    assert!(ds.target().is_ok());

    ds.set_role("Target", Role::Input).unwrap();
    assert!(matches!(
        ds.target(),
        Err(copper_core::DatasetError::NoTargetColumn)
    ));
}

#[test]
fn empty_dataset_has_no_columns() {
    let ds = Dataset::new();
    assert!(ds.is_empty());
    assert!(ds.filter_columns(None, None).is_empty());
    assert!(ds.metadata().is_empty());
}

fn table_strategy() -> impl Strategy<Value = DataFrame> {
    prop::collection::btree_set("[a-z]{1,6}", 1..8)
        .prop_flat_map(|names| {
            let n = names.len();
            (
                Just(names),
                prop::collection::vec(
                    prop::collection::vec(prop::option::of(-100i64..100), 8),
                    n,
                ),
            )
        })
        .prop_map(|(names, data)| {
            let columns: Vec<Column> = names
                .into_iter()
                .zip(data)
                .map(|(name, values)| Column::new(name.into(), values))
                .collect();
            DataFrame::new(columns).unwrap()
        })
}

proptest! {
    #[test]
    fn classification_covers_every_column(df in table_strategy()) {
        let ds = Dataset::from_frame(df.clone()).unwrap();
        let order: Vec<String> = df
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        prop_assert_eq!(ds.columns(), order.as_slice());
        let role_keys: Vec<&str> = ds.roles().map(|(name, _)| name).collect();
        let type_keys: Vec<&str> = ds.types().map(|(name, _)| name).collect();
        prop_assert_eq!(role_keys.len(), order.len());
        prop_assert_eq!(type_keys.len(), order.len());
        prop_assert_eq!(ds.filter_columns(None, None), order);
    }

    #[test]
    fn role_filters_partition_the_columns(df in table_strategy()) {
        let ds = Dataset::from_frame(df).unwrap();

        let mut union = BTreeSet::new();
        let mut total = 0;
        for role in Role::ALL {
            let columns = ds.filter_columns(Some(&[role]), None);
            total += columns.len();
            union.extend(columns);
        }
        let all: BTreeSet<String> = ds.columns().iter().cloned().collect();

        prop_assert_eq!(total, ds.width());
        prop_assert_eq!(union, all);
        prop_assert!(ds.filter_columns(Some(&[Role::Target]), None).len() <= 1);
    }

    #[test]
    fn sparse_columns_are_always_rejected(df in table_strategy()) {
        let ds = Dataset::from_frame(df.clone()).unwrap();
        for column in df.get_columns() {
            if column.null_count() * 2 > column.len() {
                prop_assert_eq!(ds.role(column.name().as_str()), Some(Role::Rejected));
            }
        }
    }
}
