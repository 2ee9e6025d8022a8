//! Tests for loading tables through a source and inspecting their metadata.

use std::fs;

use copper_core::{Dataset, DatasetError, Role, join};
use copper_ingest::{CsvSource, IngestError, MemorySource, ProjectConfig};
use polars::prelude::*;
use tempfile::TempDir;

const TRAIN: &str = "\
ID,Age,Income,Color,Target
1,23,,red,0
2,35,,blue,1
3,41,52000.5,red,0
4,29,,green,1
";

fn csv_source() -> (TempDir, CsvSource) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("train.csv"), TRAIN).unwrap();
    let source = CsvSource::new(ProjectConfig::new(dir.path()));
    (dir, source)
}

fn listing(ds: &Dataset) -> String {
    ds.metadata()
        .iter()
        .map(|m| format!("{} {} {} {}", m.name, m.role, m.column_type, m.dtype))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn load_classifies_csv_columns() {
    let (_dir, source) = csv_source();
    let ds = Dataset::load(&source, "train").unwrap();

    assert_eq!(ds.len(), 4);
    insta::assert_snapshot!(listing(&ds), @r"
    ID ID Number i64
    Age Input Number i64
    Income Reject Number f64
    Color Input Category str
    Target Target Number i64
    ");
}

#[test]
fn metadata_serializes_as_records() {
    let (_dir, source) = csv_source();
    let ds = Dataset::load(&source, "train").unwrap();

    let json = serde_json::to_value(&ds.metadata()[3]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Color",
            "role": "Input",
            "type": "Categorical",
            "storage": "Text",
            "dtype": "str",
        })
    );
}

#[test]
fn load_reports_missing_tables() {
    let (_dir, source) = csv_source();
    let result = Dataset::load(&source, "test");
    assert!(matches!(
        result,
        Err(DatasetError::Ingest(IngestError::FileNotFound { .. }))
    ));
}

#[test]
fn inputs_after_load() {
    let (_dir, source) = csv_source();
    let ds = Dataset::load(&source, "train").unwrap();
    let report = ds.inputs_report().unwrap();

    let names: Vec<String> = report
        .frame
        .get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, ["Age", "Color_blue", "Color_green", "Color_red"]);
    assert!(report.skipped.is_empty());
    assert_eq!(report.frame.height(), ds.len());
}

#[test]
fn memory_source_and_join() {
    let people = DataFrame::new(vec![
        Column::new("id".into(), [1i64, 2]),
        Column::new("age".into(), [30i64, 40]),
    ])
    .unwrap();
    let labels = DataFrame::new(vec![Column::new("target".into(), ["a", "b"])]).unwrap();
    let source = MemorySource::new()
        .with_table("people", people)
        .with_table("labels", labels);

    let left = Dataset::load(&source, "people").unwrap();
    let right = Dataset::load(&source, "labels").unwrap();
    let joined = join(&[&left, &right]).unwrap();

    assert_eq!(joined.role("target"), Some(Role::Target));
    assert_eq!(joined.target().unwrap().len(), 2);
    assert!(joined.to_string().contains("age"));
}
