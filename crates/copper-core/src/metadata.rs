//! Per-column metadata view and table rendering.

use std::fmt;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use copper_model::{ColumnMetadata, StorageKind};
use polars::prelude::*;

use crate::dataset::Dataset;
use crate::error::Result;

impl Dataset {
    /// One record per column, in table order.
    pub fn metadata(&self) -> Vec<ColumnMetadata> {
        self.frame()
            .get_columns()
            .iter()
            .filter_map(|column| {
                let name = column.name().to_string();
                Some(ColumnMetadata {
                    role: self.role(&name)?,
                    column_type: self.column_type(&name)?,
                    storage: StorageKind::from_dtype(column.dtype()),
                    dtype: column.dtype().to_string(),
                    name,
                })
            })
            .collect()
    }

    /// Metadata as a frame with columns `Column`, `Role`, `Type`, `dtype`.
    pub fn metadata_frame(&self) -> Result<DataFrame> {
        let metadata = self.metadata();
        let names: Vec<&str> = metadata.iter().map(|m| m.name.as_str()).collect();
        let roles: Vec<&str> = metadata.iter().map(|m| m.role.as_str()).collect();
        let types: Vec<&str> = metadata.iter().map(|m| m.column_type.as_str()).collect();
        let dtypes: Vec<&str> = metadata.iter().map(|m| m.dtype.as_str()).collect();
        Ok(DataFrame::new(vec![
            Column::new("Column".into(), names),
            Column::new("Role".into(), roles),
            Column::new("Type".into(), types),
            Column::new("dtype".into(), dtypes),
        ])?)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Column"),
            header_cell("Role"),
            header_cell("Type"),
            header_cell("dtype"),
        ]);
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        for meta in self.metadata() {
            table.add_row(vec![
                Cell::new(&meta.name),
                Cell::new(meta.role),
                Cell::new(meta.column_type),
                Cell::new(&meta.dtype),
            ]);
        }
        write!(f, "{table}")
    }
}
