//! Column selection by role and type.

use std::collections::BTreeMap;

use copper_model::{ColumnType, Role};
use polars::prelude::*;

use crate::dataset::Dataset;
use crate::error::Result;

impl Dataset {
    /// Names of the columns whose role is in `roles` and whose type is in
    /// `types`, in table order. `None` accepts every role or type.
    pub fn filter_columns(&self, roles: Option<&[Role]>, types: Option<&[ColumnType]>) -> Vec<String> {
        let roles = roles.unwrap_or(&Role::ALL);
        let types = types.unwrap_or(&ColumnType::ALL);
        self.columns()
            .iter()
            .filter(|name| {
                self.role(name).is_some_and(|role| roles.contains(&role))
                    && self
                        .column_type(name)
                        .is_some_and(|column_type| types.contains(&column_type))
            })
            .cloned()
            .collect()
    }

    /// Projection of the table onto the filtered columns.
    pub fn filter_frame(&self, roles: Option<&[Role]>, types: Option<&[ColumnType]>) -> Result<DataFrame> {
        let columns = self.filter_columns(roles, types);
        Ok(self.frame().select(columns)?)
    }

    /// Classified sub-table of the filtered columns.
    ///
    /// Roles and types are copied from this dataset, not re-inferred.
    pub fn filter_dataset(&self, roles: Option<&[Role]>, types: Option<&[ColumnType]>) -> Result<Dataset> {
        let columns = self.filter_columns(roles, types);
        let frame = self.frame().select(columns.iter().map(String::as_str))?;
        let mut role_map = BTreeMap::new();
        let mut type_map = BTreeMap::new();
        for name in &columns {
            if let (Some(role), Some(column_type)) = (self.role(name), self.column_type(name)) {
                role_map.insert(name.clone(), role);
                type_map.insert(name.clone(), column_type);
            }
        }
        Ok(Dataset::from_parts(
            frame,
            role_map,
            type_map,
            self.options().clone(),
        ))
    }

    /// Numeric-typed columns, whatever their role.
    pub fn numbers(&self) -> Result<DataFrame> {
        self.filter_frame(None, Some(&[ColumnType::Numeric]))
    }

    /// Categorical-typed columns, whatever their role.
    pub fn categories(&self) -> Result<DataFrame> {
        self.filter_frame(None, Some(&[ColumnType::Categorical]))
    }
}
