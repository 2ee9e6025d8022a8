//! The classified table aggregate.

use std::collections::BTreeMap;

use copper_common::column_f64_values;
use copper_ingest::TableSource;
use copper_model::{ClassifyOptions, ColumnType, Role, StorageKind};
use polars::prelude::*;

use crate::classify::{Classification, classify};
use crate::error::{DatasetError, Result};

/// Rows shown by [`Dataset::head`] and [`Dataset::tail`] callers that have no preference.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Characters stripped from column names by [`Dataset::fix_names`].
const NAME_SYMBOLS: [char; 3] = [' ', '.', '-'];

/// A table whose columns each carry a [`Role`] and a [`ColumnType`].
///
/// Assigning a table (construction, [`Dataset::load`], [`Dataset::set_frame`])
/// classifies every column and discards earlier overrides. Overrides made
/// afterwards with [`Dataset::set_role`] and [`Dataset::set_type`] persist until
/// the next assignment.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    columns: Vec<String>,
    roles: BTreeMap<String, Role>,
    types: BTreeMap<String, ColumnType>,
    options: ClassifyOptions,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            frame: DataFrame::empty(),
            columns: Vec::new(),
            roles: BTreeMap::new(),
            types: BTreeMap::new(),
            options: ClassifyOptions::default(),
        }
    }
}

impl Dataset {
    /// Empty dataset with default classification options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `frame` with the default options.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        Self::with_options(frame, ClassifyOptions::default())
    }

    /// Classify `frame` with custom options.
    pub fn with_options(frame: DataFrame, options: ClassifyOptions) -> Result<Self> {
        let mut dataset = Self {
            options,
            ..Self::default()
        };
        dataset.set_frame(frame)?;
        Ok(dataset)
    }

    /// Read table `id` from `source` and classify it.
    pub fn load<S: TableSource + ?Sized>(source: &S, id: &str) -> Result<Self> {
        let frame = source.read_table(id)?;
        let dataset = Self::from_frame(frame)?;
        tracing::info!(
            id,
            rows = dataset.len(),
            columns = dataset.width(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Replace the table and re-classify every column.
    pub fn set_frame(&mut self, frame: DataFrame) -> Result<()> {
        let Classification { roles, types } = classify(&frame, &self.options)?;
        self.columns = frame
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        self.roles = roles;
        self.types = types;
        self.frame = frame;
        tracing::debug!(columns = self.columns.len(), rows = self.len(), "Assigned table");
        Ok(())
    }

    pub(crate) fn from_parts(
        frame: DataFrame,
        roles: BTreeMap<String, Role>,
        types: BTreeMap<String, ColumnType>,
        options: ClassifyOptions,
    ) -> Self {
        let columns = frame
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        Self {
            frame,
            columns,
            roles,
            types,
            options,
        }
    }

    pub fn options(&self) -> &ClassifyOptions {
        &self.options
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Column names in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| DatasetError::ColumnNotFound {
                column: name.to_string(),
            })
    }

    pub fn role(&self, name: &str) -> Option<Role> {
        self.roles.get(name).copied()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.types.get(name).copied()
    }

    /// Storage kind of a column's values.
    pub fn storage(&self, name: &str) -> Result<StorageKind> {
        Ok(StorageKind::from_dtype(self.column(name)?.dtype()))
    }

    /// Role of every column, in table order.
    pub fn roles(&self) -> impl Iterator<Item = (&str, Role)> + '_ {
        self.columns
            .iter()
            .filter_map(|name| Some((name.as_str(), self.role(name)?)))
    }

    /// Type of every column, in table order.
    pub fn types(&self) -> impl Iterator<Item = (&str, ColumnType)> + '_ {
        self.columns
            .iter()
            .filter_map(|name| Some((name.as_str(), self.column_type(name)?)))
    }

    pub fn set_role(&mut self, name: &str, role: Role) -> Result<()> {
        let entry = self
            .roles
            .get_mut(name)
            .ok_or_else(|| DatasetError::ColumnNotFound {
                column: name.to_string(),
            })?;
        *entry = role;
        Ok(())
    }

    pub fn set_type(&mut self, name: &str, column_type: ColumnType) -> Result<()> {
        let entry = self
            .types
            .get_mut(name)
            .ok_or_else(|| DatasetError::ColumnNotFound {
                column: name.to_string(),
            })?;
        *entry = column_type;
        Ok(())
    }

    /// Replace a column's values, or append a new column.
    ///
    /// A replaced column keeps its role and type. A new column is an Input
    /// typed by its storage.
    pub fn set_column(&mut self, column: Column) -> Result<()> {
        let name = column.name().to_string();
        let is_new = !self.roles.contains_key(&name);
        let column_type = StorageKind::from_dtype(column.dtype()).default_type();
        self.frame.with_column(column)?;
        if is_new {
            self.columns.push(name.clone());
            self.roles.insert(name.clone(), Role::Input);
            self.types.insert(name, column_type);
        }
        Ok(())
    }

    /// First `n` rows of the table.
    pub fn head(&self, n: usize) -> DataFrame {
        self.frame.head(Some(n))
    }

    /// Last `n` rows of the table.
    pub fn tail(&self, n: usize) -> DataFrame {
        self.frame.tail(Some(n))
    }

    /// Convert Numeric-typed text columns to `f64`.
    ///
    /// Unparseable values become missing. Returns the number of columns converted.
    pub fn update(&mut self) -> Result<usize> {
        let mut converted = 0;
        for name in self.columns.clone() {
            if self.column_type(&name) != Some(ColumnType::Numeric) {
                continue;
            }
            let column = self.column(&name)?;
            if StorageKind::from_dtype(column.dtype()) != StorageKind::Text {
                continue;
            }
            let values = column_f64_values(column)?;
            self.frame
                .with_column(Column::new(name.as_str().into(), values))?;
            tracing::debug!(column = %name, "Converted text column to numbers");
            converted += 1;
        }
        if converted > 0 {
            tracing::info!(converted, "Updated numeric columns");
        }
        Ok(converted)
    }

    /// Strip spaces, dots and dashes from every column name.
    ///
    /// Roles and types follow their columns to the new names.
    pub fn fix_names(&mut self) -> Result<()> {
        let renamed: Vec<String> = self
            .columns
            .iter()
            .map(|name| name.chars().filter(|c| !NAME_SYMBOLS.contains(c)).collect())
            .collect();
        self.frame.set_column_names(renamed.iter().map(String::as_str))?;

        let mut roles = BTreeMap::new();
        let mut types = BTreeMap::new();
        for (old, new) in self.columns.iter().zip(&renamed) {
            if let Some(role) = self.roles.get(old) {
                roles.insert(new.clone(), *role);
            }
            if let Some(column_type) = self.types.get(old) {
                types.insert(new.clone(), *column_type);
            }
        }
        self.roles = roles;
        self.types = types;
        self.columns = renamed;
        Ok(())
    }
}
