//! Configuration options for column classification.

use serde::{Deserialize, Serialize};

/// Missing-value ratio above which a column is rejected.
pub const DEFAULT_MAX_MISSING_RATIO: f64 = 0.5;

/// Options controlling role inference when a table is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// Column names (case-insensitive) that receive the Identifier role.
    pub id_names: Vec<String>,

    /// Column names (case-insensitive) that receive the Target role.
    /// Only the first matching column becomes the target; later matches are
    /// rejected.
    pub target_names: Vec<String>,

    /// Columns whose missing ratio is strictly greater than this are rejected,
    /// regardless of any name match.
    pub max_missing_ratio: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            id_names: vec!["id".to_string()],
            target_names: vec!["target".to_string()],
            max_missing_ratio: DEFAULT_MAX_MISSING_RATIO,
        }
    }
}

impl ClassifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_missing_ratio(mut self, ratio: f64) -> Self {
        self.max_missing_ratio = ratio;
        self
    }

    /// Returns true if `name` matches one of the identifier names.
    pub fn is_id_name(&self, name: &str) -> bool {
        matches_any(&self.id_names, name)
    }

    /// Returns true if `name` matches one of the target names.
    pub fn is_target_name(&self, name: &str) -> bool {
        matches_any(&self.target_names, name)
    }
}

/// Compares Unicode lowercase forms, so `"ÄRGER"` matches `"ärger"`.
fn matches_any(names: &[String], name: &str) -> bool {
    let name = name.to_lowercase();
    names.iter().any(|n| n.to_lowercase() == name)
}
