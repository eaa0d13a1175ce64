use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// A single row produced by a query.
///
/// Column names and the name-to-index map are shared by every row of the
/// same [`RowSet`](super::RowSet).
#[derive(Debug, Clone)]
pub struct ResultRow {
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    values: Vec<RowValues>,
}

impl ResultRow {
    pub(crate) fn new(
        column_names: Arc<Vec<String>>,
        column_index: Arc<HashMap<String, usize>>,
        values: Vec<RowValues>,
    ) -> Self {
        Self {
            column_names,
            column_index,
            values,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index.get(column_name).copied()
    }

    /// Get a value by column name, or `None` if no such column exists.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by zero-based column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}
