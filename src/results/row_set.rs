use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

use super::row::ResultRow;

/// Rows produced by one native query, fully materialized.
///
/// This is the cursor handle the native layer hands back from a raw query;
/// the statement wraps it in a [`ResultCursor`](crate::cursor::ResultCursor).
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    rows: Vec<ResultRow>,
}

impl RowSet {
    /// Create an empty row set for the given columns.
    #[must_use]
    pub fn new(column_names: Vec<String>) -> Self {
        let column_index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        Self {
            column_names: Arc::new(column_names),
            column_index: Arc::new(column_index),
            rows: Vec::new(),
        }
    }

    /// Append a row; values are positional and must follow the column order.
    pub fn push_values(&mut self, values: Vec<RowValues>) {
        self.rows.push(ResultRow::new(
            Arc::clone(&self.column_names),
            Arc::clone(&self.column_index),
            values,
        ));
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
