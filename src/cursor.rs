//! Result cursor handed out by a statement after a query.

use crate::error::{Result, SqlStatementError};
use crate::results::{ResultRow, RowSet};
use crate::types::FetchDirection;

/// Forward-only cursor over a query's rows.
///
/// A cursor is created by the statement that ran the query and stays owned by
/// it; closing releases the rows. Every accessor except [`close`](Self::close)
/// and [`is_closed`](Self::is_closed) fails once the cursor is closed.
#[derive(Debug)]
pub struct ResultCursor {
    rows: Option<RowSet>,
    /// Index of the current row; `None` before the first `advance()`.
    position: Option<usize>,
    fetch_direction: FetchDirection,
    fetch_size: u32,
}

impl ResultCursor {
    #[must_use]
    pub fn new(rows: RowSet) -> Self {
        Self {
            rows: Some(rows),
            position: None,
            fetch_direction: FetchDirection::Forward,
            fetch_size: 0,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.rows.is_none()
    }

    /// Release the rows. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.rows = None;
        self.position = None;
    }

    fn open_rows(&self) -> Result<&RowSet> {
        self.rows
            .as_ref()
            .ok_or_else(|| SqlStatementError::state("Result set is closed"))
    }

    /// Number of rows the query produced.
    ///
    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn row_count(&self) -> Result<usize> {
        Ok(self.open_rows()?.len())
    }

    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.open_rows()?.is_empty())
    }

    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn column_names(&self) -> Result<&[String]> {
        Ok(self.open_rows()?.column_names())
    }

    /// All rows, independent of the cursor position.
    ///
    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn rows(&self) -> Result<&[ResultRow]> {
        Ok(self.open_rows()?.rows())
    }

    /// Advance to the next row. Returns `false` once the rows are exhausted.
    ///
    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn advance(&mut self) -> Result<bool> {
        let len = self.open_rows()?.len();
        let next = self.position.map_or(0, |p| p + 1);
        if next < len {
            self.position = Some(next);
            Ok(true)
        } else {
            self.position = Some(len);
            Ok(false)
        }
    }

    /// The row the cursor is positioned on, if any.
    ///
    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn current(&self) -> Result<Option<&ResultRow>> {
        let rows = self.open_rows()?;
        Ok(self.position.and_then(|p| rows.rows().get(p)))
    }

    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn fetch_direction(&self) -> Result<FetchDirection> {
        self.open_rows()?;
        Ok(self.fetch_direction)
    }

    /// Only [`FetchDirection::Forward`] is accepted; the cursor is forward-only.
    ///
    /// # Errors
    /// Returns `StateError` if the cursor is closed or the direction is not forward.
    pub fn set_fetch_direction(&mut self, direction: FetchDirection) -> Result<()> {
        self.open_rows()?;
        if direction != FetchDirection::Forward {
            return Err(SqlStatementError::state(format!(
                "Result set is forward-only; cannot fetch {direction:?}"
            )));
        }
        self.fetch_direction = direction;
        Ok(())
    }

    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn fetch_size(&self) -> Result<u32> {
        self.open_rows()?;
        Ok(self.fetch_size)
    }

    /// Rows are materialized up front, so the size is kept as a hint only.
    ///
    /// # Errors
    /// Returns `StateError` if the cursor is closed.
    pub fn set_fetch_size(&mut self, rows: u32) -> Result<()> {
        self.open_rows()?;
        self.fetch_size = rows;
        Ok(())
    }
}
