use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cursor::ResultCursor;
use crate::error::{Result, SqlStatementError};
use crate::results::RowSet;
use crate::statement::SqliteStatement;
use crate::types::RowValues;

use super::config::SqliteOptions;
use super::native::{NativeDatabase, SqliteDatabase};

/// Column name of the generated-keys cursor.
pub const GENERATED_ROWID_COLUMN: &str = "last_insert_rowid()";

struct ConnectionInner {
    native: Arc<dyn NativeDatabase>,
    closed: AtomicBool,
}

/// Owning connection for statements.
///
/// Cloning is cheap and every clone refers to the same native database;
/// statements keep a clone as their back-reference.
#[derive(Clone)]
pub struct SqliteConnection {
    inner: Arc<ConnectionInner>,
}

impl SqliteConnection {
    /// Open a connection with the given options.
    ///
    /// # Errors
    /// Returns `SqlStatementError` if the options are invalid or the database cannot be opened.
    pub fn open(opts: SqliteOptions) -> Result<Self> {
        let native = SqliteDatabase::open(&opts)?;
        Ok(Self::with_native(Arc::new(native)))
    }

    /// # Errors
    /// Returns `SqlStatementError::ConnectionError` if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(SqliteOptions::in_memory())
    }

    /// Wrap an already opened native database.
    #[must_use]
    pub fn with_native(native: Arc<dyn NativeDatabase>) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                native,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Create a statement bound to this connection.
    ///
    /// # Errors
    /// Returns `StateError` if the connection is closed.
    pub fn create_statement(&self) -> Result<SqliteStatement> {
        self.ensure_open()?;
        Ok(SqliteStatement::new(self.clone()))
    }

    pub(crate) fn native(&self) -> Arc<dyn NativeDatabase> {
        Arc::clone(&self.inner.native)
    }

    /// Rows changed by the most recent update on this connection, by any statement.
    ///
    /// # Errors
    /// Returns `StateError` if the connection is closed.
    pub fn changed_rows_count(&self) -> Result<i64> {
        self.ensure_open()?;
        self.inner.native.changed_rows_count()
    }

    /// One-row cursor holding the rowid of the last insert on this connection.
    ///
    /// # Errors
    /// Returns `StateError` if the connection is closed.
    pub fn generated_row_id_result_set(&self) -> Result<ResultCursor> {
        self.ensure_open()?;
        let rowid = self.inner.native.last_insert_rowid()?;
        let mut rows = RowSet::new(vec![GENERATED_ROWID_COLUMN.to_string()]);
        rows.push_values(vec![RowValues::Int(rowid)]);
        Ok(ResultCursor::new(rows))
    }

    /// Mark the connection closed. Statements created from it stop working.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("sqlite connection closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// True when both handles refer to the same underlying connection.
    #[must_use]
    pub fn same_connection(&self, other: &SqliteConnection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(SqlStatementError::state("Connection is closed"))
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
