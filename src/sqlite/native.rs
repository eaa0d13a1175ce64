use std::fmt;
use std::sync::{Mutex, MutexGuard};

use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::{Batch, Connection};

use crate::error::{Result, SqlStatementError};
use crate::results::RowSet;
use crate::types::RowValues;

use super::config::SqliteOptions;
use super::query::{build_row_set, convert_args};

/// The narrow interface a statement needs from the embedded engine.
///
/// Implementations serialize access per connection. `execute_statement`
/// reports the rows it changed from inside the same critical section as the
/// execution, so another statement on the same connection cannot slip in
/// between the write and the count. Only rows changed directly by the SQL
/// are counted; trigger and foreign-key cascade writes are not.
pub trait NativeDatabase: Send + Sync {
    /// Execute SQL that produces no rows; returns the number of rows it changed.
    ///
    /// # Errors
    /// Returns `SqlStatementError::SqliteError` if the engine rejects the SQL.
    fn execute_statement(&self, sql: &str) -> Result<i64>;

    /// Execute several statements as one unit; returns the combined change count.
    ///
    /// # Errors
    /// Returns `SqlStatementError::SqliteError` if the engine rejects any statement.
    fn execute_batch(&self, sql: &str) -> Result<i64> {
        self.execute_statement(sql)
    }

    /// Run a query and hand back its rows.
    ///
    /// # Errors
    /// Returns `SqlStatementError::SqliteError` if the engine rejects the SQL.
    fn raw_query(&self, sql: &str, args: &[RowValues]) -> Result<RowSet>;

    /// Rows changed by the connection's most recent INSERT, UPDATE or DELETE.
    ///
    /// # Errors
    /// Returns `SqlStatementError` if the counter cannot be read.
    fn changed_rows_count(&self) -> Result<i64>;

    /// Rowid of the connection's most recent successful INSERT.
    ///
    /// # Errors
    /// Returns `SqlStatementError` if the rowid cannot be read.
    fn last_insert_rowid(&self) -> Result<i64>;
}

/// rusqlite-backed native database.
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Open the database described by `opts` and apply its pragmas.
    ///
    /// # Errors
    /// Returns `SqlStatementError` if the options are invalid or `SQLite` cannot open the file.
    pub fn open(opts: &SqliteOptions) -> Result<Self> {
        opts.validate()?;
        let conn = if opts.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&opts.db_path)
        }
        .map_err(|e| {
            SqlStatementError::ConnectionError(format!(
                "Failed to open SQLite database {}: {e}",
                opts.db_path
            ))
        })?;

        if let Some(timeout) = opts.busy_timeout() {
            conn.busy_timeout(timeout)?;
        }
        if opts.wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        tracing::debug!(db_path = %opts.db_path, wal = opts.wal, "opened sqlite database");
        Ok(Self::from_connection(conn))
    }

    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock leaves the connection itself usable.
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Step every statement in `sql` and sum the rows each one changed itself.
///
/// `changes()` keeps the value of the last DML statement, so it is only read
/// when `total_changes()` moved; DDL and no-op statements add 0.
fn execute_counting(conn: &Connection, sql: &str) -> Result<i64> {
    let mut batch = Batch::new(conn, sql);
    let mut changed: u64 = 0;
    while let Some(mut stmt) = batch.next()? {
        let before = conn.total_changes();
        // Row-producing statements are stepped once, as `Connection::execute_batch` does.
        stmt.raw_query().next()?;
        if conn.total_changes() != before {
            changed += conn.changes();
        }
    }
    i64::try_from(changed).map_err(|e| {
        SqlStatementError::ConnectionError(format!("sqlite change counter out of range: {e}"))
    })
}

impl NativeDatabase for SqliteDatabase {
    fn execute_statement(&self, sql: &str) -> Result<i64> {
        execute_counting(&self.lock(), sql)
    }

    fn execute_batch(&self, sql: &str) -> Result<i64> {
        let mut guard = self.lock();
        if !guard.is_autocommit() {
            // Caller owns the transaction; a failure is theirs to roll back.
            return execute_counting(&guard, sql);
        }
        let tx = guard.transaction()?;
        let changed = execute_counting(&tx, sql)?;
        tx.commit()?;
        Ok(changed)
    }

    fn raw_query(&self, sql: &str, args: &[RowValues]) -> Result<RowSet> {
        let values = convert_args(args);
        let guard = self.lock();
        let mut stmt = guard.prepare(sql)?;
        build_row_set(&mut stmt, &values)
    }

    fn changed_rows_count(&self) -> Result<i64> {
        let changes = self.lock().changes();
        i64::try_from(changes).map_err(|e| {
            SqlStatementError::ConnectionError(format!("sqlite change counter out of range: {e}"))
        })
    }

    fn last_insert_rowid(&self) -> Result<i64> {
        Ok(self.lock().last_insert_rowid())
    }
}

impl fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDatabase").finish_non_exhaustive()
    }
}
