use std::fmt;
use std::sync::Arc;

use crate::cursor::ResultCursor;
use crate::error::{Result, SqlStatementError, UnsupportedOperation};
use crate::sqlite::{NativeDatabase, SqliteConnection};
use crate::types::{
    AutoGeneratedKeys, CurrentResult, EXECUTE_FAILED, FetchDirection, NO_UPDATE_COUNT,
    ResultSetConcurrency, ResultSetHoldability, ResultSetType,
};

use super::capability::StatementCapability;
use super::classify::{StatementKind, apply_row_limit, classify};
use super::contract::SqlStatement;

/// Statement over a `SQLite` connection.
///
/// Holds at most one open result at a time: every execution closes the
/// previous result before dispatching. The update count follows the
/// read-once protocol of the statement contract, so that after a single
/// result is consumed `more_results() == false && update_count() == -1`.
///
/// The change count reported after an update is the connection's, so
/// statements sharing a connection must not execute concurrently.
///
/// ```rust
/// use sqlite_statement::prelude::*;
///
/// # fn main() -> Result<(), SqlStatementError> {
/// let conn = SqliteConnection::open_in_memory()?;
/// let mut stmt = conn.create_statement()?;
/// stmt.execute("CREATE TABLE t (id INTEGER)")?;
/// assert!(!stmt.execute("INSERT INTO t VALUES (1), (2)")?);
/// assert_eq!(stmt.update_count()?, 2);
/// assert_eq!(stmt.update_count()?, -1);
/// assert!(stmt.execute("SELECT id FROM t")?);
/// # Ok(())
/// # }
/// ```
pub struct SqliteStatement {
    native: Option<Arc<dyn NativeDatabase>>,
    connection: Option<SqliteConnection>,
    open_result: Option<ResultCursor>,
    row_limit: Option<u32>,
    batch: String,
    update_count: i64,
    poolable: bool,
}

impl SqliteStatement {
    pub(crate) fn new(connection: SqliteConnection) -> Self {
        Self {
            native: Some(connection.native()),
            connection: Some(connection),
            open_result: None,
            row_limit: None,
            batch: String::new(),
            update_count: NO_UPDATE_COUNT,
            poolable: false,
        }
    }

    /// Close the open result, if any, and forget it. Safe on a closed statement.
    pub fn close_result_set(&mut self) {
        if let Some(mut cursor) = self.open_result.take() {
            if !cursor.is_closed() {
                cursor.close();
            }
        }
    }

    /// SQL accumulated by [`add_batch`](SqlStatement::add_batch) and not yet executed.
    #[must_use]
    pub fn pending_batch(&self) -> &str {
        &self.batch
    }

    fn ensure_open(&self) -> Result<&SqliteConnection> {
        let conn = self
            .connection
            .as_ref()
            .ok_or_else(|| SqlStatementError::state("Statement is closed"))?;
        conn.ensure_open()?;
        Ok(conn)
    }

    fn native_handle(&self) -> Result<Arc<dyn NativeDatabase>> {
        self.ensure_open()?;
        self.native
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| SqlStatementError::state("Statement is closed"))
    }

    fn open_result(&self) -> Result<&ResultCursor> {
        self.ensure_open()?;
        self.open_result
            .as_ref()
            .ok_or_else(|| SqlStatementError::state("No open result set"))
    }

    fn open_result_mut(&mut self) -> Result<&mut ResultCursor> {
        self.ensure_open()?;
        self.open_result
            .as_mut()
            .ok_or_else(|| SqlStatementError::state("No open result set"))
    }

    fn run_query(&mut self, native: &dyn NativeDatabase, sql: &str) -> Result<&mut ResultCursor> {
        let limited = apply_row_limit(sql, self.row_limit);
        tracing::debug!(sql = %limited, row_limit = ?self.row_limit, "executing query");
        let rows = native.raw_query(&limited, &[])?;
        Ok(self.open_result.insert(ResultCursor::new(rows)))
    }
}

impl SqlStatement for SqliteStatement {
    type Connection = SqliteConnection;

    fn execute(&mut self, sql: &str) -> Result<bool> {
        let native = self.native_handle()?;
        self.update_count = NO_UPDATE_COUNT;
        self.close_result_set();

        match classify(sql) {
            StatementKind::Query => {
                let cursor = self.run_query(native.as_ref(), sql)?;
                // An empty result stays reachable through result_set() but is not reported.
                Ok(!cursor.is_empty()?)
            }
            StatementKind::Update => {
                tracing::debug!(sql, "executing update");
                let changed = native.execute_statement(sql)?;
                self.update_count = changed;
                Ok(false)
            }
        }
    }

    fn execute_query(&mut self, sql: &str) -> Result<&mut ResultCursor> {
        let native = self.native_handle()?;
        self.update_count = NO_UPDATE_COUNT;
        self.close_result_set();
        self.run_query(native.as_ref(), sql)
    }

    fn execute_update(&mut self, sql: &str) -> Result<i64> {
        let native = self.native_handle()?;
        self.update_count = NO_UPDATE_COUNT;
        self.close_result_set();
        tracing::debug!(sql, "executing update");
        // The count is handed back directly, so nothing is left pending.
        native.execute_statement(sql)
    }

    fn execute_update_with_keys(&mut self, sql: &str, _keys: AutoGeneratedKeys) -> Result<i64> {
        self.execute_update(sql)
    }

    fn add_batch(&mut self, sql: &str) -> Result<()> {
        self.ensure_open()?;
        let tail = self.batch.trim_end();
        if !tail.is_empty() && !tail.ends_with(';') {
            self.batch.push(';');
        }
        if !self.batch.is_empty() {
            self.batch.push('\n');
        }
        self.batch.push_str(sql);
        Ok(())
    }

    fn clear_batch(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.batch.clear();
        Ok(())
    }

    fn execute_batch(&mut self) -> Result<Vec<i64>> {
        let native = self.native_handle()?;
        self.update_count = NO_UPDATE_COUNT;
        self.close_result_set();

        // An empty buffer still goes to the engine and reports a count of 0.
        let sql = std::mem::take(&mut self.batch);
        tracing::debug!(sql = %sql, "executing batch");
        match native.execute_batch(&sql) {
            Ok(changed) => {
                self.update_count = changed;
                Ok(vec![changed])
            }
            Err(source) => Err(SqlStatementError::BatchUpdate {
                update_counts: vec![EXECUTE_FAILED],
                source: Box::new(source),
            }),
        }
    }

    fn update_count(&mut self) -> Result<i64> {
        self.ensure_open()?;
        Ok(std::mem::replace(&mut self.update_count, NO_UPDATE_COUNT))
    }

    fn more_results_with(&mut self, current: CurrentResult) -> Result<bool> {
        self.ensure_open()?;
        match current {
            CurrentResult::Close | CurrentResult::CloseAll => self.close_result_set(),
            CurrentResult::Keep => {}
        }
        Ok(false)
    }

    fn result_set(&mut self) -> Result<Option<&mut ResultCursor>> {
        self.ensure_open()?;
        Ok(self.open_result.as_mut())
    }

    fn generated_keys(&self) -> Result<ResultCursor> {
        self.ensure_open()?.generated_row_id_result_set()
    }

    fn connection(&self) -> Result<&SqliteConnection> {
        self.ensure_open()
    }

    fn close(&mut self) -> Result<()> {
        self.close_result_set();
        if self.connection.take().is_some() {
            tracing::debug!("statement closed");
        }
        self.native = None;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.connection.is_none()
    }

    fn set_max_rows(&mut self, max: i64) -> Result<()> {
        self.ensure_open()?;
        if max < 0 {
            return Err(SqlStatementError::state(format!(
                "Max rows must be zero or positive. Got {max}"
            )));
        }
        self.row_limit = if max == 0 {
            None
        } else {
            Some(u32::try_from(max).map_err(|_| {
                SqlStatementError::state(format!("Max rows must not exceed {}. Got {max}", u32::MAX))
            })?)
        };
        Ok(())
    }

    fn max_rows(&self) -> Result<u32> {
        self.ensure_open()?;
        Ok(self.row_limit.unwrap_or(0))
    }

    fn set_poolable(&mut self, poolable: bool) -> Result<()> {
        self.ensure_open()?;
        self.poolable = poolable;
        Ok(())
    }

    fn is_poolable(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.poolable)
    }

    fn fetch_direction(&self) -> Result<FetchDirection> {
        self.open_result()?.fetch_direction()
    }

    fn set_fetch_direction(&mut self, direction: FetchDirection) -> Result<()> {
        self.open_result_mut()?.set_fetch_direction(direction)
    }

    fn fetch_size(&self) -> Result<u32> {
        self.open_result()?.fetch_size()
    }

    fn set_fetch_size(&mut self, rows: u32) -> Result<()> {
        self.open_result_mut()?.set_fetch_size(rows)
    }

    fn is_wrapper_for(&self, capability: StatementCapability) -> Result<bool> {
        self.ensure_open()?;
        Ok(capability.is_supported())
    }

    fn unwrap_as(&self, capability: StatementCapability) -> Result<&Self> {
        if self.is_wrapper_for(capability)? {
            Ok(self)
        } else {
            Err(SqlStatementError::CapabilityMismatch {
                requested: capability,
            })
        }
    }

    fn set_escape_processing(&mut self, enable: bool) -> Result<()> {
        self.ensure_open()?;
        if enable {
            Ok(())
        } else {
            Err(SqlStatementError::NotSupported(
                UnsupportedOperation::DisableEscapeProcessing,
            ))
        }
    }

    fn set_cursor_name(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        tracing::debug!(name, "cursor names are ignored");
        Ok(())
    }

    fn max_field_size(&self) -> Result<u32> {
        self.ensure_open()?;
        Ok(0)
    }

    fn is_close_on_completion(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(false)
    }

    fn result_set_type(&self) -> Result<ResultSetType> {
        self.ensure_open()?;
        Ok(ResultSetType::ForwardOnly)
    }

    fn result_set_concurrency(&self) -> Result<ResultSetConcurrency> {
        self.ensure_open()?;
        Ok(ResultSetConcurrency::ReadOnly)
    }

    fn result_set_holdability(&self) -> Result<ResultSetHoldability> {
        self.ensure_open()?;
        Ok(ResultSetHoldability::CloseCursorsAtCommit)
    }

    fn warnings(&self) -> Result<Option<String>> {
        self.ensure_open()?;
        tracing::debug!("statement warnings are not tracked");
        Ok(None)
    }

    fn clear_warnings(&mut self) -> Result<()> {
        self.ensure_open()?;
        tracing::debug!("statement warnings are not tracked");
        Ok(())
    }
}

impl Drop for SqliteStatement {
    fn drop(&mut self) {
        if !self.is_closed() {
            tracing::trace!("statement dropped without close");
        }
        self.close_result_set();
    }
}

impl fmt::Debug for SqliteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStatement")
            .field("closed", &self.is_closed())
            .field("has_open_result", &self.open_result.is_some())
            .field("row_limit", &self.row_limit)
            .field("batch", &self.batch)
            .field("update_count", &self.update_count)
            .field("poolable", &self.poolable)
            .finish()
    }
}
