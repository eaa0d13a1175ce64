use crate::cursor::ResultCursor;
use crate::error::{Result, SqlStatementError, UnsupportedOperation};
use crate::types::{
    AutoGeneratedKeys, CurrentResult, FetchDirection, ResultSetConcurrency, ResultSetHoldability,
    ResultSetType,
};

use super::capability::StatementCapability;

fn unsupported<T>(op: UnsupportedOperation) -> Result<T> {
    Err(SqlStatementError::NotSupported(op))
}

/// The standard statement contract.
///
/// Every operation of the contract is listed here. Operations a driver does
/// not provide keep their default body, which fails with
/// [`SqlStatementError::NotSupported`]; see [`UnsupportedOperation::ALL`].
///
/// Once a statement is closed every operation fails except
/// [`close`](Self::close) and [`is_closed`](Self::is_closed).
pub trait SqlStatement {
    /// Connection type that created the statement.
    type Connection;

    /// Execute any SQL. Returns `true` when a non-empty result set is available
    /// through [`result_set`](Self::result_set), `false` for updates and for
    /// queries that produced no rows.
    ///
    /// # Errors
    /// Fails if the statement is closed or the engine rejects the SQL.
    fn execute(&mut self, sql: &str) -> Result<bool>;

    /// # Errors
    /// Always fails with `NotSupported`.
    fn execute_with_keys(&mut self, _sql: &str, _keys: AutoGeneratedKeys) -> Result<bool> {
        unsupported(UnsupportedOperation::ExecuteWithGeneratedKeys)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn execute_with_column_indexes(&mut self, _sql: &str, _columns: &[usize]) -> Result<bool> {
        unsupported(UnsupportedOperation::ExecuteWithColumnIndexes)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn execute_with_column_names(&mut self, _sql: &str, _columns: &[&str]) -> Result<bool> {
        unsupported(UnsupportedOperation::ExecuteWithColumnNames)
    }

    /// Run a query and return its cursor, which stays owned by the statement.
    ///
    /// # Errors
    /// Fails if the statement is closed or the engine rejects the SQL.
    fn execute_query(&mut self, sql: &str) -> Result<&mut ResultCursor>;

    /// Run an update and return the number of rows it changed.
    ///
    /// # Errors
    /// Fails if the statement is closed or the engine rejects the SQL.
    fn execute_update(&mut self, sql: &str) -> Result<i64>;

    /// # Errors
    /// Fails if the statement is closed or the engine rejects the SQL.
    fn execute_update_with_keys(&mut self, sql: &str, keys: AutoGeneratedKeys) -> Result<i64>;

    /// # Errors
    /// Always fails with `NotSupported`.
    fn execute_update_with_column_indexes(&mut self, _sql: &str, _columns: &[usize]) -> Result<i64> {
        unsupported(UnsupportedOperation::ExecuteUpdateWithColumnIndexes)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn execute_update_with_column_names(&mut self, _sql: &str, _columns: &[&str]) -> Result<i64> {
        unsupported(UnsupportedOperation::ExecuteUpdateWithColumnNames)
    }

    /// # Errors
    /// Fails if the statement is closed.
    fn add_batch(&mut self, sql: &str) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed.
    fn clear_batch(&mut self) -> Result<()>;

    /// Execute the accumulated batch.
    ///
    /// # Errors
    /// Fails if the statement is closed; a rejected batch fails with
    /// `BatchUpdate` carrying the failure marker.
    fn execute_batch(&mut self) -> Result<Vec<i64>>;

    /// Read-once update count of the last execution, `-1` when none is pending.
    ///
    /// # Errors
    /// Fails if the statement is closed.
    fn update_count(&mut self) -> Result<i64>;

    /// Same as `more_results_with(CurrentResult::Close)`.
    ///
    /// # Errors
    /// Fails if the statement is closed.
    fn more_results(&mut self) -> Result<bool> {
        self.more_results_with(CurrentResult::Close)
    }

    /// # Errors
    /// Fails if the statement is closed.
    fn more_results_with(&mut self, current: CurrentResult) -> Result<bool>;

    /// # Errors
    /// Fails if the statement is closed.
    fn result_set(&mut self) -> Result<Option<&mut ResultCursor>>;

    /// # Errors
    /// Fails if the statement or its connection is closed.
    fn generated_keys(&self) -> Result<ResultCursor>;

    /// # Errors
    /// Fails if the statement is closed.
    fn connection(&self) -> Result<&Self::Connection>;

    /// Release the open result and detach from the connection. Idempotent.
    ///
    /// # Errors
    /// Implementations may fail while releasing resources.
    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;

    /// # Errors
    /// Fails if the statement is closed or `max` is negative.
    fn set_max_rows(&mut self, max: i64) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed.
    fn max_rows(&self) -> Result<u32>;

    /// # Errors
    /// Fails if the statement is closed.
    fn set_poolable(&mut self, poolable: bool) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed.
    fn is_poolable(&self) -> Result<bool>;

    /// # Errors
    /// Fails if the statement is closed or no result is open.
    fn fetch_direction(&self) -> Result<FetchDirection>;

    /// # Errors
    /// Fails if the statement is closed or no result is open.
    fn set_fetch_direction(&mut self, direction: FetchDirection) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed or no result is open.
    fn fetch_size(&self) -> Result<u32>;

    /// # Errors
    /// Fails if the statement is closed or no result is open.
    fn set_fetch_size(&mut self, rows: u32) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed.
    fn is_wrapper_for(&self, capability: StatementCapability) -> Result<bool>;

    /// View the statement as the requested capability.
    ///
    /// # Errors
    /// Fails with `CapabilityMismatch` if the capability is not satisfied.
    fn unwrap_as(&self, capability: StatementCapability) -> Result<&Self>
    where
        Self: Sized;

    /// Accepts `true`; disabling escape processing is not supported.
    ///
    /// # Errors
    /// Fails if the statement is closed or `enable` is false.
    fn set_escape_processing(&mut self, enable: bool) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed.
    fn set_cursor_name(&mut self, name: &str) -> Result<()>;

    /// # Errors
    /// Fails if the statement is closed.
    fn max_field_size(&self) -> Result<u32>;

    /// # Errors
    /// Always fails with `NotSupported`.
    fn set_max_field_size(&mut self, _max: u32) -> Result<()> {
        unsupported(UnsupportedOperation::SetMaxFieldSize)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn cancel(&mut self) -> Result<()> {
        unsupported(UnsupportedOperation::Cancel)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn query_timeout(&self) -> Result<u32> {
        unsupported(UnsupportedOperation::GetQueryTimeout)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn set_query_timeout(&mut self, _seconds: u32) -> Result<()> {
        unsupported(UnsupportedOperation::SetQueryTimeout)
    }

    /// # Errors
    /// Always fails with `NotSupported`.
    fn close_on_completion(&mut self) -> Result<()> {
        unsupported(UnsupportedOperation::CloseOnCompletion)
    }

    /// # Errors
    /// Fails if the statement is closed.
    fn is_close_on_completion(&self) -> Result<bool>;

    /// # Errors
    /// Fails if the statement is closed.
    fn result_set_type(&self) -> Result<ResultSetType>;

    /// # Errors
    /// Fails if the statement is closed.
    fn result_set_concurrency(&self) -> Result<ResultSetConcurrency>;

    /// # Errors
    /// Fails if the statement is closed.
    fn result_set_holdability(&self) -> Result<ResultSetHoldability>;

    /// No warning chain is kept.
    ///
    /// # Errors
    /// Fails if the statement is closed.
    fn warnings(&self) -> Result<Option<String>>;

    /// # Errors
    /// Fails if the statement is closed.
    fn clear_warnings(&mut self) -> Result<()>;
}
