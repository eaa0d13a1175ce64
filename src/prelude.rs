//! Convenient imports for common functionality.

pub use crate::cursor::ResultCursor;
pub use crate::error::{SqlStatementError, UnsupportedOperation};
pub use crate::results::{ResultRow, RowSet};
pub use crate::sqlite::{
    NativeDatabase, SqliteConnection, SqliteDatabase, SqliteOptions, SqliteOptionsBuilder,
};
pub use crate::statement::{
    SqlStatement, SqliteStatement, StatementCapability, StatementKind, classify,
};
pub use crate::types::{
    AutoGeneratedKeys, CurrentResult, EXECUTE_FAILED, FetchDirection, NO_UPDATE_COUNT,
    ResultSetConcurrency, ResultSetHoldability, ResultSetType, RowValues,
};
