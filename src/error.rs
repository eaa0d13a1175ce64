use std::fmt;

use thiserror::Error;

use crate::statement::capability::StatementCapability;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SqlStatementError>;

/// Operations of the statement contract that this driver deliberately does not provide.
///
/// The list is closed: every unsupported call surfaces as
/// [`SqlStatementError::NotSupported`] carrying one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedOperation {
    Cancel,
    GetQueryTimeout,
    SetQueryTimeout,
    DisableEscapeProcessing,
    ExecuteWithGeneratedKeys,
    ExecuteWithColumnIndexes,
    ExecuteWithColumnNames,
    ExecuteUpdateWithColumnIndexes,
    ExecuteUpdateWithColumnNames,
    CloseOnCompletion,
    SetMaxFieldSize,
}

impl UnsupportedOperation {
    /// Every unsupported operation, in contract order.
    pub const ALL: [UnsupportedOperation; 11] = [
        UnsupportedOperation::Cancel,
        UnsupportedOperation::GetQueryTimeout,
        UnsupportedOperation::SetQueryTimeout,
        UnsupportedOperation::DisableEscapeProcessing,
        UnsupportedOperation::ExecuteWithGeneratedKeys,
        UnsupportedOperation::ExecuteWithColumnIndexes,
        UnsupportedOperation::ExecuteWithColumnNames,
        UnsupportedOperation::ExecuteUpdateWithColumnIndexes,
        UnsupportedOperation::ExecuteUpdateWithColumnNames,
        UnsupportedOperation::CloseOnCompletion,
        UnsupportedOperation::SetMaxFieldSize,
    ];

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            UnsupportedOperation::Cancel => "cancel",
            UnsupportedOperation::GetQueryTimeout => "query timeout (get)",
            UnsupportedOperation::SetQueryTimeout => "query timeout (set)",
            UnsupportedOperation::DisableEscapeProcessing => "disabling escape processing",
            UnsupportedOperation::ExecuteWithGeneratedKeys => {
                "execute with auto-generated keys; use execute_update or execute_query"
            }
            UnsupportedOperation::ExecuteWithColumnIndexes => {
                "execute with column indexes; use execute_update or execute_query"
            }
            UnsupportedOperation::ExecuteWithColumnNames => {
                "execute with column names; use execute_update or execute_query"
            }
            UnsupportedOperation::ExecuteUpdateWithColumnIndexes => {
                "execute_update with column indexes; use execute_update"
            }
            UnsupportedOperation::ExecuteUpdateWithColumnNames => {
                "execute_update with column names; use execute_update"
            }
            UnsupportedOperation::CloseOnCompletion => "close on completion",
            UnsupportedOperation::SetMaxFieldSize => "max field size (set)",
        }
    }
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Error)]
pub enum SqlStatementError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Not supported: {0}")]
    NotSupported(UnsupportedOperation),

    #[error("Invalid statement state: {0}")]
    StateError(String),

    #[error("SqliteStatement does not wrap {requested}")]
    CapabilityMismatch { requested: StatementCapability },

    /// A batch failed inside the native engine; `update_counts` holds the failure marker.
    #[error("Batch execution failed: {source}")]
    BatchUpdate {
        update_counts: Vec<i64>,
        #[source]
        source: Box<SqlStatementError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl SqlStatementError {
    pub(crate) fn state(message: impl Into<String>) -> Self {
        SqlStatementError::StateError(message.into())
    }

    #[must_use]
    pub fn is_not_supported(&self) -> bool {
        matches!(self, SqlStatementError::NotSupported(_))
    }

    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(self, SqlStatementError::StateError(_))
    }

    /// The unsupported operation behind this error, if it is one.
    #[must_use]
    pub fn unsupported_operation(&self) -> Option<UnsupportedOperation> {
        match self {
            SqlStatementError::NotSupported(op) => Some(*op),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SqlStatementError {
    fn from(err: serde_json::Error) -> Self {
        SqlStatementError::ConfigError(format!("invalid options document: {err}"))
    }
}
