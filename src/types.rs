use chrono::NaiveDateTime;

/// Returned by update-count readers when no fresh update result is pending.
pub const NO_UPDATE_COUNT: i64 = -1;

/// Marker stored in a batch's update counts when the native engine rejected the batch.
pub const EXECUTE_FAILED: i64 = -3;

/// Values that can be stored in a result row or bound as query arguments.
///
/// `SQLite` only stores integers, reals, text, blobs and NULL; `Bool` and
/// `Timestamp` are bound as integer and text respectively:
/// ```rust
/// use sqlite_statement::prelude::*;
///
/// let args = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = args;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans come back from `SQLite` as 0/1 integers.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(0) => Some(false),
            RowValues::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps are stored as text; accepts `YYYY-MM-DD HH:MM:SS` with optional fraction.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValues::Timestamp(value) => Some(*value),
            RowValues::Text(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// Direction hint for walking a result cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchDirection {
    #[default]
    Forward,
    Reverse,
}

/// What `more_results_with` does with the currently open result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentResult {
    #[default]
    Close,
    Keep,
    CloseAll,
}

/// Whether generated keys should be made available after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoGeneratedKeys {
    Return,
    NoReturn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSetType {
    ForwardOnly,
    ScrollInsensitive,
    ScrollSensitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSetConcurrency {
    ReadOnly,
    Updatable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSetHoldability {
    HoldCursorsOverCommit,
    CloseCursorsAtCommit,
}
