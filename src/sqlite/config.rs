use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SqlStatementError};

use super::connection::SqliteConnection;

/// Path understood by `SQLite` as a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Options for opening a `SQLite` database.
///
/// Options can also be read from JSON:
/// ```rust
/// use sqlite_statement::sqlite::SqliteOptions;
///
/// let opts = SqliteOptions::from_json(r#"{ "db_path": "app.db", "wal": true }"#).unwrap();
/// assert!(opts.wal);
/// assert_eq!(opts.busy_timeout_ms, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Switch the journal to WAL after opening.
    #[serde(default)]
    pub wal: bool,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            wal: false,
            busy_timeout_ms: None,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH.to_string())
    }

    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    /// Parse options from a JSON document.
    ///
    /// # Errors
    /// Returns `SqlStatementError::ConfigError` if the document is malformed or invalid.
    pub fn from_json(document: &str) -> Result<Self> {
        let opts: SqliteOptions = serde_json::from_str(document)?;
        opts.validate()?;
        Ok(opts)
    }

    /// # Errors
    /// Returns `SqlStatementError::ConfigError` if the database path is empty.
    pub fn validate(&self) -> Result<()> {
        if self.db_path.trim().is_empty() {
            return Err(SqlStatementError::ConfigError(
                "db_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY_PATH
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal(mut self, wal: bool) -> Self {
        self.opts.wal = wal;
        self
    }

    #[must_use]
    pub fn busy_timeout_ms(mut self, millis: u64) -> Self {
        self.opts.busy_timeout_ms = Some(millis);
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open a connection with the collected options.
    ///
    /// # Errors
    /// Returns `SqlStatementError` if the options are invalid or the database cannot be opened.
    pub fn open(self) -> Result<SqliteConnection> {
        SqliteConnection::open(self.finish())
    }
}
