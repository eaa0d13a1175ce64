//! Standard statement contract over an embedded `SQLite` engine.
//!
//! A [`SqliteConnection`](sqlite::SqliteConnection) hands out
//! [`SqliteStatement`](statement::SqliteStatement)s. A statement classifies
//! SQL text as query-shaped or update-shaped, dispatches it to the native
//! engine, keeps at most one open [`ResultCursor`](cursor::ResultCursor), and
//! answers the update-count / more-results protocol of the contract.

pub mod cursor;
pub mod error;
pub mod prelude;
pub mod results;
pub mod sqlite;
pub mod statement;
pub mod types;

pub use error::{SqlStatementError, UnsupportedOperation};
