// SQLite backend for the statement contract
//
// - config: options for opening a database
// - native: the narrow native interface (execute, raw query, change counters)
// - query: value conversion and row materialization
// - connection: the owning connection that hands out statements

pub mod config;
pub mod connection;
pub mod native;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use native::{NativeDatabase, SqliteDatabase};
pub use query::build_row_set;
