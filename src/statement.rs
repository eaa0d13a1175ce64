//! The statement contract and its `SQLite` implementation.

mod adapter;
pub mod capability;
pub mod classify;
mod contract;

pub use adapter::SqliteStatement;
pub use capability::StatementCapability;
pub use classify::{StatementKind, apply_row_limit, classify};
pub use contract::SqlStatement;
