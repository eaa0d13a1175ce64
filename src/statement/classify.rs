use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Whether SQL text is expected to produce rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Produces a row set: `SELECT`, `PRAGMA`, `EXPLAIN QUERY PLAN`.
    Query,
    /// Everything else: DML, DDL, transaction control.
    Update,
}

// Case-insensitive, `.` spans lines, anchored after leading whitespace.
static QUERY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\A\s*(SELECT|PRAGMA|EXPLAIN QUERY PLAN)").expect("query prefix pattern")
});

/// Classify SQL text by its leading keyword.
#[must_use]
pub fn classify(sql: &str) -> StatementKind {
    if QUERY_PREFIX.is_match(sql) {
        StatementKind::Query
    } else {
        StatementKind::Update
    }
}

/// Append ` LIMIT <n>` when a row limit is set; the SQL is otherwise untouched.
#[must_use]
pub fn apply_row_limit(sql: &str, row_limit: Option<u32>) -> Cow<'_, str> {
    match row_limit {
        Some(limit) => Cow::Owned(format!("{sql} LIMIT {limit}")),
        None => Cow::Borrowed(sql),
    }
}
