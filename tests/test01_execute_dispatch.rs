use std::sync::{Arc, Mutex};

use sqlite_statement::prelude::*;

/// Native double that records which entry point each SQL text reached.
#[derive(Default)]
struct RecordingNative {
    calls: Mutex<Vec<(StatementKind, String)>>,
    rows_per_query: usize,
}

impl RecordingNative {
    fn with_rows(rows_per_query: usize) -> Self {
        Self {
            rows_per_query,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(StatementKind, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, kind: StatementKind, sql: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((kind, sql.to_string()));
        }
    }
}

impl NativeDatabase for RecordingNative {
    fn execute_statement(&self, sql: &str) -> Result<i64, SqlStatementError> {
        self.record(StatementKind::Update, sql);
        Ok(7)
    }

    fn raw_query(&self, sql: &str, _args: &[RowValues]) -> Result<RowSet, SqlStatementError> {
        self.record(StatementKind::Query, sql);
        let mut rows = RowSet::new(vec!["n".into()]);
        for i in 0..self.rows_per_query {
            rows.push_values(vec![RowValues::Int(i as i64)]);
        }
        Ok(rows)
    }

    fn changed_rows_count(&self) -> Result<i64, SqlStatementError> {
        Ok(7)
    }

    fn last_insert_rowid(&self) -> Result<i64, SqlStatementError> {
        Ok(0)
    }
}

fn recording_statement(rows: usize) -> Result<(Arc<RecordingNative>, SqliteStatement), SqlStatementError> {
    let native = Arc::new(RecordingNative::with_rows(rows));
    let conn = SqliteConnection::with_native(native.clone());
    let stmt = conn.create_statement()?;
    Ok((native, stmt))
}

#[test]
fn query_shaped_sql_reaches_raw_query() -> Result<(), Box<dyn std::error::Error>> {
    let (native, mut stmt) = recording_statement(1)?;
    let queries = [
        "SELECT * FROM t",
        "  select 1",
        "\n\tPragma table_info(t)",
        "explain query plan\nselect * from t",
    ];
    for sql in queries {
        assert!(stmt.execute(sql)?, "{sql:?}");
    }
    let calls = native.calls();
    assert_eq!(calls.len(), queries.len());
    assert!(calls.iter().all(|(kind, _)| *kind == StatementKind::Query));
    Ok(())
}

#[test]
fn update_shaped_sql_reaches_execute_statement() -> Result<(), Box<dyn std::error::Error>> {
    let (native, mut stmt) = recording_statement(1)?;
    for sql in ["INSERT INTO t VALUES (1)", "create table x (a)", "EXPLAIN SELECT 1", "BEGIN"] {
        assert!(!stmt.execute(sql)?, "{sql:?}");
        assert_eq!(stmt.update_count()?, 7);
    }
    assert!(native.calls().iter().all(|(kind, _)| *kind == StatementKind::Update));
    Ok(())
}

#[test]
fn native_text_is_unmodified_apart_from_limit() -> Result<(), Box<dyn std::error::Error>> {
    let (native, mut stmt) = recording_statement(1)?;
    stmt.execute("  SELECT a FROM t")?;
    stmt.set_max_rows(3)?;
    stmt.execute("SELECT a FROM t")?;
    stmt.execute("DELETE FROM t")?;
    let sent: Vec<String> = native.calls().into_iter().map(|(_, sql)| sql).collect();
    assert_eq!(
        sent,
        ["  SELECT a FROM t", "SELECT a FROM t LIMIT 3", "DELETE FROM t"]
    );
    Ok(())
}

#[test]
fn empty_query_reports_no_result_but_keeps_cursor() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute("CREATE TABLE t (id INTEGER)")?;

    assert!(!stmt.execute("SELECT * FROM t")?);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    let cursor = stmt.result_set()?.ok_or("empty result should still be stored")?;
    assert!(!cursor.is_closed());
    assert_eq!(cursor.row_count()?, 0);
    assert_eq!(cursor.column_names()?, ["id"]);
    Ok(())
}

#[test]
fn non_empty_query_exposes_rows() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute("CREATE TABLE t (id INTEGER, name TEXT)")?;
    stmt.execute("INSERT INTO t VALUES (1, 'a'), (2, 'b')")?;

    assert!(stmt.execute("SELECT id, name FROM t ORDER BY id")?);
    let cursor = stmt.result_set()?.ok_or("expected a result")?;
    assert!(cursor.advance()?);
    let row = cursor.current()?.ok_or("expected a row")?;
    assert_eq!(row.get("name").and_then(RowValues::as_text), Some("a"));
    assert!(cursor.advance()?);
    assert!(!cursor.advance()?);
    Ok(())
}

#[test]
fn new_execution_replaces_open_result() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute("CREATE TABLE t (id INTEGER)")?;
    stmt.execute("INSERT INTO t VALUES (1), (2), (3)")?;

    assert!(stmt.execute("SELECT id FROM t")?);
    assert!(stmt.execute("SELECT id FROM t WHERE id > 1")?);
    let cursor = stmt.result_set()?.ok_or("expected a result")?;
    assert_eq!(cursor.row_count()?, 2);

    stmt.execute("UPDATE t SET id = id + 10")?;
    assert!(stmt.result_set()?.is_none());

    let cursor = stmt.execute_query("SELECT id FROM t ORDER BY id")?;
    assert_eq!(cursor.rows()?[0].get("id"), Some(&RowValues::Int(11)));
    Ok(())
}

#[test]
fn rejected_sql_propagates_and_leaves_no_result() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute("CREATE TABLE t (id INTEGER)")?;
    stmt.execute("SELECT id FROM t")?;

    let err = stmt.execute("SELECT nope FROM t");
    assert!(matches!(err, Err(SqlStatementError::SqliteError(_))));
    assert!(stmt.result_set()?.is_none());

    let err = stmt.execute("INSERT INTO missing VALUES (1)");
    assert!(matches!(err, Err(SqlStatementError::SqliteError(_))));
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    Ok(())
}
