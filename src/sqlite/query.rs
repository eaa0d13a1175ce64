use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::{Result, SqlStatementError};
use crate::results::RowSet;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Convert bind arguments into `SQLite` values.
#[must_use]
pub fn convert_args(args: &[RowValues]) -> Vec<Value> {
    args.iter().map(row_value_to_sqlite_value).collect()
}

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `SqlStatementError::SqliteError` if the column cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<RowValues> {
    let value: Value = row.get(idx).map_err(SqlStatementError::SqliteError)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared query and materialize every row.
///
/// # Errors
/// Returns `SqlStatementError::SqliteError` if binding, stepping or reading a column fails.
pub fn build_row_set(stmt: &mut Statement<'_>, args: &[Value]) -> Result<RowSet> {
    let param_refs: Vec<&dyn ToSql> = args.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut row_set = RowSet::new(column_names);

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            values.push(sqlite_extract_value(row, i)?);
        }
        row_set.push_values(values);
    }

    Ok(row_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn bools_and_timestamps_bind_as_sqlite_affinities() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .map(RowValues::Timestamp);
        assert_eq!(row_value_to_sqlite_value(&RowValues::Bool(true)), Value::Integer(1));
        assert_eq!(
            ts.as_ref().map(row_value_to_sqlite_value),
            Some(Value::Text("2024-01-02 03:04:05".into()))
        );
    }

    #[test]
    fn materializes_rows_with_bound_args() -> Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT); INSERT INTO t VALUES (1, 'a'), (2, NULL);",
        )?;
        let mut stmt = conn.prepare("SELECT id, name FROM t WHERE id >= ?1 ORDER BY id")?;
        let set = build_row_set(&mut stmt, &convert_args(&[RowValues::Int(1)]))?;
        assert_eq!(set.column_names(), ["id", "name"]);
        assert_eq!(set.len(), 2);
        assert!(set.rows()[1].get("name").is_some_and(RowValues::is_null));
        Ok(())
    }
}
