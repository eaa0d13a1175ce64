use sqlite_statement::prelude::*;

fn seeded_statement() -> Result<(SqliteConnection, SqliteStatement), SqlStatementError> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, grp TEXT)")?;
    stmt.execute("INSERT INTO t (grp) VALUES ('a'), ('a'), ('a'), ('b')")?;
    stmt.update_count()?;
    Ok((conn, stmt))
}

#[test]
fn update_count_is_read_once() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    assert!(!stmt.execute("UPDATE t SET grp = 'c' WHERE grp = 'a'")?);
    assert_eq!(stmt.update_count()?, 3);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn zero_row_update_reports_zero_not_minus_one() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    stmt.execute("DELETE FROM t WHERE grp = 'zzz'")?;
    assert_eq!(stmt.update_count()?, 0);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn ddl_reports_zero_changes() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    stmt.execute("CREATE TABLE other (x INTEGER)")?;
    assert_eq!(stmt.update_count()?, 0);
    Ok(())
}

#[test]
fn trigger_writes_are_not_counted() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    stmt.execute_update("CREATE TABLE audit (id INTEGER)")?;
    stmt.execute_update(
        "CREATE TRIGGER t_audit AFTER DELETE ON t BEGIN INSERT INTO audit VALUES (old.id); END",
    )?;
    assert_eq!(stmt.execute_update("DELETE FROM t WHERE grp = 'a'")?, 3);
    assert!(!stmt.execute("DELETE FROM t")?);
    assert_eq!(stmt.update_count()?, 1);

    let cursor = stmt.execute_query("SELECT COUNT(*) AS cnt FROM audit")?;
    assert_eq!(cursor.rows()?[0].get("cnt"), Some(&RowValues::Int(4)));
    Ok(())
}

#[test]
fn cascaded_deletes_are_not_counted() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute("PRAGMA foreign_keys = ON")?;
    stmt.execute_update("CREATE TABLE parent (id INTEGER PRIMARY KEY)")?;
    stmt.execute_update(
        "CREATE TABLE child (id INTEGER, parent_id INTEGER REFERENCES parent(id) ON DELETE CASCADE)",
    )?;
    stmt.execute_update("INSERT INTO parent VALUES (1), (2)")?;
    stmt.execute_update("INSERT INTO child VALUES (10, 1), (11, 1), (12, 2)")?;

    assert_eq!(stmt.execute_update("DELETE FROM parent WHERE id = 1")?, 1);
    let cursor = stmt.execute_query("SELECT COUNT(*) AS cnt FROM child")?;
    assert_eq!(cursor.rows()?[0].get("cnt"), Some(&RowValues::Int(1)));
    Ok(())
}

#[test]
fn terminal_condition_after_update() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    stmt.execute("UPDATE t SET grp = 'z' WHERE id = 1")?;
    assert!(!stmt.more_results()?);
    assert_eq!(stmt.update_count()?, 1);
    assert!(!stmt.more_results()? && stmt.update_count()? == NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn terminal_condition_after_query() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    assert!(stmt.execute("SELECT * FROM t")?);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    assert!(!stmt.more_results()?);
    assert!(stmt.result_set()?.is_none());
    assert!(!stmt.more_results()? && stmt.update_count()? == NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn query_clears_pending_update_count() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    stmt.execute("DELETE FROM t WHERE grp = 'b'")?;
    stmt.execute("SELECT * FROM t")?;
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);

    stmt.execute("DELETE FROM t WHERE id = 1")?;
    stmt.execute_query("SELECT * FROM t")?;
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn execute_update_returns_count_directly() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    assert_eq!(stmt.execute_update("DELETE FROM t WHERE grp = 'a'")?, 3);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn execute_update_deletes_whole_table() -> Result<(), Box<dyn std::error::Error>> {
    let conn = SqliteConnection::open_in_memory()?;
    let mut stmt = conn.create_statement()?;
    stmt.execute_update("CREATE TABLE t (id INTEGER)")?;
    stmt.execute_update("INSERT INTO t VALUES (1), (2), (3)")?;
    assert_eq!(stmt.execute_update("DELETE FROM t")?, 3);
    assert_eq!(stmt.update_count()?, NO_UPDATE_COUNT);
    Ok(())
}

#[test]
fn execute_update_with_keys_behaves_like_execute_update() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    let changed = stmt.execute_update_with_keys(
        "INSERT INTO t (grp) VALUES ('k')",
        AutoGeneratedKeys::Return,
    )?;
    assert_eq!(changed, 1);
    let keys = stmt.generated_keys()?;
    assert_eq!(keys.rows()?[0].get_by_index(0), Some(&RowValues::Int(5)));
    Ok(())
}

#[test]
fn keep_current_result_leaves_cursor_open() -> Result<(), Box<dyn std::error::Error>> {
    let (_conn, mut stmt) = seeded_statement()?;
    stmt.execute("SELECT * FROM t")?;
    assert!(!stmt.more_results_with(CurrentResult::Keep)?);
    assert!(stmt.result_set()?.is_some_and(|c| !c.is_closed()));
    assert!(!stmt.more_results_with(CurrentResult::CloseAll)?);
    assert!(stmt.result_set()?.is_none());
    Ok(())
}
