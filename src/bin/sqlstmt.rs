use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use sqlite_statement::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run SQL through a SQLite statement")]
struct Args {
    /// Database file; defaults to a private in-memory database.
    #[arg(long)]
    db: Option<String>,
    /// JSON options document; overrides --db.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Row limit applied to every query (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    max_rows: i64,
    /// Queue every statement and run them as one batch.
    #[arg(long)]
    batch: bool,
    #[arg(long, short)]
    verbose: bool,
    /// SQL statements, executed in order.
    #[arg(required = true)]
    sql: Vec<String>,
}

fn load_options(args: &Args) -> Result<SqliteOptions, SqlStatementError> {
    if let Some(path) = &args.config {
        let document = std::fs::read_to_string(path).map_err(|e| {
            SqlStatementError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        return SqliteOptions::from_json(&document);
    }
    Ok(match &args.db {
        Some(path) => SqliteOptions::new(path.clone()),
        None => SqliteOptions::in_memory(),
    })
}

fn print_cursor(cursor: &ResultCursor) -> Result<(), SqlStatementError> {
    println!("{}", cursor.column_names()?.join("\t"));
    for row in cursor.rows()? {
        let cells: Vec<String> = row.values().iter().map(format_value).collect();
        println!("{}", cells.join("\t"));
    }
    Ok(())
}

fn format_value(value: &RowValues) -> String {
    match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => f.to_string(),
        RowValues::Text(s) => s.clone(),
        RowValues::Bool(b) => b.to_string(),
        RowValues::Timestamp(ts) => ts.to_string(),
        RowValues::Null => "NULL".to_string(),
        RowValues::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

fn run(args: &Args) -> Result<(), SqlStatementError> {
    let conn = SqliteConnection::open(load_options(args)?)?;
    let mut stmt = conn.create_statement()?;
    stmt.set_max_rows(args.max_rows)?;

    if args.batch {
        for sql in &args.sql {
            stmt.add_batch(sql)?;
        }
        let counts = stmt.execute_batch()?;
        println!("batch update counts: {counts:?}");
    } else {
        for sql in &args.sql {
            if stmt.execute(sql)? {
                if let Some(cursor) = stmt.result_set()? {
                    print_cursor(cursor)?;
                }
            } else {
                match stmt.update_count()? {
                    NO_UPDATE_COUNT => println!("(no rows)"),
                    count => println!("{count} row(s) changed"),
                }
            }
            stmt.more_results()?;
        }
    }

    stmt.close()?;
    conn.close();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
