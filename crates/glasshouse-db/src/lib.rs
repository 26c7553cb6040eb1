pub mod migrations;
pub mod models;

mod secure;
mod vulnerable;

pub use secure::SecureMessageRepository;
pub use vulnerable::VulnerableMessageRepository;

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};
use tracing::info;

use glasshouse_types::models::Message;

/// Reserved database-path value selecting a transient in-memory store.
pub const MEMORY_DB_PATH: &str = ":memory:";

/// One untyped result row, column values in statement order.
pub type SqlRow = Vec<Value>;

/// What a statement produced: rows for read statements, the affected-row
/// count plus last generated id for everything else. Callers branch on
/// the variant and fail with [`StoreError`] when the wrong kind comes
/// back for their use case.
#[derive(Debug)]
pub enum QueryOutcome {
    Rows(Vec<SqlRow>),
    Mutation { changes: u64, last_insert_id: i64 },
}

impl QueryOutcome {
    pub fn into_rows(self) -> Result<Vec<SqlRow>, StoreError> {
        match self {
            QueryOutcome::Rows(rows) => Ok(rows),
            QueryOutcome::Mutation { .. } => Err(StoreError::ExpectedRows),
        }
    }

    pub fn into_mutation(self) -> Result<(u64, i64), StoreError> {
        match self {
            QueryOutcome::Mutation { changes, last_insert_id } => Ok((changes, last_insert_id)),
            QueryOutcome::Rows(_) => Err(StoreError::ExpectedMutation),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("expected a row-returning statement, got a mutation outcome")]
    ExpectedRows,
    #[error("expected a mutation outcome, got a row-returning statement")]
    ExpectedMutation,
    #[error("unexpected row shape: {0}")]
    RowShape(String),
}

/// Persistence capability for messages, implemented by both the
/// spliced-SQL and the parameterized repository so the composition root
/// can select either behind one interface.
pub trait MessageStore: Send + Sync {
    /// All messages, newest first.
    fn list(&self) -> Result<Vec<Message>>;

    /// Insert a message and re-read it by the engine's last insert id.
    /// `Ok(None)` means the statement ran but the re-read found no row.
    fn insert(&self, body: &str) -> Result<Option<Message>>;

    /// Look up a message by the caller's id text.
    fn find_by_id(&self, id: &str) -> Result<Option<Message>>;

    /// Delete every message and reset the id sequence where possible.
    fn clear(&self) -> Result<()>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating parent directories as needed) a file-backed store,
    /// apply WAL journaling, and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Transient store for test isolation; never persisted to disk.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;

        info!("Database opened in memory");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Dispatch on the [`MEMORY_DB_PATH`] sentinel.
    pub fn open_path(location: &str) -> Result<Self> {
        if location == MEMORY_DB_PATH {
            Self::open_in_memory()
        } else {
            Self::open(Path::new(location))
        }
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run one statement, parameterized or ad hoc.
    ///
    /// A single read statement yields [`QueryOutcome::Rows`]; any other
    /// single statement yields [`QueryOutcome::Mutation`]. Text the engine
    /// rejects as a multi-statement batch is, when no parameters were
    /// bound, executed whole as a batch and the connection is then asked
    /// for its total changes and last insert id. This keeps chained
    /// statements runnable instead of rejected, which the injection demos
    /// rely on. Every other preparation failure propagates to the caller.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<QueryOutcome> {
        self.with_conn(|conn| match run_statement(conn, sql, params) {
            Ok(outcome) => Ok(outcome),
            Err(rusqlite::Error::MultipleStatement) if params.is_empty() => run_batch(conn, sql),
            Err(err) => Err(err.into()),
        })
    }
}

fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> rusqlite::Result<QueryOutcome> {
    let mut stmt = conn.prepare(sql)?;
    let column_count = stmt.column_count();

    if column_count == 0 {
        drop(stmt);
        // Connection::execute enforces that the text holds exactly one
        // statement, reporting MultipleStatement for chained batches.
        let changes = conn.execute(sql, params)?;
        return Ok(QueryOutcome::Mutation {
            changes: changes as u64,
            last_insert_id: conn.last_insert_rowid(),
        });
    }

    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            record.push(row.get::<_, Value>(idx)?);
        }
        records.push(record);
    }
    Ok(QueryOutcome::Rows(records))
}

fn run_batch(conn: &Connection, sql: &str) -> Result<QueryOutcome> {
    conn.execute_batch(sql)?;
    let changes: u64 = conn.query_row("SELECT total_changes()", [], |row| row.get(0))?;
    Ok(QueryOutcome::Mutation {
        changes,
        last_insert_id: conn.last_insert_rowid(),
    })
}
