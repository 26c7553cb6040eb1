use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Literal creation text for the primary table.
///
/// sqlite_master records this text verbatim (minus the `IF NOT EXISTS`
/// guard added in [`run`]), so schema-disclosure demos can compare query
/// output against these constants byte for byte.
pub const MESSAGES_TABLE_SQL: &str = "CREATE TABLE messages (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL, created_at TEXT NOT NULL DEFAULT (datetime('now')))";

/// Decoy table with the same shape as `messages`. It never holds
/// application data; it exists as a disclosure target for UNION-based
/// injection demos.
pub const DECOY_TABLE_SQL: &str = "CREATE TABLE messages2 (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL, created_at TEXT NOT NULL DEFAULT (datetime('now')))";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "{};\n{};",
        guarded(MESSAGES_TABLE_SQL),
        guarded(DECOY_TABLE_SQL),
    ))?;

    info!("Database migrations complete");
    Ok(())
}

fn guarded(create_sql: &str) -> String {
    create_sql.replacen("CREATE TABLE", "CREATE TABLE IF NOT EXISTS", 1)
}
