use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use glasshouse_types::models::Message;

use crate::models::MessageRow;
use crate::{Database, MessageStore};

const LIST_SQL: &str = "SELECT id, body, created_at FROM messages ORDER BY id DESC";
const REREAD_SQL: &str = "SELECT id, body, created_at FROM messages WHERE id = last_insert_rowid()";

/// Message repository that builds SQL by splicing caller input straight
/// into the statement text. It exists for the injection demonstrations;
/// [`crate::SecureMessageRepository`] is the parameterized counterpart
/// and shares no query-building code with this one.
pub struct VulnerableMessageRepository {
    db: Arc<Database>,
}

impl VulnerableMessageRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Splices `body` between quote characters with no escaping, so a quote,
/// semicolon, or SQL keyword in `body` becomes part of the statement.
fn spliced_insert_sql(body: &str) -> String {
    format!("INSERT INTO messages (body) VALUES ('{body}')")
}

/// Splices `id` unquoted into a numeric comparison, which lets a caller
/// extend the WHERE clause (`0 OR 1=1`) or append a UNION arm.
fn spliced_find_sql(id: &str) -> String {
    format!("SELECT id, body, created_at FROM messages WHERE id = {id}")
}

impl MessageStore for VulnerableMessageRepository {
    fn list(&self) -> Result<Vec<Message>> {
        let rows = self.db.execute(LIST_SQL, &[])?.into_rows()?;
        rows.iter()
            .map(|values| Ok(MessageRow::from_values(values)?.into_message()))
            .collect()
    }

    fn insert(&self, body: &str) -> Result<Option<Message>> {
        self.db.execute(&spliced_insert_sql(body), &[])?;

        // The id lookup runs as its own statement afterwards; an injected
        // DELETE can leave it nothing to find, which reports as no result
        // rather than an error.
        let rows = self.db.execute(REREAD_SQL, &[])?.into_rows()?;
        match rows.first() {
            Some(values) => Ok(Some(MessageRow::from_values(values)?.into_message())),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Message>> {
        let rows = self.db.execute(&spliced_find_sql(id), &[])?.into_rows()?;
        match rows.first() {
            Some(values) => Ok(Some(MessageRow::from_values(values)?.into_message())),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        self.db.execute("DELETE FROM messages", &[])?;
        // The sequence table is managed by SQLite; resetting it is
        // best-effort.
        if let Err(err) = self
            .db
            .execute("DELETE FROM sqlite_sequence WHERE name = 'messages'", &[])
        {
            debug!("Autoincrement reset skipped: {err:#}");
        }
        Ok(())
    }
}
