use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use glasshouse_types::models::Message;

use crate::models::MessageRow;
use crate::{Database, MessageStore};

const LIST_SQL: &str = "SELECT id, body, created_at FROM messages ORDER BY id DESC";
const INSERT_SQL: &str = "INSERT INTO messages (body) VALUES (?1)";
const FIND_SQL: &str = "SELECT id, body, created_at FROM messages WHERE id = ?1";
const REREAD_SQL: &str = "SELECT id, body, created_at FROM messages WHERE id = last_insert_rowid()";

/// Message repository that passes caller input through bound parameters.
/// A value full of quotes or SQL syntax is stored and matched as a plain
/// literal.
pub struct SecureMessageRepository {
    db: Arc<Database>,
}

impl SecureMessageRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl MessageStore for SecureMessageRepository {
    fn list(&self) -> Result<Vec<Message>> {
        let rows = self.db.execute(LIST_SQL, &[])?.into_rows()?;
        rows.iter()
            .map(|values| Ok(MessageRow::from_values(values)?.into_message()))
            .collect()
    }

    fn insert(&self, body: &str) -> Result<Option<Message>> {
        self.db.execute(INSERT_SQL, &[&body])?.into_mutation()?;

        let rows = self.db.execute(REREAD_SQL, &[])?.into_rows()?;
        match rows.first() {
            Some(values) => Ok(Some(MessageRow::from_values(values)?.into_message())),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Message>> {
        // SQLite's numeric affinity still matches "1" against id 1, while
        // attack-shaped text compares as text and matches nothing.
        let rows = self.db.execute(FIND_SQL, &[&id])?.into_rows()?;
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
