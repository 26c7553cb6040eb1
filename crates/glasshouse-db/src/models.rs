use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Value;
use tracing::warn;

use glasshouse_types::models::Message;

use crate::StoreError;

/// Positional row shape shared by both repositories:
/// `SELECT id, body, created_at FROM messages`.
#[derive(Debug)]
pub struct MessageRow {
    pub id: i64,
    pub body: String,
    pub created_at: String,
}

impl MessageRow {
    pub fn from_values(values: &[Value]) -> Result<Self, StoreError> {
        let [id, body, created_at] = values else {
            return Err(StoreError::RowShape(format!(
                "expected 3 columns, got {}",
                values.len()
            )));
        };

        let id = match id {
            Value::Integer(id) => *id,
            other => {
                return Err(StoreError::RowShape(format!(
                    "id column: expected an integer, got {other:?}"
                )));
            }
        };
        let body = match body {
            Value::Text(body) => body.clone(),
            other => {
                return Err(StoreError::RowShape(format!(
                    "body column: expected text, got {other:?}"
                )));
            }
        };
        let created_at = match created_at {
            Value::Text(created_at) => created_at.clone(),
            other => {
                return Err(StoreError::RowShape(format!(
                    "created_at column: expected text, got {other:?}"
                )));
            }
        };

        Ok(Self { id, body, created_at })
    }

    pub fn into_message(self) -> Message {
        let created_at = parse_timestamp(&self.created_at, self.id);
        Message {
            id: self.id,
            body: self.body,
            created_at,
        }
    }
}

fn parse_timestamp(raw: &str, id: i64) -> DateTime<Utc> {
    // SQLite's datetime('now') writes "YYYY-MM-DD HH:MM:SS" without a
    // timezone; injected literals may use the T separator instead.
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on message '{}': {}", raw, id, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_timestamps() {
        let ts = parse_timestamp("2025-01-15 10:30:00", 1);
        assert_eq!(ts.to_rfc3339(), "2025-01-15T10:30:00+00:00");
    }

    #[test]
    fn parses_t_separated_timestamps() {
        let ts = parse_timestamp("1970-01-01T00:00:00", 1);
        assert_eq!(ts, DateTime::<Utc>::default());
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_epoch() {
        assert_eq!(parse_timestamp("not a date", 1), DateTime::<Utc>::default());
    }

    #[test]
    fn rejects_short_rows() {
        let err = MessageRow::from_values(&[Value::Integer(1)]).unwrap_err();
        assert!(matches!(err, StoreError::RowShape(_)));
    }

    #[test]
    fn rejects_mistyped_columns() {
        let values = [
            Value::Text("1".into()),
            Value::Text("body".into()),
            Value::Text("2025-01-15 10:30:00".into()),
        ];
        assert!(MessageRow::from_values(&values).is_err());
    }
}
