use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored message. Timestamps are normalized to UTC on read and
/// serialize as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// One served file. `filename` is echoed back exactly as the caller
/// requested it, not as the path that was ultimately resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    pub filename: String,
    pub content: String,
}
