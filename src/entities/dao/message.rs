use chrono::{DateTime, Utc};

/// A single message row in the `messages` table.
///
/// `id` is assigned monotonically by SQLite and serves as the tie-break when
/// two messages share the same `created_at` timestamp.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: i64,
    /// `"user"`, `"assistant"`, or `"system"`.
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
