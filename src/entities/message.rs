use std::future::Future;

use chrono::Utc;

use crate::entities::{SqliteStore, dao::ChatMessage};

/// Append-only ordered log of chat turns.
///
/// `list_messages` returns a total, stable ordering: ascending `created_at`
/// with the auto-increment `id` as tie-break, so two messages created within
/// the same timestamp resolution never swap places between reads.
pub trait MessageStore: Send + Sync + 'static {
    fn append_message(
        &self,
        role: &str,
        content: &str,
    ) -> impl Future<Output = Result<ChatMessage, sqlx::Error>> + Send;
    fn list_messages(
        &self,
    ) -> impl Future<Output = Result<Vec<ChatMessage>, sqlx::Error>> + Send;
    fn clear_messages(&self) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

impl MessageStore for SqliteStore {
    async fn append_message(&self, role: &str, content: &str) -> Result<ChatMessage, sqlx::Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO messages (role, content, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(role)
        .bind(content)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            role: role.to_owned(),
            content: content.to_owned(),
            created_at,
        })
    }

    async fn list_messages(&self) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let rows: Vec<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, role, content, created_at \
             FROM messages ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, role, content, created_at)| ChatMessage {
                id,
                role,
                content,
                created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
                    tracing::warn!(raw = %created_at, error = %e, "failed to parse message created_at; using now");
                    Utc::now()
                }),
            })
            .collect())
    }

    async fn clear_messages(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM messages").execute(&self.pool).await?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    async fn temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let store = SqliteStore::connect(&url).await.expect("connect test db");
        (dir, store)
    }

    #[tokio::test]
    async fn append_then_list_preserves_order() {
        let (_dir, store) = temp_store().await;
        store.append_message("user", "first").await.unwrap();
        store.append_message("assistant", "second").await.unwrap();
        store.append_message("user", "third").await.unwrap();

        let messages = store.list_messages().await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
        assert_eq!(messages[2].content, "third");
        assert!(messages[0].id < messages[1].id);
        assert!(messages[1].id < messages[2].id);
    }

    #[tokio::test]
    async fn identical_timestamps_fall_back_to_id_order() {
        let (_dir, store) = temp_store().await;
        // Insert two rows with a colliding created_at directly, bypassing the
        // store's own timestamping.
        let stamp = Utc::now().to_rfc3339();
        for content in ["earlier", "later"] {
            sqlx::query("INSERT INTO messages (role, content, created_at) VALUES ('user', ?1, ?2)")
                .bind(content)
                .bind(&stamp)
                .execute(&store.pool)
                .await
                .unwrap();
        }

        let messages = store.list_messages().await.unwrap();
        assert_eq!(messages[0].content, "earlier");
        assert_eq!(messages[1].content, "later");

        // Stable across repeated reads.
        let again = store.list_messages().await.unwrap();
        assert_eq!(again[0].content, "earlier");
        assert_eq!(again[1].content, "later");
    }

    #[tokio::test]
    async fn clear_messages_empties_the_log() {
        let (_dir, store) = temp_store().await;
        store.append_message("user", "hello").await.unwrap();
        store.append_message("assistant", "hi").await.unwrap();

        store.clear_messages().await.unwrap();
        assert!(store.list_messages().await.unwrap().is_empty());
    }
}
