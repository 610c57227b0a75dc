use std::future::Future;

use crate::entities::{SqliteStore, dao::Setting};

/// Key/value settings persistence.  Writes are upserts: at most one row
/// exists per key.
pub trait SettingStore: Send + Sync + 'static {
    fn get_setting(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Setting>, sqlx::Error>> + Send;
    fn upsert_setting(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<Setting, sqlx::Error>> + Send;
}

impl SettingStore for SqliteStore {
    async fn get_setting(&self, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT key, value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(key, value)| Setting { key, value }))
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
        )
        .bind(key)
        .bind(value)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;
        Ok(Setting {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
