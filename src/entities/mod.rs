//! Persistence layer.
//!
//! One trait per domain ([`MessageStore`], [`SettingStore`]) keeps handler
//! code independent of the concrete database.  The default implementation is
//! [`SqliteStore`]; to swap to another database, implement the traits for a
//! new type and change the concrete type in [`crate::state::AppState`].
//!
//! All trait methods use `impl Future` in their signatures (stable since Rust
//! 1.75) so no extra `async-trait` crate is required.

pub mod dao;
pub mod message;
pub mod setting;

pub use dao::{ChatMessage, Setting};
pub use message::MessageStore;
pub use setting::SettingStore;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

/// SQLite-backed message and settings store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://llamaterm.db"`.  The migrations directory is resolved
    /// relative to `CARGO_MANIFEST_DIR` at compile time and embedded into the
    /// binary, so the working directory at runtime does not matter.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}
