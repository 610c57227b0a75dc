//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::entities::SqliteStore;
use crate::relay::RelayEngine;

/// State shared across all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent message / settings store.
    pub store: Arc<SqliteStore>,
    /// Turns user messages into persisted exchanges with the LLM endpoint.
    pub relay: RelayEngine,
}
