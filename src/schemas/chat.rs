//! Chat API request / response types.
//!
//! Field names follow the camelCase convention the browser client consumes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// The user's message text.  Must not be empty or whitespace-only.
    pub message: String,
}

/// A single persisted chat message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    /// Monotonically assigned, stable ordering key.
    pub id: i64,
    /// `"user"`, `"assistant"`, or `"system"`.
    pub role: String,
    pub content: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}
