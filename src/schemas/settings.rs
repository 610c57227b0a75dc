//! Settings API request / response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single key/value setting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
}

/// Request body for `PUT /api/settings/{key}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingRequest {
    /// The new value.  Must not be empty.
    pub value: String,
}
