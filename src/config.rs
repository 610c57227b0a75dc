//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for llamaterm-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// SQLite database URL (default: `"sqlite://llamaterm.db"`).
    /// Any sqlx-compatible SQLite connection string works; the file is
    /// created on first start if it does not exist.
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins.  `None` means wildcard,
    /// which is suitable for development only.
    pub cors_allowed_origins: Option<String>,

    /// Serve the Swagger UI at `/swagger-ui` (default: `true`).
    pub enable_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("LLAMATERM_BIND", "0.0.0.0:3000"),
            database_url: env_or("LLAMATERM_DATABASE_URL", "sqlite://llamaterm.db"),
            log_level: env_or("LLAMATERM_LOG", "info"),
            log_json: std::env::var("LLAMATERM_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origins: std::env::var("LLAMATERM_CORS_ORIGINS").ok(),
            enable_swagger: parse_env("LLAMATERM_ENABLE_SWAGGER", true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
