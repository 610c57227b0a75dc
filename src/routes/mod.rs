//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `LLAMATERM_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - Chat and settings routes under `/api`

mod chat;
pub mod doc;
mod health;
mod settings;

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(chat::router())
        .merge(settings::router());

    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api_router);

    // Enabled by default; disable with LLAMATERM_ENABLE_SWAGGER=false in
    // production to avoid exposing the API structure.
    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state.config)))
        .layer(axum_middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::entities::SqliteStore;
    use crate::relay::RelayEngine;

    async fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let store = Arc::new(SqliteStore::connect(&url).await.expect("connect test db"));
        let relay = RelayEngine::new(Arc::clone(&store), reqwest::Client::new());
        let state = Arc::new(AppState {
            config: Arc::new(Config {
                bind_address: "127.0.0.1:0".into(),
                database_url: url,
                log_level: "info".into(),
                log_json: false,
                cors_allowed_origins: None,
                enable_swagger: false,
            }),
            store,
            relay,
        });
        (dir, build(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn history_starts_empty() {
        let (_dir, app) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/chat/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn empty_message_is_rejected_with_field() {
        let (_dir, app) = test_app().await;
        let response = app
            .oneshot(json_request("POST", "/api/chat", serde_json::json!({"message": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["field"], "message");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn send_message_returns_assistant_turn() {
        let (_dir, app) = test_app().await;
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/chat", serde_json::json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["role"], "assistant");
        assert!(body["content"].as_str().unwrap().contains("not configured"));
        assert!(body["createdAt"].is_string());

        // Both turns now visible in the history.
        let response = app
            .oneshot(Request::get("/api/chat/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let history = body_json(response).await;
        assert_eq!(history.as_array().unwrap().len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[1]["role"], "assistant");
    }

    #[tokio::test]
    async fn clear_history_returns_no_content() {
        let (_dir, app) = test_app().await;
        app.clone()
            .oneshot(json_request("POST", "/api/chat", serde_json::json!({"message": "hi"})))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(Request::delete("/api/chat/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::get("/api/chat/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let (_dir, app) = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/settings/llm_url",
                serde_json::json!({"value": "http://localhost:8080"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["key"], "llm_url");
        assert_eq!(body["value"], "http://localhost:8080");

        let response = app
            .oneshot(Request::get("/api/settings/llm_url").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["value"], "http://localhost:8080");
    }

    #[tokio::test]
    async fn unknown_setting_is_404() {
        let (_dir, app) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/settings/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Setting not found");
    }

    #[tokio::test]
    async fn empty_setting_value_is_rejected() {
        let (_dir, app) = test_app().await;
        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/settings/llm_url",
                serde_json::json!({"value": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["field"], "value");
    }

    #[tokio::test]
    async fn responses_carry_a_trace_id() {
        let (_dir, app) = test_app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-trace-id"));
    }

    #[tokio::test]
    async fn stored_message_content_is_preserved_verbatim() {
        let (_dir, app) = test_app().await;
        // Leading/trailing whitespace survives persistence; only the
        // emptiness check trims.
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/chat", serde_json::json!({"message": "  spaced  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/chat/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let history = body_json(response).await;
        assert_eq!(history[0]["content"], "  spaced  ");
    }
}
