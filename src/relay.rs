//! Chat relay engine.
//!
//! Turns one user-submitted string into a persisted exchange: the user turn
//! is committed first, then the configured LLM endpoint is called with the
//! full conversation history, and the normalized reply is committed as the
//! assistant turn.
//!
//! Every upstream failure mode (endpoint not configured, non-success status,
//! transport error, unrecognized response shape) is converted into assistant
//! message content rather than an HTTP error, so the conversation log stays
//! the single source of truth and the client always sees an explanation.
//! Only validation and persistence failures propagate as [`ServerError`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::{ChatMessage, MessageStore, SettingStore, SqliteStore};
use crate::error::ServerError;

/// Settings key under which the upstream endpoint URL is stored.
pub const LLM_URL_KEY: &str = "llm_url";

/// Assistant reply used when no endpoint has been configured.
const NOT_CONFIGURED: &str = "Error: Local Llama URL not configured. \
    Use `/config <url>` to set it. \
    Example: `/config http://localhost:8080/v1/chat/completions`";

/// How many characters of an unrecognized upstream body are echoed back.
const RAW_DUMP_LIMIT: usize = 100;

/// Relays user messages to the configured LLM endpoint and persists both
/// sides of the exchange.  Stateless between invocations: all context is
/// re-read from the store on each call.
#[derive(Debug)]
pub struct RelayEngine {
    store: Arc<SqliteStore>,
    http: reqwest::Client,
    /// Serializes whole relay turns.  The append–read–append sequence spans
    /// several store calls without a transaction, so concurrent callers
    /// could otherwise interleave their turns in the history.
    turn_lock: tokio::sync::Mutex<()>,
}

impl RelayEngine {
    pub fn new(store: Arc<SqliteStore>, http: reqwest::Client) -> Self {
        Self {
            store,
            http,
            turn_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Relay one user message and return the persisted assistant turn.
    ///
    /// The user message is committed before any network activity, so a
    /// failure mid-relay never loses the user's input.
    pub async fn relay(&self, user_text: &str) -> Result<ChatMessage, ServerError> {
        if user_text.trim().is_empty() {
            return Err(ServerError::Validation {
                message: "message must not be empty".into(),
                field: "message".into(),
            });
        }

        let _turn = self.turn_lock.lock().await;

        self.store.append_message("user", user_text).await?;

        let endpoint = self
            .store
            .get_setting(LLM_URL_KEY)
            .await?
            .map(|s| s.value)
            .filter(|url| !url.is_empty());

        let assistant_content = match endpoint {
            None => NOT_CONFIGURED.to_owned(),
            Some(url) => {
                let history = self.store.list_messages().await?;
                self.call_upstream(&url, &history).await
            }
        };

        let reply = self.store.append_message("assistant", &assistant_content).await?;
        Ok(reply)
    }

    /// Call the endpoint with the full history as context.  Always yields
    /// assistant content: failures become explanatory strings.
    async fn call_upstream(&self, url: &str, history: &[ChatMessage]) -> String {
        let payload = UpstreamRequest {
            messages: history
                .iter()
                .map(|m| ContextMessage {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
            // Some compatible servers (text-generation-webui among them)
            // require this flag to select the chat code path.
            mode: "chat",
        };
        debug!(url = %url, context_len = payload.messages.len(), "calling LLM endpoint");

        match self.try_call(url, &payload).await {
            Ok(content) => content,
            Err(e) => {
                warn!(url = %url, error = %e, "LLM call failed");
                format!("Error connecting to LLM at {url}: {e}")
            }
        }
    }

    async fn try_call(
        &self,
        url: &str,
        payload: &UpstreamRequest<'_>,
    ) -> Result<String, UpstreamError> {
        let response = self.http.post(url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        Ok(normalize_reply(&body))
    }
}

/// Why a single upstream call failed.  Only ever rendered into assistant
/// content, never surfaced as an HTTP error.
#[derive(Debug, Error)]
enum UpstreamError {
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

// ── Wire types ────────────────────────────────────────────────────────────────

/// Outbound request body: the context payload plus a fixed auxiliary flag.
#[derive(Serialize)]
struct UpstreamRequest<'a> {
    messages: Vec<ContextMessage<'a>>,
    mode: &'static str,
}

/// Projection of a stored message to the `{role, content}` pair the endpoint
/// expects; id and timestamp are deliberately dropped.
#[derive(Serialize)]
struct ContextMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible chat-completion response shape.
#[derive(Deserialize)]
struct ChatCompletionShape {
    choices: Vec<ChoiceShape>,
}

#[derive(Deserialize)]
struct ChoiceShape {
    message: ChoiceMessageShape,
}

#[derive(Deserialize)]
struct ChoiceMessageShape {
    content: String,
}

/// Flat `{content}` response shape used by simpler servers.
#[derive(Deserialize)]
struct FlatShape {
    content: String,
}

/// Extract the reply text from an upstream response body.
///
/// Decode attempts run in a fixed order: the OpenAI chat-completion shape
/// wins over a flat top-level `content` string; anything else yields a
/// diagnostic with a bounded dump of the raw JSON.
fn normalize_reply(body: &serde_json::Value) -> String {
    if let Ok(chat) = serde_json::from_value::<ChatCompletionShape>(body.clone()) {
        if let Some(choice) = chat.choices.into_iter().next() {
            return choice.message.content;
        }
    }
    if let Ok(flat) = serde_json::from_value::<FlatShape>(body.clone()) {
        return flat.content;
    }
    let raw = body.to_string();
    let head: String = raw.chars().take(RAW_DUMP_LIMIT).collect();
    format!("Error: Could not parse LLM response. Raw: {head}...")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
