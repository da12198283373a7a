//! Telegram Bot API client
//!
//! Thin HTTP+JSON wrapper around the two methods the bot calls. Every call
//! logs the method name, HTTP status and the platform-reported outcome
//! fields; log delivery never blocks the webhook response.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use super::types::InlineQueryResultVoice;
use super::PlatformApi;

/// Errors from a Telegram Bot API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure before a response body was read
    #[error("network error: {0}")]
    Network(String),
    /// Response body was not the expected JSON envelope
    #[error("response decode error: {0}")]
    Decode(String),
    /// The platform answered with `ok=false`
    #[error("api error: code={error_code:?} description={description:?}")]
    Api {
        /// Platform error code, if reported
        error_code: Option<i64>,
        /// Platform error description, if reported
        description: Option<String>,
    },
}

/// Response envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// HTTP client bound to one bot token.
pub struct TelegramApi {
    http: HttpClient,
    base_url: String,
}

impl TelegramApi {
    /// Creates a client for the given bot token.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    async fn call(&self, method: &str, body: &Value) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.without_url().to_string()))?;

        if parsed.ok {
            info!("[Telegram API] method={method} status={status} ok=true");
            Ok(())
        } else {
            warn!(
                "[Telegram API] method={method} status={status} ok=false error_code={:?} description={:?}",
                parsed.error_code, parsed.description
            );
            Err(ApiError::Api {
                error_code: parsed.error_code,
                description: parsed.description,
            })
        }
    }
}

#[async_trait]
impl PlatformApi for TelegramApi {
    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResultVoice],
    ) -> Result<(), ApiError> {
        self.call(
            "answerInlineQuery",
            &json!({
                "inline_query_id": inline_query_id,
                "results": results,
            }),
        )
        .await
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ApiError> {
        self.call(
            "sendMessage",
            &json!({
                "chat_id": chat_id,
                "text": text,
            }),
        )
        .await
    }
}
