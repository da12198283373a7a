//! Telegram wire types and Bot API client

/// HTTP client for the Bot API methods the bot uses
pub mod api;
/// Update payloads and inline result types
pub mod types;

pub use api::{ApiError, TelegramApi};
pub use types::{InboundUpdate, InlineQueryResultVoice, Update, Voice};

use async_trait::async_trait;

/// Outbound surface of the Telegram Bot API used by the dispatcher.
///
/// Implemented by [`TelegramApi`] over HTTP and by recording fakes in
/// tests.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Answers an inline query with voice results
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call does not complete with `ok=true`.
    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: &[InlineQueryResultVoice],
    ) -> Result<(), ApiError>;

    /// Sends a plain text message to a chat
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call does not complete with `ok=true`.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), ApiError>;
}
