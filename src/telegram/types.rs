//! Telegram update payloads and inline result types
//!
//! Only the fields this bot acts on are modelled; everything else in an
//! update payload is ignored by deserialization.

use serde::{Deserialize, Serialize};

use crate::library::AudioEntry;

/// Incoming update pushed by Telegram to the webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    /// Inline search issued by any user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_query: Option<InlineQuery>,
    /// Direct message to the bot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// Search-as-you-type request from an inline client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineQuery {
    /// Identifier used to answer this query
    pub id: String,
    /// Raw query text, possibly empty
    pub query: String,
}

/// Direct message payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Chat the message was sent in
    pub chat: Chat,
    /// Text content, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Voice recording attachment, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
}

/// Chat a message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Numeric chat identifier; equals the user ID in private chats
    pub id: i64,
}

/// Voice recording attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Platform-assigned identifier of the uploaded recording
    pub file_id: String,
}

/// Classified inbound update; exactly one variant is acted on per payload.
#[derive(Debug, Clone)]
pub enum InboundUpdate {
    /// Inline search from any user
    InlineQuery {
        /// Identifier used to answer the query
        id: String,
        /// Raw query text
        query: String,
    },
    /// Direct message, subject to the admin gate
    Message {
        /// Chat to reply into; equals the sender in private chats, so it
        /// doubles as the authorization subject
        chat_id: i64,
        /// Message text, if any
        text: Option<String>,
        /// Voice attachment, if any
        voice: Option<Voice>,
    },
    /// Anything the bot does not act on
    Other,
}

impl From<Update> for InboundUpdate {
    /// `inline_query` wins over `message` when both are present.
    fn from(update: Update) -> Self {
        if let Some(inline_query) = update.inline_query {
            return Self::InlineQuery {
                id: inline_query.id,
                query: inline_query.query,
            };
        }
        if let Some(message) = update.message {
            return Self::Message {
                chat_id: message.chat.id,
                text: message.text,
                voice: message.voice,
            };
        }
        Self::Other
    }
}

/// One `answerInlineQuery` result referencing an uploaded voice clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineQueryResultVoice {
    /// Always `"voice"`
    #[serde(rename = "type")]
    pub result_type: String,
    /// Result identifier, taken from the library entry id
    pub id: String,
    /// Title shown in the result list
    pub title: String,
    /// Telegram file identifier of the voice recording
    pub voice_file_id: String,
}

impl InlineQueryResultVoice {
    /// Builds the inline result for one library entry.
    #[must_use]
    pub fn from_entry(entry: &AudioEntry) -> Self {
        Self {
            result_type: "voice".to_string(),
            id: entry.id.clone(),
            title: entry.title.clone(),
            voice_file_id: entry.file_id.clone(),
        }
    }
}
