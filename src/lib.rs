//! Voiceline — inline Telegram bot for a curated voice clip library.
//!
//! Receives webhook updates over HTTP, answers inline searches from a
//! cached remote JSON library, and echoes voice `file_id`s back to the
//! administrator so new clips can be added to the library document.

/// Update dispatch and outbound actions
pub mod bot;
/// Remote voice library cache
pub mod cache;
/// Configuration and settings management
pub mod config;
/// Voice clip data model and title search
pub mod library;
/// Webhook HTTP server
pub mod server;
/// Telegram wire types and Bot API client
pub mod telegram;
