//! Configuration and settings management
//!
//! Loads settings from environment variables and defines service constants.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// Chat ID of the administrator, as provided by the environment
    #[serde(rename = "admin_chat_id")]
    pub admin_chat_id_str: String,

    /// URL of the remote JSON document describing the voice library
    pub audio_config_url: String,
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use voiceline::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            // Add in the current environment file
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked into git
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from environment variables directly
            // Note: Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }

    /// Returns the admin chat ID, if the configured value is numeric
    #[must_use]
    pub fn admin_chat_id(&self) -> Option<i64> {
        self.admin_chat_id_str.trim().parse().ok()
    }
}

/// Time-to-live (seconds) for the cached voice library.
/// Default: 1 hour.
pub const CACHE_TTL_SECS: u64 = 3600;
/// Maximum number of results returned for one inline query.
pub const MAX_INLINE_RESULTS: usize = 50;
/// User agent sent when fetching the remote library document.
pub const FETCH_USER_AGENT: &str = "voiceline-bot";
/// Default host the webhook server binds to.
pub const BIND_HOST: &str = "0.0.0.0";
/// Default port the webhook server binds to.
pub const BIND_PORT: u16 = 8080;

/// Get the library cache TTL from env or default.
///
/// Environment variable: `CACHE_TTL_SECS`.
#[must_use]
pub fn get_cache_ttl_secs() -> u64 {
    std::env::var("CACHE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(CACHE_TTL_SECS)
}

/// Get the webhook bind host from env or default.
///
/// Environment variable: `BIND_HOST`.
#[must_use]
pub fn get_bind_host() -> String {
    std::env::var("BIND_HOST")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| BIND_HOST.to_string())
}

/// Get the webhook bind port from env or default.
///
/// Environment variable: `BIND_PORT`.
#[must_use]
pub fn get_bind_port() -> u16 {
    std::env::var("BIND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(BIND_PORT)
}
