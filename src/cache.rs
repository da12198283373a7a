//! Remote voice library cache
//!
//! Memoizes the remote JSON library document, refreshing when a
//! time-to-live expires or a forced reload is requested. The clock and the
//! fetch step are injected so tests run against fakes instead of the
//! network.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::FETCH_USER_AGENT;
use crate::library::AudioLibrary;

/// Errors raised while refreshing the library from its remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The document could not be retrieved
    #[error("library fetch failed: {0}")]
    Network(String),
    /// The document body did not decode as a library listing
    #[error("library document invalid: {0}")]
    Decode(String),
}

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> Instant;
}

/// Clock backed by the system monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// One attempt at retrieving the library document.
///
/// A single call per refresh: retrying is left to the caller or to the
/// next inbound update.
#[async_trait]
pub trait LibraryFetcher: Send + Sync {
    /// Fetches and decodes the remote library document
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the document is unreachable or unparsable.
    async fn fetch(&self) -> Result<AudioLibrary, FetchError>;
}

/// Library and fetch instant; always replaced together.
#[derive(Debug, Default)]
struct CacheState {
    library: Option<AudioLibrary>,
    fetched_at: Option<Instant>,
}

/// Time-bounded cache over the remote voice library.
///
/// Constructed once per process and shared by `Arc`. The state lock is
/// held across a refresh, so concurrent callers wait for the in-flight
/// fetch and then read its result instead of duplicating it.
pub struct LibraryCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    fetcher: Arc<dyn LibraryFetcher>,
}

impl LibraryCache {
    /// Creates an empty cache; the first `get` populates it.
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>, fetcher: Arc<dyn LibraryFetcher>) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl,
            clock,
            fetcher,
        }
    }

    /// Returns the current library, refreshing it when forced, never
    /// loaded, or older than the TTL.
    ///
    /// A failed refresh leaves the previously cached library in place:
    /// stale-but-available beats empty. Use [`Self::last_known`] to read
    /// that stale copy after an error.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the refresh attempt fails.
    pub async fn get(&self, force: bool) -> Result<AudioLibrary, FetchError> {
        let mut state = self.state.lock().await;

        if !force {
            if let (Some(library), Some(fetched_at)) = (&state.library, state.fetched_at) {
                if self.clock.now().duration_since(fetched_at) <= self.ttl {
                    return Ok(library.clone());
                }
            }
        }

        info!("Refreshing voice library (force: {force})");
        let library = self.fetcher.fetch().await?;
        debug!("Loaded {} voice clips", library.len());

        state.library = Some(library.clone());
        state.fetched_at = Some(self.clock.now());
        Ok(library)
    }

    /// Returns the last successfully loaded library, however stale.
    pub async fn last_known(&self) -> Option<AudioLibrary> {
        self.state.lock().await.library.clone()
    }
}

/// Fetcher that retrieves the library document over HTTP.
pub struct HttpLibraryFetcher {
    http: HttpClient,
    url: String,
}

impl HttpLibraryFetcher {
    /// Creates a fetcher for the given document URL.
    #[must_use]
    pub fn new(url: String) -> Self {
        let http = HttpClient::builder()
            .user_agent(FETCH_USER_AGENT)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self { http, url }
    }
}

#[async_trait]
impl LibraryFetcher for HttpLibraryFetcher {
    async fn fetch(&self) -> Result<AudioLibrary, FetchError> {
        info!("Get voices: {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.without_url().to_string()))
    }
}
