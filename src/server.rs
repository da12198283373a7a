//! Webhook HTTP server
//!
//! One POST route accepts Telegram update payloads; every other request is
//! answered with a bare `OK`, which doubles as the health check.

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::bot::{self, dispatch};
use crate::cache::LibraryCache;
use crate::telegram::{InboundUpdate, PlatformApi, Update};

/// Body answered when processing finished (or was skipped) cleanly.
const OK_BODY: &str = "OK";
/// Body answered when the platform call failed. Status stays 200 so
/// Telegram does not redeliver the update.
const TG_ERROR_BODY: &str = "TG Error!";

/// Shared handles available to the webhook handler.
#[derive(Clone)]
pub struct AppState {
    /// Platform API client executing outbound actions
    pub api: Arc<dyn PlatformApi>,
    /// Shared voice library cache
    pub cache: Arc<LibraryCache>,
    /// Chat ID of the administrator
    pub admin_chat_id: i64,
}

/// Builds the webhook router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_update))
        .fallback(health)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Unconditional `OK` for anything that is not an update POST.
async fn health() -> &'static str {
    OK_BODY
}

/// Handles one pushed update.
///
/// Malformed payloads are ignored with an `OK`: an error status would only
/// make Telegram redeliver the same payload.
async fn handle_update(State(state): State<AppState>, body: Bytes) -> &'static str {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!("Discarding malformed update payload: {e}");
            return OK_BODY;
        }
    };
    debug!("Handle update: {update:?}");

    let inbound = InboundUpdate::from(update);
    let Some(action) = dispatch::dispatch(inbound, state.admin_chat_id, &state.cache).await else {
        return OK_BODY;
    };

    match bot::execute(state.api.as_ref(), &action).await {
        Ok(()) => OK_BODY,
        Err(e) => {
            error!("Platform call failed: {e}");
            TG_ERROR_BODY
        }
    }
}

/// Serves the router on `addr` until the shutdown future resolves.
///
/// # Errors
///
/// Returns the bind or serve error of the underlying listener.
pub async fn run(
    addr: &str,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Webhook server listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
