//! Maps one inbound update to at most one outbound action
//!
//! The decision step is pure apart from the cache read, so the full
//! behavior is testable without a network in sight.

use tracing::{debug, warn};

use crate::cache::LibraryCache;
use crate::library;
use crate::telegram::{InboundUpdate, InlineQueryResultVoice, Voice};

/// Text command that forces a library refresh.
pub const FLUSH_COMMAND: &str = "/flush";
/// Reply sent to the admin after a successful forced refresh.
pub const FLUSH_OK_TEXT: &str = "✅ Cache flushed";
/// Reply sent to the admin when the forced refresh failed.
pub const FLUSH_FAILED_TEXT: &str = "⚠️ Cache flush failed";

/// Outbound action produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Answer an inline query with voice results
    AnswerInlineQuery {
        /// Query being answered
        inline_query_id: String,
        /// Matched voice clips, source order, capped
        results: Vec<InlineQueryResultVoice>,
    },
    /// Send a plain text reply
    SendMessage {
        /// Destination chat
        chat_id: i64,
        /// Message text
        text: String,
    },
}

/// Decides the outbound action for one classified update.
///
/// Messages from any chat other than `admin_chat_id` are dropped without a
/// reply, whatever they contain.
pub async fn dispatch(
    update: InboundUpdate,
    admin_chat_id: i64,
    cache: &LibraryCache,
) -> Option<Action> {
    match update {
        InboundUpdate::InlineQuery { id, query } => Some(answer_query(id, &query, cache).await),
        InboundUpdate::Message { chat_id, text, voice } => {
            if chat_id != admin_chat_id {
                debug!("Ignoring message from non-admin chat {chat_id}");
                return None;
            }
            handle_admin_message(chat_id, text.as_deref(), voice, cache).await
        }
        InboundUpdate::Other => None,
    }
}

async fn answer_query(inline_query_id: String, query: &str, cache: &LibraryCache) -> Action {
    let library = match cache.get(false).await {
        Ok(library) => library,
        Err(e) => {
            // Stale results beat no results; an empty library covers the
            // cold-start case.
            warn!("Library refresh failed, serving last known state: {e}");
            cache.last_known().await.unwrap_or_default()
        }
    };

    let results = library::search(&library, query)
        .into_iter()
        .map(InlineQueryResultVoice::from_entry)
        .collect();

    Action::AnswerInlineQuery {
        inline_query_id,
        results,
    }
}

async fn handle_admin_message(
    chat_id: i64,
    text: Option<&str>,
    voice: Option<Voice>,
    cache: &LibraryCache,
) -> Option<Action> {
    // A forwarded clip is echoed back as its file_id so the admin can add
    // it to the library document. Checked before the flush command.
    if let Some(voice) = voice {
        return Some(Action::SendMessage {
            chat_id,
            text: format!("file_id: {}", voice.file_id),
        });
    }

    if text == Some(FLUSH_COMMAND) {
        let text = match cache.get(true).await {
            Ok(_) => FLUSH_OK_TEXT.to_string(),
            Err(e) => {
                warn!("Forced library refresh failed: {e}");
                FLUSH_FAILED_TEXT.to_string()
            }
        };
        return Some(Action::SendMessage { chat_id, text });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FetchError, LibraryFetcher, SystemClock};
    use crate::library::{AudioEntry, AudioLibrary};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const ADMIN: i64 = 424_242;

    fn entry(id: &str, title: &str, file_id: &str) -> AudioEntry {
        AudioEntry {
            id: id.to_string(),
            title: title.to_string(),
            file_id: file_id.to_string(),
        }
    }

    fn sample_library() -> AudioLibrary {
        vec![
            entry("1", "Cat Meow", "f1"),
            entry("2", "Dog Bark", "f2"),
        ]
    }

    /// Fetcher returning a fixed library, counting forced refreshes.
    struct StaticFetcher {
        library: AudioLibrary,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(library: AudioLibrary) -> Self {
            Self {
                library,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LibraryFetcher for StaticFetcher {
        async fn fetch(&self) -> Result<AudioLibrary, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.library.clone())
        }
    }

    /// Fetcher that always fails.
    struct BrokenFetcher;

    #[async_trait]
    impl LibraryFetcher for BrokenFetcher {
        async fn fetch(&self) -> Result<AudioLibrary, FetchError> {
            Err(FetchError::Network("unreachable".to_string()))
        }
    }

    /// Fetcher that succeeds once, then keeps failing.
    struct FlakyFetcher {
        library: AudioLibrary,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LibraryFetcher for FlakyFetcher {
        async fn fetch(&self) -> Result<AudioLibrary, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(self.library.clone())
            } else {
                Err(FetchError::Network("gone away".to_string()))
            }
        }
    }

    fn cache_with(fetcher: Arc<dyn LibraryFetcher>) -> LibraryCache {
        LibraryCache::new(Duration::from_secs(3600), Arc::new(SystemClock), fetcher)
    }

    fn inline(id: &str, query: &str) -> InboundUpdate {
        InboundUpdate::InlineQuery {
            id: id.to_string(),
            query: query.to_string(),
        }
    }

    fn message(chat_id: i64, text: Option<&str>, voice_file_id: Option<&str>) -> InboundUpdate {
        InboundUpdate::Message {
            chat_id,
            text: text.map(ToString::to_string),
            voice: voice_file_id.map(|file_id| Voice {
                file_id: file_id.to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_inline_query_filters_by_title() {
        let cache = cache_with(Arc::new(StaticFetcher::new(sample_library())));

        let action = dispatch(inline("q1", "bark"), ADMIN, &cache).await;

        assert_eq!(
            action,
            Some(Action::AnswerInlineQuery {
                inline_query_id: "q1".to_string(),
                results: vec![InlineQueryResultVoice {
                    result_type: "voice".to_string(),
                    id: "2".to_string(),
                    title: "Dog Bark".to_string(),
                    voice_file_id: "f2".to_string(),
                }],
            })
        );
    }

    #[tokio::test]
    async fn test_inline_empty_query_lists_library_head() {
        let cache = cache_with(Arc::new(StaticFetcher::new(sample_library())));

        let Some(Action::AnswerInlineQuery { results, .. }) =
            dispatch(inline("q2", ""), ADMIN, &cache).await
        else {
            panic!("expected an inline answer");
        };

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "1");
        assert_eq!(results[1].id, "2");
    }

    #[tokio::test]
    async fn test_inline_query_with_cold_broken_fetch_answers_empty() {
        let cache = cache_with(Arc::new(BrokenFetcher));

        let Some(Action::AnswerInlineQuery { results, .. }) =
            dispatch(inline("q3", "bark"), ADMIN, &cache).await
        else {
            panic!("expected an inline answer");
        };

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_inline_query_serves_stale_library_after_failed_refresh() {
        let fetcher = Arc::new(FlakyFetcher {
            library: sample_library(),
            calls: AtomicUsize::new(0),
        });
        // Zero TTL: every inline query attempts a refresh
        let cache = LibraryCache::new(Duration::ZERO, Arc::new(SystemClock), fetcher);

        dispatch(inline("q1", "bark"), ADMIN, &cache).await;
        let Some(Action::AnswerInlineQuery { results, .. }) =
            dispatch(inline("q2", "bark"), ADMIN, &cache).await
        else {
            panic!("expected an inline answer");
        };

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");
    }

    #[tokio::test]
    async fn test_non_admin_messages_are_dropped() {
        let fetcher = Arc::new(StaticFetcher::new(sample_library()));
        let cache = cache_with(fetcher.clone());

        let voice = dispatch(message(1, None, Some("AbC123")), ADMIN, &cache).await;
        let flush = dispatch(message(1, Some(FLUSH_COMMAND), None), ADMIN, &cache).await;
        let text = dispatch(message(1, Some("hello"), None), ADMIN, &cache).await;

        assert_eq!(voice, None);
        assert_eq!(flush, None);
        assert_eq!(text, None);
        // The flush attempt from a stranger must not have touched the cache
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_admin_voice_message_echoes_file_id() {
        let cache = cache_with(Arc::new(StaticFetcher::new(sample_library())));

        let action = dispatch(message(ADMIN, None, Some("AbC123")), ADMIN, &cache).await;

        assert_eq!(
            action,
            Some(Action::SendMessage {
                chat_id: ADMIN,
                text: "file_id: AbC123".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_admin_voice_wins_over_flush_caption() {
        let cache = cache_with(Arc::new(StaticFetcher::new(sample_library())));

        let action =
            dispatch(message(ADMIN, Some(FLUSH_COMMAND), Some("AbC123")), ADMIN, &cache).await;

        assert_eq!(
            action,
            Some(Action::SendMessage {
                chat_id: ADMIN,
                text: "file_id: AbC123".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_admin_flush_forces_refresh_and_confirms() {
        let fetcher = Arc::new(StaticFetcher::new(sample_library()));
        let cache = cache_with(fetcher.clone());

        // Populate within TTL; only a forced refresh fetches again
        cache.get(false).await.expect("initial load");

        let action = dispatch(message(ADMIN, Some(FLUSH_COMMAND), None), ADMIN, &cache).await;

        assert_eq!(
            action,
            Some(Action::SendMessage {
                chat_id: ADMIN,
                text: FLUSH_OK_TEXT.to_string(),
            })
        );
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_admin_flush_reports_failed_refresh() {
        let cache = cache_with(Arc::new(BrokenFetcher));

        let action = dispatch(message(ADMIN, Some(FLUSH_COMMAND), None), ADMIN, &cache).await;

        assert_eq!(
            action,
            Some(Action::SendMessage {
                chat_id: ADMIN,
                text: FLUSH_FAILED_TEXT.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_admin_plain_text_gets_no_reply() {
        let cache = cache_with(Arc::new(StaticFetcher::new(sample_library())));

        let action = dispatch(message(ADMIN, Some("hello there"), None), ADMIN, &cache).await;

        assert_eq!(action, None);
    }

    #[tokio::test]
    async fn test_other_updates_get_no_action() {
        let cache = cache_with(Arc::new(StaticFetcher::new(sample_library())));

        assert_eq!(dispatch(InboundUpdate::Other, ADMIN, &cache).await, None);
    }
}
