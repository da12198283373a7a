//! Voice clip data model and title search
//!
//! The library is loaded verbatim from a remote JSON document and kept in
//! source order: the empty-query listing answers with a prefix of it.

use serde::{Deserialize, Serialize};

use crate::config::MAX_INLINE_RESULTS;

/// One addressable voice clip from the remote library document.
///
/// Immutable once loaded; `id` is the identity and is assumed unique
/// within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioEntry {
    /// Stable identifier of the clip within the library
    pub id: String,
    /// Human-readable title matched against inline queries
    pub title: String,
    /// Telegram file identifier of the uploaded voice recording
    pub file_id: String,
}

/// The voice library in source-document order.
pub type AudioLibrary = Vec<AudioEntry>;

/// Selects the entries answering one inline query.
///
/// An empty query lists the head of the library; anything else keeps the
/// entries whose title contains the query case-insensitively. Source order
/// is preserved and at most [`MAX_INLINE_RESULTS`] entries are returned.
#[must_use]
pub fn search<'a>(library: &'a [AudioEntry], query: &str) -> Vec<&'a AudioEntry> {
    let query = query.to_lowercase();
    library
        .iter()
        .filter(|entry| query.is_empty() || entry.title.to_lowercase().contains(&query))
        .take(MAX_INLINE_RESULTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str) -> AudioEntry {
        AudioEntry {
            id: id.to_string(),
            title: title.to_string(),
            file_id: format!("f{id}"),
        }
    }

    #[test]
    fn test_empty_query_returns_prefix_in_order() {
        let library = vec![entry("1", "Cat Meow"), entry("2", "Dog Bark"), entry("3", "Owl Hoot")];

        let results = search(&library, "");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "1");
        assert_eq!(results[1].id, "2");
        assert_eq!(results[2].id, "3");
    }

    #[test]
    fn test_empty_query_caps_at_result_limit() {
        let library: AudioLibrary = (0..MAX_INLINE_RESULTS + 10)
            .map(|i| entry(&i.to_string(), &format!("Clip {i}")))
            .collect();

        let results = search(&library, "");

        assert_eq!(results.len(), MAX_INLINE_RESULTS);
        assert_eq!(results[0].id, "0");
        assert_eq!(results[MAX_INLINE_RESULTS - 1].id, (MAX_INLINE_RESULTS - 1).to_string());
    }

    #[test]
    fn test_query_matches_substring_case_insensitively() {
        let library = vec![entry("1", "Cat Meow"), entry("2", "Dog Bark"), entry("3", "Barking Mad")];

        let results = search(&library, "BARK");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "2");
        assert_eq!(results[1].id, "3");
        for found in &results {
            assert!(found.title.to_lowercase().contains("bark"));
        }
    }

    #[test]
    fn test_query_results_keep_source_order_and_cap() {
        let library: AudioLibrary = (0..MAX_INLINE_RESULTS * 2)
            .map(|i| entry(&i.to_string(), &format!("Bark {i}")))
            .collect();

        let results = search(&library, "bark");

        assert_eq!(results.len(), MAX_INLINE_RESULTS);
        // Nothing ranked past the cap may displace an earlier match
        assert_eq!(results[0].id, "0");
        assert_eq!(results[MAX_INLINE_RESULTS - 1].id, (MAX_INLINE_RESULTS - 1).to_string());
    }

    #[test]
    fn test_query_without_matches_returns_nothing() {
        let library = vec![entry("1", "Cat Meow")];

        assert!(search(&library, "bark").is_empty());
        assert!(search(&[], "").is_empty());
    }
}
