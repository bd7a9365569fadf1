//! Data models for scraped opinion articles.
//!
//! The pipeline carries a single record type, [`Article`], from extraction
//! through translation to the final report. Translation annotates the record
//! in place; nothing downstream mutates it.

use serde::{Deserialize, Serialize};

/// Placeholder stored in [`Article::content`] when the listing shows no
/// snippet for an article. Content absence never drops an article.
pub const SENTINEL_CONTENT: &str = "Content not found";

/// One scraped opinion article.
///
/// Invariants:
/// - `title` is always non-empty; extraction skips any container whose
///   title cannot be located.
/// - `content` is always present: either real snippet text or
///   [`SENTINEL_CONTENT`].
/// - `translated_title` is `Some` if and only if the translation request
///   for this specific article succeeded.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    /// Headline text as rendered on the section listing.
    pub title: String,
    /// Snippet text, or [`SENTINEL_CONTENT`] when the listing has none.
    pub content: String,
    /// English headline, populated by the translator on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_title: Option<String>,
}

impl Article {
    /// Build a fresh, untranslated article. An empty or whitespace-only
    /// `content` collapses to the sentinel so the content invariant holds
    /// from construction onward.
    pub fn new(title: String, content: String) -> Self {
        let content = if content.trim().is_empty() {
            SENTINEL_CONTENT.to_string()
        } else {
            content
        };
        Self {
            title,
            content,
            translated_title: None,
        }
    }

    /// Translated headline for display, with the reference fallback text
    /// when translation did not happen for this article.
    pub fn translated_or_fallback(&self) -> &str {
        self.translated_title
            .as_deref()
            .unwrap_or("No translation available")
    }
}
