//! KnowledgeSource domain entity produced by the knowledge fetcher.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial KnowledgeSource/MediaType definitions.

/// The media type a knowledge URL resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum MediaType {
    Web,
    Pdf,
    Text,
}

/// A fetched and normalized knowledge source.
///
/// If `error` is non-null, `content` is empty and the source represents a
/// non-fatal per-URL failure; the pipeline continues without it.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::knowledge_source::{KnowledgeSource, MediaType};
///
/// let source = KnowledgeSource {
///     url: std::string::String::from("https://example.com/doc"),
///     title: std::string::String::from("Example Doc"),
///     content: std::string::String::from("Some content."),
///     media_type: MediaType::Web,
///     error: None,
/// };
/// assert!(source.error.is_none());
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct KnowledgeSource {
    pub url: std::string::String,
    pub title: std::string::String,
    pub content: std::string::String,
    pub media_type: MediaType,
    pub error: std::option::Option<std::string::String>,
}

impl KnowledgeSource {
    /// Constructs a failed source for a URL, recording the error message.
    pub fn failed(url: impl Into<std::string::String>, error: impl Into<std::string::String>) -> Self {
        KnowledgeSource {
            url: url.into(),
            title: std::string::String::new(),
            content: std::string::String::new(),
            media_type: MediaType::Text,
            error: std::option::Option::Some(error.into()),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.error.is_none() && !self.content.is_empty()
    }
}
