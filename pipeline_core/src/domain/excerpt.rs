//! Excerpt domain entity materialized during semantic search.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial Excerpt definition.

/// A short, word-aligned substring of a knowledge source's content, used
/// as retrieval context for step generation. Excerpts are materialized on
/// demand during the semantic search stage and are not persisted across
/// jobs.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::excerpt::Excerpt;
///
/// let excerpt = Excerpt {
///     source_url: std::string::String::from("https://example.com/doc"),
///     source_title: std::string::String::from("Example Doc"),
///     text: std::string::String::from("relevant passage"),
///     offset: 0,
/// };
/// assert_eq!(excerpt.offset, 0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct Excerpt {
    /// URL of the `KnowledgeSource` this excerpt was drawn from.
    pub source_url: std::string::String,
    /// Title of the source, carried for prompt composition.
    pub source_title: std::string::String,
    pub text: std::string::String,
    /// Character offset of `text` within the source's normalized content.
    pub offset: usize,
}

/// An excerpt together with its relevance score against a chunk.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct ScoredExcerpt {
    pub excerpt: Excerpt,
    pub score: f64,
}
