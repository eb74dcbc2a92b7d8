//! SourceRef domain entity attached to a step by the source binder.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial SourceRef/SourceKind definitions.

/// The kind of evidence a `SourceRef` points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum SourceKind {
    Transcript,
    Knowledge,
}

/// A reference from a validated step back to the transcript sentence or
/// knowledge excerpt that grounds it.
///
/// A `SourceRef` identifies its target by `sentence_id` (transcript) or
/// `url` (knowledge), never by pointer, so steps and sources never form a
/// reference cycle.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::source_ref::{SourceKind, SourceRef};
///
/// let reference = SourceRef {
///     kind: SourceKind::Transcript,
///     excerpt_text: std::string::String::from("Configure the server first."),
///     sentence_id: Some(3),
///     url: None,
///     match_score: 0.62,
/// };
/// assert_eq!(reference.kind, SourceKind::Transcript);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub excerpt_text: std::string::String,
    pub sentence_id: std::option::Option<usize>,
    pub url: std::option::Option<std::string::String>,
    pub match_score: f64,
}
