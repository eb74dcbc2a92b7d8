//! StepDraft domain entity produced by the step generator.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial StepDraft definition.

/// One training step, as produced by the step generator from a single
/// chunk. Immutable once produced.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::step_draft::StepDraft;
///
/// let draft = StepDraft {
///     chunk_id: 0,
///     title: std::string::String::from("Configure the deployment pipeline"),
///     overview: std::string::String::from("This step covers pipeline setup."),
///     content: std::string::String::from("Detailed content goes here."),
///     actions: vec![std::string::String::from("Configure the service")],
/// };
/// assert_eq!(draft.actions.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct StepDraft {
    /// The id of the `TopicChunk` this draft was generated from.
    pub chunk_id: usize,
    pub title: std::string::String,
    pub overview: std::string::String,
    pub content: std::string::String,
    pub actions: std::vec::Vec<std::string::String>,
}

impl StepDraft {
    /// Word count of `content`, used by the validator's content-length gate.
    pub fn content_word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// All text surfaces of the draft, concatenated for tokenization /
    /// embedding against transcript sentences in the source binder.
    pub fn combined_text(&self) -> std::string::String {
        std::format!(
            "{} {} {} {}",
            self.title,
            self.overview,
            self.content,
            self.actions.join(" ")
        )
    }
}
