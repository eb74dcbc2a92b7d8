//! Sentence domain entity produced by the transcript normalizer.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial Sentence/SpeakerRole definitions.

/// The role attributed to the speaker of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum SpeakerRole {
    Instructor,
    Participant,
    Unknown,
}

/// One sentence extracted from a raw transcript by the normalizer.
///
/// `id` is monotonic from 0 and dense: normalizer output always has
/// `sentences[i].id == i`. Sentences are immutable once produced.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::sentence::{Sentence, SpeakerRole};
///
/// let s = Sentence {
///     id: 0,
///     text: std::string::String::from("Let's configure the server."),
///     timestamp_seconds: None,
///     speaker_role: SpeakerRole::Instructor,
///     is_question: false,
///     is_transition: false,
///     emphasis_score: 0.0,
/// };
/// assert_eq!(s.id, 0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct Sentence {
    pub id: usize,
    pub text: std::string::String,
    pub timestamp_seconds: std::option::Option<f64>,
    pub speaker_role: SpeakerRole,
    pub is_question: bool,
    pub is_transition: bool,
    pub emphasis_score: f64,
}

impl Sentence {
    /// Returns the sentence text tokenized as lowercased word tokens, used
    /// by lexical scoring (Jaccard overlap, strong/weak verb checks).
    pub fn tokens(&self) -> std::vec::Vec<std::string::String> {
        crate::util::tokenize(&self.text)
    }
}
