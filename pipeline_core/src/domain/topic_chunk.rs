//! TopicChunk domain entity produced by the segmenter and scored by the ranker.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial TopicChunk/ChunkClassification definitions.

/// The classification assigned to a chunk by the filter/ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum ChunkClassification {
    Instructional,
    QaSubstantive,
    QaClarification,
    Administrative,
}

/// A contiguous, ordered range of sentences forming one coherent topic.
///
/// `sentence_ids` is always ordered and contiguous. `importance` and
/// `classification` start at their "unset" defaults (0.0 /
/// `Instructional`) when produced by the segmenter and are overwritten by
/// the filter/ranker stage.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::topic_chunk::{ChunkClassification, TopicChunk};
///
/// let chunk = TopicChunk {
///     id: 0,
///     sentence_ids: vec![0, 1, 2],
///     text: std::string::String::from("Sentence one. Sentence two. Sentence three."),
///     qa_density: 0.0,
///     importance: 0.0,
///     classification: ChunkClassification::Instructional,
/// };
/// assert_eq!(chunk.sentence_ids.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct TopicChunk {
    pub id: usize,
    pub sentence_ids: std::vec::Vec<usize>,
    pub text: std::string::String,
    pub qa_density: f64,
    pub importance: f64,
    pub classification: ChunkClassification,
}

impl TopicChunk {
    pub fn len(&self) -> usize {
        self.sentence_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentence_ids.is_empty()
    }
}
