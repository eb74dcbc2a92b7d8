//! Domain entities owned by a single pipeline invocation.
//!
//! Every entity here lives for the duration of one job and is released at
//! completion; nothing is persisted across jobs by the core itself.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial domain module layout.

pub mod sentence;
pub mod knowledge_source;
pub mod excerpt;
pub mod topic_chunk;
pub mod step_draft;
pub mod source_ref;
pub mod validated_step;
pub mod pipeline_result;

pub use sentence::{Sentence, SpeakerRole};
pub use knowledge_source::{KnowledgeSource, MediaType};
pub use excerpt::Excerpt;
pub use topic_chunk::{ChunkClassification, TopicChunk};
pub use step_draft::StepDraft;
pub use source_ref::{SourceKind, SourceRef};
pub use validated_step::{QualityLevel, ValidatedStep};
pub use pipeline_result::{PipelineResult, PipelineStats};
