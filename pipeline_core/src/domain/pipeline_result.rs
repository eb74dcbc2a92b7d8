//! PipelineResult domain entity: the final output of a pipeline invocation.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial PipelineResult/PipelineStats definitions.

/// Aggregate statistics describing a completed pipeline run.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct PipelineStats {
    pub chunks_considered: usize,
    pub chunks_retained: usize,
    pub drafts_generated: usize,
    pub drafts_generation_failed: usize,
    pub steps_accepted: usize,
    pub steps_rejected: usize,
    pub average_confidence: f64,
    pub high_confidence_count: usize,
    /// Fraction of fetched knowledge sources cited by at least one accepted step.
    pub knowledge_usage_rate: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub stage_durations_ms: std::collections::BTreeMap<std::string::String, u64>,
}

/// The final, released output of one pipeline invocation.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::pipeline_result::{PipelineResult, PipelineStats};
///
/// let result = PipelineResult {
///     steps: vec![],
///     stats: PipelineStats::default(),
///     knowledge_sources: vec![],
/// };
/// assert!(result.steps.is_empty());
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct PipelineResult {
    /// Accepted steps, ordered by originating chunk order.
    pub steps: std::vec::Vec<crate::domain::validated_step::ValidatedStep>,
    pub stats: PipelineStats,
    pub knowledge_sources: std::vec::Vec<crate::domain::knowledge_source::KnowledgeSource>,
}
