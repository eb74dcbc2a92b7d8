//! Progress sink port: a caller-supplied, non-blocking callback notified at
//! stage transitions and per-chunk generation completions.
//!
//! Per the redesign notes, stage identifiers are a closed tagged set rather
//! than strings synthesized ad hoc (e.g. `format!("step-{}", n)`), paired
//! with a structured `current_step`/`total_steps`/`detail` triple so
//! per-chunk progress doesn't require new stage names.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial ProgressSinkPort trait and PipelineStage enum.

/// The closed set of pipeline stages a progress event may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum PipelineStage {
    Normalizing,
    FetchingKnowledge,
    Segmenting,
    FilteringRanking,
    SelectingExcerpts,
    GeneratingSteps,
    BindingSources,
    Validating,
    Assembling,
}

impl PipelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::FetchingKnowledge => "fetching_knowledge",
            PipelineStage::Segmenting => "segmenting",
            PipelineStage::FilteringRanking => "filtering_ranking",
            PipelineStage::SelectingExcerpts => "selecting_excerpts",
            PipelineStage::GeneratingSteps => "generating_steps",
            PipelineStage::BindingSources => "binding_sources",
            PipelineStage::Validating => "validating",
            PipelineStage::Assembling => "assembling",
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StageEvent {
    pub stage: PipelineStage,
    /// Overall job completion fraction in `[0, 1]`, monotonically
    /// non-decreasing across the lifetime of one invocation.
    pub fraction: f64,
    /// 1-based index of the current unit of work within the stage (e.g.
    /// which chunk is being generated), when applicable.
    pub current_step: std::option::Option<usize>,
    /// Total units of work within the stage, when applicable.
    pub total_steps: std::option::Option<usize>,
    pub detail: std::option::Option<std::string::String>,
}

/// Port for the caller-supplied progress callback.
///
/// Implementations must not block; the pipeline does not await this call.
pub trait ProgressSinkPort: std::marker::Send + std::marker::Sync {
    fn on_progress(&self, event: StageEvent);
}

/// A progress sink that discards every event, used by callers that do not
/// need progress reporting (and in tests).
#[derive(Debug, Clone, Default)]
pub struct NullProgressSink;

impl ProgressSinkPort for NullProgressSink {
    fn on_progress(&self, _event: StageEvent) {}
}
