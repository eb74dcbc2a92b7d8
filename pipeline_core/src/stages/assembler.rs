//! Result assembler: orders accepted steps by chunk id, computes aggregate
//! statistics, and releases the final `PipelineResult`.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial assembler implementation.

/// Inputs collected across the run that the assembler folds into
/// `PipelineStats`, kept together so the `assemble` signature stays
/// manageable as the pipeline grows additional counters.
pub struct AssemblyInput {
    pub validated_steps: std::vec::Vec<crate::domain::validated_step::ValidatedStep>,
    pub knowledge_sources: std::vec::Vec<crate::domain::knowledge_source::KnowledgeSource>,
    pub chunks_considered: usize,
    pub chunks_retained: usize,
    pub drafts_generation_failed: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub stage_durations_ms: std::collections::BTreeMap<std::string::String, u64>,
}

/// Assembles the final `PipelineResult`.
///
/// Fails with `PipelineError::NoValidSteps` if zero steps were accepted,
/// aggregating rejection reasons across every rejected draft.
pub fn assemble(
    input: AssemblyInput,
) -> crate::error::PipelineResult<crate::domain::pipeline_result::PipelineResult> {
    let mut validated_steps = input.validated_steps;
    validated_steps.sort_by_key(|step| step.draft.chunk_id);

    let accepted: std::vec::Vec<crate::domain::validated_step::ValidatedStep> =
        validated_steps.iter().filter(|s| s.accepted).cloned().collect();

    if accepted.is_empty() {
        let mut rejection_counts: std::collections::BTreeMap<std::string::String, usize> = std::collections::BTreeMap::new();
        for step in &validated_steps {
            for reason in &step.rejection_reasons {
                *rejection_counts.entry(reason.clone()).or_insert(0) += 1;
            }
        }
        return std::result::Result::Err(crate::error::PipelineError::no_valid_steps(&rejection_counts));
    }

    let steps_accepted = accepted.len();
    let steps_rejected = validated_steps.len() - steps_accepted;

    let average_confidence = accepted.iter().map(|s| s.confidence).sum::<f64>() / steps_accepted as f64;
    let high_confidence_count = accepted
        .iter()
        .filter(|s| s.quality_level >= crate::domain::validated_step::QualityLevel::High)
        .count();

    let cited_urls: std::collections::HashSet<&str> = accepted
        .iter()
        .flat_map(|s| s.sources.iter())
        .filter_map(|source_ref| source_ref.url.as_deref())
        .collect();
    let knowledge_usage_rate = if input.knowledge_sources.is_empty() {
        0.0
    } else {
        cited_urls.len() as f64 / input.knowledge_sources.len() as f64
    };

    let stats = crate::domain::pipeline_result::PipelineStats {
        chunks_considered: input.chunks_considered,
        chunks_retained: input.chunks_retained,
        drafts_generated: validated_steps.len(),
        drafts_generation_failed: input.drafts_generation_failed,
        steps_accepted,
        steps_rejected,
        average_confidence,
        high_confidence_count,
        knowledge_usage_rate,
        input_tokens: input.input_tokens,
        output_tokens: input.output_tokens,
        stage_durations_ms: input.stage_durations_ms,
    };

    std::result::Result::Ok(crate::domain::pipeline_result::PipelineResult {
        steps: accepted,
        stats,
        knowledge_sources: input.knowledge_sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_source::{KnowledgeSource, MediaType};
    use crate::domain::source_ref::{SourceKind, SourceRef};
    use crate::domain::step_draft::StepDraft;
    use crate::domain::validated_step::{QualityLevel, ValidatedStep};

    fn make_step(chunk_id: usize, accepted: bool, confidence: f64, url: std::option::Option<&str>) -> ValidatedStep {
        ValidatedStep {
            draft: StepDraft {
                chunk_id,
                title: std::string::String::from("Configure the service"),
                overview: std::string::String::new(),
                content: std::string::String::new(),
                actions: vec![],
            },
            sources: match url {
                std::option::Option::Some(u) => vec![SourceRef {
                    kind: SourceKind::Knowledge,
                    excerpt_text: std::string::String::new(),
                    sentence_id: std::option::Option::None,
                    url: std::option::Option::Some(u.to_string()),
                    match_score: 0.5,
                }],
                std::option::Option::None => vec![],
            },
            confidence,
            quality_level: QualityLevel::from_confidence(confidence),
            accepted,
            rejection_reasons: if accepted { vec![] } else { vec![std::string::String::from("confidence too low")] },
        }
    }

    #[test]
    fn test_zero_accepted_steps_fails() {
        let input = AssemblyInput {
            validated_steps: vec![make_step(0, false, 0.1, None)],
            knowledge_sources: vec![],
            chunks_considered: 1,
            chunks_retained: 1,
            drafts_generation_failed: 0,
            input_tokens: 0,
            output_tokens: 0,
            stage_durations_ms: std::collections::BTreeMap::new(),
        };
        assert!(assemble(input).is_err());
    }

    #[test]
    fn test_accepted_steps_ordered_by_chunk_id() {
        let input = AssemblyInput {
            validated_steps: vec![make_step(2, true, 0.6, None), make_step(0, true, 0.7, None)],
            knowledge_sources: vec![],
            chunks_considered: 2,
            chunks_retained: 2,
            drafts_generation_failed: 0,
            input_tokens: 100,
            output_tokens: 200,
            stage_durations_ms: std::collections::BTreeMap::new(),
        };
        let result = assemble(input).unwrap();
        assert_eq!(result.steps[0].draft.chunk_id, 0);
        assert_eq!(result.steps[1].draft.chunk_id, 2);
    }

    #[test]
    fn test_knowledge_usage_rate_computed() {
        let sources = vec![
            KnowledgeSource { url: std::string::String::from("https://a.example"), title: std::string::String::new(), content: std::string::String::from("x"), media_type: MediaType::Text, error: std::option::Option::None },
            KnowledgeSource { url: std::string::String::from("https://b.example"), title: std::string::String::new(), content: std::string::String::from("y"), media_type: MediaType::Text, error: std::option::Option::None },
        ];
        let input = AssemblyInput {
            validated_steps: vec![make_step(0, true, 0.6, std::option::Option::Some("https://a.example"))],
            knowledge_sources: sources,
            chunks_considered: 1,
            chunks_retained: 1,
            drafts_generation_failed: 0,
            input_tokens: 0,
            output_tokens: 0,
            stage_durations_ms: std::collections::BTreeMap::new(),
        };
        let result = assemble(input).unwrap();
        assert!((result.stats.knowledge_usage_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_knowledge_sources_gives_zero_usage_rate() {
        let input = AssemblyInput {
            validated_steps: vec![make_step(0, true, 0.6, None)],
            knowledge_sources: vec![],
            chunks_considered: 1,
            chunks_retained: 1,
            drafts_generation_failed: 0,
            input_tokens: 0,
            output_tokens: 0,
            stage_durations_ms: std::collections::BTreeMap::new(),
        };
        let result = assemble(input).unwrap();
        assert_eq!(result.stats.knowledge_usage_rate, 0.0);
    }
}
