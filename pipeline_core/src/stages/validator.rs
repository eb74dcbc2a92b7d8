//! Step validator: computes multi-factor confidence and enforces quality
//! gates before a draft becomes an accepted step.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial validator implementation.

/// Validates `draft` against `sources`, computing `confidence` and deciding
/// `accepted`. Always returns a `ValidatedStep`; callers that only want
/// accepted steps filter on `.accepted`.
///
/// # Examples
///
/// ```
/// use pipeline_core::config::PipelineConfig;
/// use pipeline_core::domain::source_ref::{SourceKind, SourceRef};
/// use pipeline_core::domain::step_draft::StepDraft;
/// use pipeline_core::stages::validator::validate;
///
/// let draft = StepDraft {
///     chunk_id: 0,
///     title: "Configure the load balancer".to_string(),
///     overview: "Overview text.".to_string(),
///     content: "word ".repeat(60),
///     actions: vec!["Configure the pool".to_string(), "Enable checks".to_string(), "Verify routing".to_string()],
/// };
/// let sources = vec![SourceRef {
///     kind: SourceKind::Transcript,
///     excerpt_text: "Configure the load balancer.".to_string(),
///     sentence_id: Some(0),
///     url: None,
///     match_score: 0.6,
/// }];
/// let config = PipelineConfig::default();
/// let validated = validate(draft, sources, &config);
/// assert!(validated.accepted);
/// ```
pub fn validate(
    draft: crate::domain::step_draft::StepDraft,
    sources: std::vec::Vec<crate::domain::source_ref::SourceRef>,
    config: &crate::config::PipelineConfig,
) -> crate::domain::validated_step::ValidatedStep {
    let confidence = compute_confidence(&sources);
    let quality_level = crate::domain::validated_step::QualityLevel::from_confidence(confidence);

    let mut reasons = std::vec::Vec::new();

    if !(config.min_actions..=config.max_actions).contains(&draft.actions.len()) {
        reasons.push(std::format!(
            "action count {} outside allowed range [{}, {}]",
            draft.actions.len(),
            config.min_actions,
            config.max_actions
        ));
    }

    for action in &draft.actions {
        if let std::option::Option::Some(reason) = verb_violation(action) {
            reasons.push(reason);
        }
    }

    if draft.content_word_count() < config.min_content_words {
        reasons.push(std::format!(
            "content word count {} below minimum {}",
            draft.content_word_count(),
            config.min_content_words
        ));
    }

    let has_transcript_source = sources.iter().any(|s| s.kind == crate::domain::source_ref::SourceKind::Transcript);
    if !has_transcript_source {
        reasons.push(std::string::String::from("no transcript source bound"));
    }

    if sources.is_empty() {
        reasons.push(std::string::String::from("no source bound"));
    }

    if confidence < config.min_confidence_threshold {
        reasons.push(std::format!(
            "confidence {:.2} below minimum {:.2}",
            confidence, config.min_confidence_threshold
        ));
    }

    if !starts_with_verb_or_gerund(&draft.title) {
        reasons.push(std::format!("title \"{}\" does not begin with a verb or gerund (warning only)", draft.title));
    }

    let accepted = !draft.actions.is_empty()
        && (config.min_actions..=config.max_actions).contains(&draft.actions.len())
        && draft.actions.iter().all(|a| verb_violation(a).is_none())
        && draft.content_word_count() >= config.min_content_words
        && has_transcript_source
        && !sources.is_empty()
        && confidence >= config.min_confidence_threshold;

    crate::domain::validated_step::ValidatedStep {
        draft,
        sources,
        confidence,
        quality_level,
        accepted,
        rejection_reasons: reasons,
    }
}

fn compute_confidence(sources: &[crate::domain::source_ref::SourceRef]) -> f64 {
    let mut sorted_scores: std::vec::Vec<f64> = sources.iter().map(|s| s.match_score).collect();
    sorted_scores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let weights = [0.50, 0.30, 0.20];
    let base: f64 = weights.iter().enumerate().map(|(i, w)| w * sorted_scores.get(i).copied().unwrap_or(0.0)).sum();

    let count_multiplier = match sources.len() {
        n if n >= 4 => 1.25,
        3 => 1.15,
        2 => 1.08,
        _ => 1.00,
    };

    let has_transcript = sources.iter().any(|s| s.kind == crate::domain::source_ref::SourceKind::Transcript);
    let has_knowledge = sources.iter().any(|s| s.kind == crate::domain::source_ref::SourceKind::Knowledge);
    let diversity_multiplier = if has_transcript && has_knowledge { 1.12 } else { 1.00 };

    let high_score_multiplier = if sources.iter().any(|s| s.match_score > 0.50) { 1.10 } else { 1.00 };

    (base * count_multiplier * diversity_multiplier * high_score_multiplier).clamp(0.0, 1.0)
}

/// Returns a rejection reason if `action` does not begin with an allowed
/// strong verb, or begins with a forbidden weak verb.
fn verb_violation(action: &str) -> std::option::Option<std::string::String> {
    let stripped = crate::util::strip_bullet_marker(action);
    let (first, bigram) = crate::util::leading_verb_candidates(&stripped);

    if let std::option::Option::Some(bigram) = &bigram {
        if crate::util::WEAK_VERBS.contains(&bigram.as_str()) {
            return std::option::Option::Some(std::format!("action \"{}\" begins with forbidden weak verb \"{}\"", action, bigram));
        }
    }
    if crate::util::WEAK_VERBS.contains(&first.as_str()) {
        return std::option::Option::Some(std::format!("action \"{}\" begins with forbidden weak verb \"{}\"", action, first));
    }
    if !crate::util::STRONG_VERBS.contains(&first.as_str()) {
        return std::option::Option::Some(std::format!("action \"{}\" does not begin with an allowed strong verb", action));
    }
    std::option::Option::None
}

fn starts_with_verb_or_gerund(title: &str) -> bool {
    let (first, _) = crate::util::leading_verb_candidates(title);
    crate::util::STRONG_VERBS.contains(&first.as_str()) || first.ends_with("ing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source_ref::{SourceKind, SourceRef};
    use crate::domain::step_draft::StepDraft;

    fn make_draft(actions: std::vec::Vec<&str>, content_words: usize) -> StepDraft {
        StepDraft {
            chunk_id: 0,
            title: std::string::String::from("Configure the load balancer"),
            overview: std::string::String::from("Overview."),
            content: "word ".repeat(content_words).trim().to_string(),
            actions: actions.into_iter().map(|s| s.to_string()).collect(),
        }
    }

    fn make_source(kind: SourceKind, score: f64) -> SourceRef {
        SourceRef {
            kind,
            excerpt_text: std::string::String::from("text"),
            sentence_id: std::option::Option::Some(0),
            url: std::option::Option::None,
            match_score: score,
        }
    }

    #[test]
    fn test_well_formed_step_is_accepted() {
        let draft = make_draft(vec!["Configure the pool", "Enable checks", "Verify routing"], 60);
        let sources = vec![make_source(SourceKind::Transcript, 0.6)];
        let config = crate::config::PipelineConfig::default();
        let validated = validate(draft, sources, &config);
        assert!(validated.accepted);
        assert!(validated.rejection_reasons.is_empty() || validated.rejection_reasons.iter().all(|r| r.contains("warning")));
    }

    #[test]
    fn test_too_few_actions_is_rejected() {
        let draft = make_draft(vec!["Configure the pool"], 60);
        let sources = vec![make_source(SourceKind::Transcript, 0.6)];
        let config = crate::config::PipelineConfig::default();
        let validated = validate(draft, sources, &config);
        assert!(!validated.accepted);
    }

    #[test]
    fn test_weak_verb_action_is_rejected() {
        let draft = make_draft(vec!["Learn about networking", "Enable checks", "Verify routing"], 60);
        let sources = vec![make_source(SourceKind::Transcript, 0.6)];
        let config = crate::config::PipelineConfig::default();
        let validated = validate(draft, sources, &config);
        assert!(!validated.accepted);
    }

    #[test]
    fn test_insufficient_content_words_is_rejected() {
        let draft = make_draft(vec!["Configure the pool", "Enable checks", "Verify routing"], 10);
        let sources = vec![make_source(SourceKind::Transcript, 0.6)];
        let config = crate::config::PipelineConfig::default();
        let validated = validate(draft, sources, &config);
        assert!(!validated.accepted);
    }

    #[test]
    fn test_no_transcript_source_is_rejected() {
        let draft = make_draft(vec!["Configure the pool", "Enable checks", "Verify routing"], 60);
        let sources = vec![make_source(SourceKind::Knowledge, 0.6)];
        let config = crate::config::PipelineConfig::default();
        let validated = validate(draft, sources, &config);
        assert!(!validated.accepted);
    }

    #[test]
    fn test_confidence_is_clipped_to_one() {
        let sources = vec![
            make_source(SourceKind::Transcript, 0.9),
            make_source(SourceKind::Knowledge, 0.9),
            make_source(SourceKind::Transcript, 0.9),
            make_source(SourceKind::Knowledge, 0.9),
        ];
        let confidence = compute_confidence(&sources);
        assert!(confidence <= 1.0);
    }

    #[test]
    fn test_quality_level_matches_confidence_band() {
        let draft = make_draft(vec!["Configure the pool", "Enable checks", "Verify routing"], 60);
        let sources = vec![make_source(SourceKind::Transcript, 0.9), make_source(SourceKind::Knowledge, 0.9)];
        let config = crate::config::PipelineConfig::default();
        let validated = validate(draft, sources, &config);
        assert_eq!(
            validated.quality_level,
            crate::domain::validated_step::QualityLevel::from_confidence(validated.confidence)
        );
    }
}
