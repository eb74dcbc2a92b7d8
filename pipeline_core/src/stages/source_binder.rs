//! Source binder: matches a generated step back to the transcript
//! sentences and knowledge excerpts that ground it.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial source binder implementation.

const MIN_OVERLAP_TOKENS: usize = 3;
const MIN_SCORE: f64 = 0.15;
const TOP_TRANSCRIPT_SOURCES: usize = 5;
const KNOWLEDGE_OVERLAP_THRESHOLD: f64 = 0.30;

/// Binds `draft` to transcript sentences and knowledge excerpts, producing
/// an ordered list of `SourceRef`s (transcript sources first, by
/// descending score, then knowledge sources in excerpt order).
pub async fn bind(
    draft: &crate::domain::step_draft::StepDraft,
    sentences: &[crate::domain::sentence::Sentence],
    excerpts_used: &[crate::domain::excerpt::ScoredExcerpt],
    embedding: std::option::Option<&dyn crate::ports::embedding_port::EmbeddingPort>,
    config: &crate::config::PipelineConfig,
) -> std::vec::Vec<crate::domain::source_ref::SourceRef> {
    let step_text = draft.combined_text();
    let step_tokens = crate::util::tokenize(&step_text);

    let semantic_scores = semantic_scores_for_sentences(&step_text, sentences, embedding, config).await;

    let mut transcript_candidates: std::vec::Vec<crate::domain::source_ref::SourceRef> = sentences
        .iter()
        .enumerate()
        .filter_map(|(idx, sentence)| {
            let sentence_tokens = crate::util::tokenize(&sentence.text);
            let overlap = crate::util::overlap_count(&sentence_tokens, &step_tokens);
            if overlap < MIN_OVERLAP_TOKENS {
                return std::option::Option::None;
            }

            let lexical_score = crate::util::jaccard_similarity(&sentence_tokens, &step_tokens);
            let semantic_score = semantic_scores.get(idx).copied().unwrap_or(lexical_score);
            let score = config.semantic_match_weight * semantic_score + config.word_match_weight * lexical_score;

            if score < MIN_SCORE {
                return std::option::Option::None;
            }

            std::option::Option::Some(crate::domain::source_ref::SourceRef {
                kind: crate::domain::source_ref::SourceKind::Transcript,
                excerpt_text: sentence.text.clone(),
                sentence_id: std::option::Option::Some(sentence.id),
                url: std::option::Option::None,
                match_score: score,
            })
        })
        .collect();

    transcript_candidates.sort_by(|a, b| b.match_score.partial_cmp(&a.match_score).unwrap_or(std::cmp::Ordering::Equal));
    transcript_candidates.truncate(TOP_TRANSCRIPT_SOURCES);

    let content_lower = draft.content.to_lowercase();
    let content_tokens = crate::util::tokenize(&draft.content);

    let knowledge_refs: std::vec::Vec<crate::domain::source_ref::SourceRef> = excerpts_used
        .iter()
        .filter(|scored| {
            let excerpt_lower = scored.excerpt.text.to_lowercase();
            let substring_match = content_lower.contains(&excerpt_lower);
            let excerpt_tokens = crate::util::tokenize(&scored.excerpt.text);
            let overlap_match = crate::util::jaccard_similarity(&excerpt_tokens, &content_tokens) >= KNOWLEDGE_OVERLAP_THRESHOLD;
            substring_match || overlap_match
        })
        .map(|scored| crate::domain::source_ref::SourceRef {
            kind: crate::domain::source_ref::SourceKind::Knowledge,
            excerpt_text: scored.excerpt.text.clone(),
            sentence_id: std::option::Option::None,
            url: std::option::Option::Some(scored.excerpt.source_url.clone()),
            match_score: scored.score,
        })
        .collect();

    transcript_candidates.into_iter().chain(knowledge_refs).collect()
}

/// Computes a per-sentence semantic score against `step_text`. Falls back to
/// the lexical (Jaccard) score for every sentence if no embedding backend is
/// configured or the batch call fails, keeping the weighted combination
/// well-defined either way.
async fn semantic_scores_for_sentences(
    step_text: &str,
    sentences: &[crate::domain::sentence::Sentence],
    embedding: std::option::Option<&dyn crate::ports::embedding_port::EmbeddingPort>,
    config: &crate::config::PipelineConfig,
) -> std::vec::Vec<f64> {
    if !config.embedding_enabled {
        return std::vec::Vec::new();
    }
    let std::option::Option::Some(port) = embedding else {
        return std::vec::Vec::new();
    };

    let mut texts = std::vec::Vec::with_capacity(sentences.len() + 1);
    texts.push(step_text.to_string());
    texts.extend(sentences.iter().map(|s| s.text.clone()));

    match port.embed(&texts).await {
        std::result::Result::Ok(vectors) if vectors.len() == texts.len() => {
            let step_vector = &vectors[0];
            vectors[1..]
                .iter()
                .map(|v| crate::adapters::lexical_embedding_fallback::cosine_similarity(step_vector, v))
                .collect()
        }
        _ => std::vec::Vec::new(),
    }
}
