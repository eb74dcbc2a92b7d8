//! Topic filter/ranker: classifies chunks as instructional vs. Q&A, scores
//! importance, and drops low-value chunks.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial filter/ranker implementation.

/// Classifies and scores `chunks`, dropping `qa_clarification` and
/// `administrative` chunks and any chunk whose importance falls below
/// `config.importance_threshold`.
///
/// Fails with `PipelineError::InsufficientContent` if no chunk survives.
///
/// # Examples
///
/// ```
/// use pipeline_core::config::PipelineConfig;
/// use pipeline_core::domain::sentence::{Sentence, SpeakerRole};
/// use pipeline_core::domain::topic_chunk::{ChunkClassification, TopicChunk};
/// use pipeline_core::stages::filter_ranker::filter_rank;
///
/// let sentences: Vec<Sentence> = (0..8)
///     .map(|i| Sentence {
///         id: i,
///         text: std::format!("Configure step number {i}."),
///         timestamp_seconds: None,
///         speaker_role: SpeakerRole::Instructor,
///         is_question: false,
///         is_transition: false,
///         emphasis_score: 0.5,
///     })
///     .collect();
/// let chunk = TopicChunk {
///     id: 0,
///     sentence_ids: (0..8).collect(),
///     text: sentences.iter().map(|s| s.text.clone()).collect::<Vec<_>>().join(" "),
///     qa_density: 0.0,
///     importance: 0.0,
///     classification: ChunkClassification::Instructional,
/// };
/// let config = PipelineConfig::default();
/// let retained = filter_rank(vec![chunk], &sentences, &config).unwrap();
/// assert_eq!(retained.len(), 1);
/// ```
pub fn filter_rank(
    chunks: std::vec::Vec<crate::domain::topic_chunk::TopicChunk>,
    sentences: &[crate::domain::sentence::Sentence],
    config: &crate::config::PipelineConfig,
) -> crate::error::PipelineResult<std::vec::Vec<crate::domain::topic_chunk::TopicChunk>> {
    let sentence_by_id: std::collections::HashMap<usize, &crate::domain::sentence::Sentence> =
        sentences.iter().map(|s| (s.id, s)).collect();

    let total_chunks = chunks.len();
    let max_span = chunks
        .iter()
        .map(|c| chunk_span_seconds(c, &sentence_by_id))
        .fold(0.0f64, f64::max)
        .max(1.0);

    let mut scored: std::vec::Vec<crate::domain::topic_chunk::TopicChunk> = chunks
        .into_iter()
        .enumerate()
        .map(|(rank, mut chunk)| {
            chunk.classification = classify(&chunk, &sentence_by_id, config);
            chunk.importance = importance(&chunk, &sentence_by_id, rank, total_chunks, max_span);
            chunk
        })
        .collect();

    scored.retain(|chunk| {
        !matches!(
            chunk.classification,
            crate::domain::topic_chunk::ChunkClassification::Administrative
                | crate::domain::topic_chunk::ChunkClassification::QaClarification
        )
    });

    scored.retain(|chunk| chunk.importance >= config.importance_threshold);

    if scored.is_empty() {
        return std::result::Result::Err(crate::error::PipelineError::insufficient_content(
            "no topic chunk survived classification and importance filtering",
            config.importance_threshold,
            config.min_confidence_threshold,
        ));
    }

    std::result::Result::Ok(scored)
}

fn classify(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    sentence_by_id: &std::collections::HashMap<usize, &crate::domain::sentence::Sentence>,
    config: &crate::config::PipelineConfig,
) -> crate::domain::topic_chunk::ChunkClassification {
    let lower_text = chunk.text.to_lowercase();
    let contains_greeting = crate::util::GREETING_TOKENS.iter().any(|token| lower_text.contains(token));
    let contains_action_verb = chunk_has_action_verb(chunk, sentence_by_id);

    if contains_greeting && !contains_action_verb {
        return crate::domain::topic_chunk::ChunkClassification::Administrative;
    }
    if chunk.qa_density >= config.qa_density_threshold && chunk.len() < 6 {
        return crate::domain::topic_chunk::ChunkClassification::QaClarification;
    }
    if chunk.qa_density >= 0.25 && chunk.qa_density < config.qa_density_threshold {
        return crate::domain::topic_chunk::ChunkClassification::QaSubstantive;
    }
    crate::domain::topic_chunk::ChunkClassification::Instructional
}

fn chunk_has_action_verb(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    sentence_by_id: &std::collections::HashMap<usize, &crate::domain::sentence::Sentence>,
) -> bool {
    chunk.sentence_ids.iter().filter_map(|id| sentence_by_id.get(id)).any(|sentence| {
        let tokens = crate::util::tokenize(&sentence.text);
        tokens.iter().any(|t| crate::util::STRONG_VERBS.contains(&t.as_str()))
    })
}

fn chunk_span_seconds(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    sentence_by_id: &std::collections::HashMap<usize, &crate::domain::sentence::Sentence>,
) -> f64 {
    let timestamps: std::vec::Vec<f64> = chunk
        .sentence_ids
        .iter()
        .filter_map(|id| sentence_by_id.get(id))
        .filter_map(|s| s.timestamp_seconds)
        .collect();
    match (timestamps.first(), timestamps.last()) {
        (std::option::Option::Some(first), std::option::Option::Some(last)) => (last - first).max(0.0),
        _ => 0.0,
    }
}

fn importance(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    sentence_by_id: &std::collections::HashMap<usize, &crate::domain::sentence::Sentence>,
    rank: usize,
    total_chunks: usize,
    max_span: f64,
) -> f64 {
    let chunk_sentences: std::vec::Vec<&crate::domain::sentence::Sentence> =
        chunk.sentence_ids.iter().filter_map(|id| sentence_by_id.get(id).copied()).collect();

    let duration = chunk_span_seconds(chunk, sentence_by_id) / max_span;

    let emphasis = if chunk_sentences.is_empty() {
        0.0
    } else {
        chunk_sentences.iter().map(|s| s.emphasis_score).sum::<f64>() / chunk_sentences.len() as f64
    };

    let actionability = if chunk_sentences.is_empty() {
        0.0
    } else {
        let count = chunk_sentences
            .iter()
            .filter(|s| {
                crate::util::tokenize(&s.text).iter().any(|t| crate::util::STRONG_VERBS.contains(&t.as_str()))
            })
            .count();
        count as f64 / chunk_sentences.len() as f64
    };

    let position = if total_chunks <= 1 {
        1.0
    } else {
        (total_chunks - 1 - rank) as f64 / (total_chunks - 1) as f64
    };

    let qa_penalty = 1.0 - chunk.qa_density;

    let score = 0.25 * duration + 0.25 * emphasis + 0.25 * actionability + 0.15 * position + 0.10 * qa_penalty;
    score.clamp(0.0, 1.0)
}
