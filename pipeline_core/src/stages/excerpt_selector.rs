//! Semantic excerpt selector: splits knowledge sources into overlapping
//! excerpts, scores them against a chunk by embedding cosine similarity
//! (or a deterministic Jaccard fallback when no embedding backend is
//! available), and returns the top-K globally after a per-source cap.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial excerpt selector implementation.

const TOP_K: usize = 5;
const PER_SOURCE_CAP: usize = 2;
const EXCERPT_CHARS: usize = 600;
const EXCERPT_OVERLAP_FRACTION: f64 = 0.20;
const MIN_SCORE: f64 = 0.10;

/// Selects the top relevant excerpts for `chunk` from `knowledge_sources`.
///
/// Passing `embedding = None`, or an embedding call that returns
/// `EmbeddingCallError`, both fall back to Jaccard similarity over
/// lowercased token sets, applying identical thresholds and ordering so the
/// result stays deterministic either way.
pub async fn select(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    knowledge_sources: &[crate::domain::knowledge_source::KnowledgeSource],
    embedding: std::option::Option<&dyn crate::ports::embedding_port::EmbeddingPort>,
    config: &crate::config::PipelineConfig,
) -> std::vec::Vec<crate::domain::excerpt::ScoredExcerpt> {
    let candidates: std::vec::Vec<crate::domain::excerpt::Excerpt> = knowledge_sources
        .iter()
        .filter(|source| source.is_usable())
        .flat_map(|source| split_into_excerpts(source))
        .collect();

    if candidates.is_empty() {
        return std::vec::Vec::new();
    }

    let scores = score_candidates(chunk, &candidates, embedding, config).await;

    let mut scored: std::vec::Vec<crate::domain::excerpt::ScoredExcerpt> = candidates
        .into_iter()
        .zip(scores)
        .map(|(excerpt, score)| crate::domain::excerpt::ScoredExcerpt { excerpt, score })
        .filter(|scored| scored.score >= MIN_SCORE)
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut per_source_counts: std::collections::HashMap<std::string::String, usize> = std::collections::HashMap::new();
    let mut capped: std::vec::Vec<crate::domain::excerpt::ScoredExcerpt> = std::vec::Vec::new();
    for item in scored {
        let count = per_source_counts.entry(item.excerpt.source_url.clone()).or_insert(0);
        if *count < PER_SOURCE_CAP {
            *count += 1;
            capped.push(item);
        }
    }

    capped.truncate(TOP_K);
    capped
}

fn split_into_excerpts(source: &crate::domain::knowledge_source::KnowledgeSource) -> std::vec::Vec<crate::domain::excerpt::Excerpt> {
    let content = &source.content;
    if content.trim().is_empty() {
        return std::vec::Vec::new();
    }

    // Byte offset of each char, so window boundaries always land on char
    // boundaries even when content has multi-byte UTF-8 (curly quotes, em
    // dashes, accented characters) from scraped HTML/PDF text.
    let char_byte_offsets: std::vec::Vec<usize> = content.char_indices().map(|(byte_offset, _)| byte_offset).collect();
    let total_chars = char_byte_offsets.len();

    let step_chars = (EXCERPT_CHARS as f64 * (1.0 - EXCERPT_OVERLAP_FRACTION)).max(1.0) as usize;

    let mut excerpts = std::vec::Vec::new();
    let mut window_start_char = 0usize;

    while window_start_char < total_chars {
        let window_end_char = (window_start_char + EXCERPT_CHARS).min(total_chars);
        let start_byte = char_byte_offsets[window_start_char];
        let end_byte = if window_end_char < total_chars {
            char_byte_offsets[window_end_char]
        } else {
            content.len()
        };
        let raw_slice = &content[start_byte..end_byte];
        let text = if window_end_char < total_chars {
            crate::util::truncate_at_word_boundary(raw_slice, EXCERPT_CHARS)
        } else {
            raw_slice.trim().to_string()
        };

        if !text.trim().is_empty() {
            excerpts.push(crate::domain::excerpt::Excerpt {
                source_url: source.url.clone(),
                source_title: source.title.clone(),
                text: text.clone(),
                offset: start_byte,
            });
        }

        if window_end_char >= total_chars {
            break;
        }
        window_start_char += step_chars;
    }

    excerpts
}

async fn score_candidates(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    candidates: &[crate::domain::excerpt::Excerpt],
    embedding: std::option::Option<&dyn crate::ports::embedding_port::EmbeddingPort>,
    config: &crate::config::PipelineConfig,
) -> std::vec::Vec<f64> {
    if config.embedding_enabled {
        if let std::option::Option::Some(port) = embedding {
            let mut texts = std::vec::Vec::with_capacity(candidates.len() + 1);
            texts.push(chunk.text.clone());
            texts.extend(candidates.iter().map(|c| c.text.clone()));

            if let std::result::Result::Ok(vectors) = port.embed(&texts).await {
                if vectors.len() == texts.len() {
                    let chunk_vector = &vectors[0];
                    return vectors[1..]
                        .iter()
                        .map(|v| crate::adapters::lexical_embedding_fallback::cosine_similarity(chunk_vector, v) as f64)
                        .collect();
                }
            }
        }
    }

    jaccard_scores(chunk, candidates)
}

fn jaccard_scores(chunk: &crate::domain::topic_chunk::TopicChunk, candidates: &[crate::domain::excerpt::Excerpt]) -> std::vec::Vec<f64> {
    let chunk_tokens = crate::util::tokenize(&chunk.text);
    candidates
        .iter()
        .map(|c| crate::util::jaccard_similarity(&chunk_tokens, &crate::util::tokenize(&c.text)))
        .collect()
}
