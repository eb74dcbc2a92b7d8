//! Topic segmenter: groups sentences into coherent topic chunks using
//! multi-signal boundary detection (timestamp gap, speaker re-entry,
//! explicit transition, semantic drift), then enforces chunk-size and
//! chunk-count bounds.
//!
//! This stage is synchronous and deterministic: it takes a precomputed
//! vector of adjacent-sentence cosine similarities (one per consecutive
//! pair) so that the suspending embedding call happens once, earlier, in
//! the pipeline orchestrator.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial segmenter implementation.

const TIMESTAMP_GAP_SECONDS: f64 = 90.0;
const DRIFT_THRESHOLD: f64 = 0.35;
const RUNNING_MEAN_THRESHOLD: f64 = 0.50;
const MIN_CHUNK_SIZE: usize = 6;
const MAX_CHUNK_SIZE: usize = 12;

/// Segments `sentences` into `TopicChunk`s. Never returns an empty vector
/// when `sentences` is non-empty.
///
/// `adjacent_similarities[i]` must be the cosine similarity between
/// `sentences[i]` and `sentences[i + 1]`; its length must be
/// `sentences.len().saturating_sub(1)`.
///
/// # Examples
///
/// ```
/// use pipeline_core::config::PipelineConfig;
/// use pipeline_core::domain::sentence::{Sentence, SpeakerRole};
/// use pipeline_core::stages::segmenter::segment;
///
/// let sentences: Vec<Sentence> = (0..8)
///     .map(|i| Sentence {
///         id: i,
///         text: format!("Sentence number {i}."),
///         timestamp_seconds: None,
///         speaker_role: SpeakerRole::Instructor,
///         is_question: false,
///         is_transition: false,
///         emphasis_score: 0.0,
///     })
///     .collect();
/// let similarities = vec![0.8; 7];
/// let config = PipelineConfig::default();
/// let chunks = segment(&sentences, &similarities, &config);
/// assert!(!chunks.is_empty());
/// ```
pub fn segment(
    sentences: &[crate::domain::sentence::Sentence],
    adjacent_similarities: &[f64],
    config: &crate::config::PipelineConfig,
) -> std::vec::Vec<crate::domain::topic_chunk::TopicChunk> {
    if sentences.is_empty() {
        return std::vec::Vec::new();
    }

    let boundaries = detect_boundaries(sentences, adjacent_similarities);
    let mut ranges = ranges_from_boundaries(sentences.len(), &boundaries);

    ranges = enforce_size_bounds(ranges, adjacent_similarities);
    ranges = enforce_count_bounds(ranges, adjacent_similarities, config.min_steps, config.target_steps, config.max_steps);

    ranges
        .into_iter()
        .enumerate()
        .map(|(chunk_id, (start, end))| build_chunk(chunk_id, sentences, start, end))
        .collect()
}

/// Returns the set of sentence indices `i` after which a boundary is
/// inserted (i.e. a split falls between sentence `i` and `i + 1`).
fn detect_boundaries(
    sentences: &[crate::domain::sentence::Sentence],
    adjacent_similarities: &[f64],
) -> std::collections::BTreeSet<usize> {
    let mut boundaries = std::collections::BTreeSet::new();
    if sentences.len() < 2 {
        return boundaries;
    }

    let mut participant_run = 0usize;
    let mut running_sum = 0.0f64;

    for i in 0..sentences.len() - 1 {
        let current = &sentences[i];
        let next = &sentences[i + 1];

        // Signal 1: timestamp gap.
        if let (std::option::Option::Some(t0), std::option::Option::Some(t1)) =
            (current.timestamp_seconds, next.timestamp_seconds)
        {
            if t1 - t0 >= TIMESTAMP_GAP_SECONDS {
                boundaries.insert(i);
            }
        }

        // Track participant run for signal 2, evaluated using the state
        // *before* this sentence is folded in (i.e. whether `current` caps
        // a run of >= 2 participant sentences followed by an instructor).
        if current.speaker_role == crate::domain::sentence::SpeakerRole::Participant {
            participant_run += 1;
        } else {
            participant_run = 0;
        }
        if participant_run >= 2 && next.speaker_role == crate::domain::sentence::SpeakerRole::Instructor {
            boundaries.insert(i);
        }

        // Signal 3: explicit transition on the following sentence.
        if next.is_transition {
            boundaries.insert(i);
        }

        // Signal 4: semantic drift.
        let similarity = adjacent_similarities.get(i).copied().unwrap_or(1.0);
        running_sum += similarity;
        let running_mean = running_sum / (i + 1) as f64;
        if similarity < DRIFT_THRESHOLD && running_mean >= RUNNING_MEAN_THRESHOLD {
            boundaries.insert(i);
        }
    }

    boundaries
}

/// Converts a boundary-index set into inclusive `(start, end)` sentence-id
/// ranges.
fn ranges_from_boundaries(
    sentence_count: usize,
    boundaries: &std::collections::BTreeSet<usize>,
) -> std::vec::Vec<(usize, usize)> {
    let mut ranges = std::vec::Vec::new();
    let mut start = 0usize;
    for &boundary in boundaries {
        ranges.push((start, boundary));
        start = boundary + 1;
    }
    ranges.push((start, sentence_count - 1));
    ranges
}

/// Finds the weakest adjacent similarity strictly inside `(start, end)`,
/// returning the index to split after.
fn weakest_link(start: usize, end: usize, adjacent_similarities: &[f64]) -> usize {
    (start..end)
        .min_by(|&a, &b| {
            let sa = adjacent_similarities.get(a).copied().unwrap_or(1.0);
            let sb = adjacent_similarities.get(b).copied().unwrap_or(1.0);
            sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(start)
}

/// Splits oversize chunks (> 12 sentences) at their weakest internal link,
/// then merges undersize chunks (< 6 sentences) into the neighbor with the
/// strongest boundary similarity.
fn enforce_size_bounds(
    mut ranges: std::vec::Vec<(usize, usize)>,
    adjacent_similarities: &[f64],
) -> std::vec::Vec<(usize, usize)> {
    // Split oversize chunks.
    loop {
        let oversize_idx = ranges.iter().position(|&(s, e)| e - s + 1 > MAX_CHUNK_SIZE);
        match oversize_idx {
            std::option::Option::Some(idx) => {
                let (start, end) = ranges[idx];
                let split_at = weakest_link(start, end, adjacent_similarities);
                ranges[idx] = (start, split_at);
                ranges.insert(idx + 1, (split_at + 1, end));
            }
            std::option::Option::None => break,
        }
    }

    // Merge undersize chunks with their best neighbor.
    loop {
        if ranges.len() <= 1 {
            break;
        }
        let undersize_idx = ranges.iter().position(|&(s, e)| e - s + 1 < MIN_CHUNK_SIZE);
        match undersize_idx {
            std::option::Option::Some(idx) => {
                let merge_with_next = idx == 0
                    || (idx + 1 < ranges.len()
                        && boundary_similarity(ranges[idx], ranges[idx + 1], adjacent_similarities)
                            >= boundary_similarity(ranges[idx - 1], ranges[idx], adjacent_similarities));
                if merge_with_next && idx + 1 < ranges.len() {
                    let (s0, _e0) = ranges[idx];
                    let (_s1, e1) = ranges[idx + 1];
                    ranges[idx] = (s0, e1);
                    ranges.remove(idx + 1);
                } else {
                    let (s0, _e0) = ranges[idx - 1];
                    let (_s1, e1) = ranges[idx];
                    ranges[idx - 1] = (s0, e1);
                    ranges.remove(idx);
                }
            }
            std::option::Option::None => break,
        }
    }

    ranges
}

fn boundary_similarity(a: (usize, usize), b: (usize, usize), adjacent_similarities: &[f64]) -> f64 {
    let _ = b;
    adjacent_similarities.get(a.1).copied().unwrap_or(0.0)
}

/// Rebalances the chunk *count* (not size) into `[min, max]`, preferring a
/// result near `target`, by repeatedly merging the smallest-similarity-gap
/// neighbor pair (when over `max`) or splitting the largest chunk at its
/// weakest link (when under `min`).
fn enforce_count_bounds(
    mut ranges: std::vec::Vec<(usize, usize)>,
    adjacent_similarities: &[f64],
    min: usize,
    target: usize,
    max: usize,
) -> std::vec::Vec<(usize, usize)> {
    while ranges.len() > max && ranges.len() > 1 {
        let merge_idx = (0..ranges.len() - 1)
            .max_by(|&a, &b| {
                let ga = adjacent_similarities.get(ranges[a].1).copied().unwrap_or(0.0);
                let gb = adjacent_similarities.get(ranges[b].1).copied().unwrap_or(0.0);
                ga.partial_cmp(&gb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0);
        let (s0, _e0) = ranges[merge_idx];
        let (_s1, e1) = ranges[merge_idx + 1];
        ranges[merge_idx] = (s0, e1);
        ranges.remove(merge_idx + 1);
    }

    while ranges.len() < min {
        let largest_idx = (0..ranges.len())
            .filter(|&i| ranges[i].1 - ranges[i].0 + 1 >= 2)
            .max_by_key(|&i| ranges[i].1 - ranges[i].0)
            .unwrap_or(0);
        let (start, end) = ranges[largest_idx];
        if end == start {
            break;
        }
        let split_at = weakest_link(start, end, adjacent_similarities);
        ranges[largest_idx] = (start, split_at);
        ranges.insert(largest_idx + 1, (split_at + 1, end));
    }

    // Nudge toward `target` when both directions remain legal, preferring
    // fewer, larger merges over further splitting the transcript thin.
    while ranges.len() > target && ranges.len() > min {
        let smallest_idx = (0..ranges.len()).min_by_key(|&i| ranges[i].1 - ranges[i].0).unwrap_or(0);
        if ranges.len() <= min {
            break;
        }
        let neighbor_idx = if smallest_idx == 0 { 0 } else { smallest_idx - 1 };
        let (left, right) = if neighbor_idx + 1 < ranges.len() {
            (neighbor_idx, neighbor_idx + 1)
        } else {
            break;
        };
        let (s0, _e0) = ranges[left];
        let (_s1, e1) = ranges[right];
        ranges[left] = (s0, e1);
        ranges.remove(right);
        if ranges.len() <= target {
            break;
        }
    }

    ranges
}

fn build_chunk(
    chunk_id: usize,
    sentences: &[crate::domain::sentence::Sentence],
    start: usize,
    end: usize,
) -> crate::domain::topic_chunk::TopicChunk {
    let slice = &sentences[start..=end];
    let sentence_ids: std::vec::Vec<usize> = slice.iter().map(|s| s.id).collect();
    let text = slice.iter().map(|s| s.text.as_str()).collect::<std::vec::Vec<_>>().join(" ");
    let question_count = slice.iter().filter(|s| s.is_question).count();
    let qa_density = question_count as f64 / slice.len() as f64;

    crate::domain::topic_chunk::TopicChunk {
        id: chunk_id,
        sentence_ids,
        text,
        qa_density,
        importance: 0.0,
        classification: crate::domain::topic_chunk::ChunkClassification::Instructional,
    }
}
