//! Transcript normalizer: splits raw text into sentences with derived
//! metadata (timestamp, speaker role, question/transition flags, emphasis
//! score).
//!
//! Revision History
//! - 2026-07-28 @AI: Initial normalizer implementation.

/// Abbreviations whose trailing period must not be treated as a sentence
/// terminator.
const ABBREVIATIONS: &[&str] = &["dr.", "mr.", "mrs.", "ms.", "e.g.", "i.e.", "etc."];

fn timestamp_regex() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^\[(\d{1,2}):(\d{2})(?::(\d{2}))?\]\s*").expect("valid regex"))
}

fn speaker_regex() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^([A-Za-z][A-Za-z0-9 .'-]{0,40}):\s*").expect("valid regex"))
}

/// Normalizes `raw_text` into an ordered sequence of sentences.
///
/// Fails with `PipelineError::InvalidInput` if the cleaned text is empty or
/// contains no sentence-terminating punctuation.
///
/// # Examples
///
/// ```
/// use pipeline_core::stages::normalizer::normalize;
///
/// let sentences = normalize("Instructor: Let's configure the server. Is that clear?").unwrap();
/// assert_eq!(sentences.len(), 2);
/// assert!(sentences[1].is_question);
/// ```
pub fn normalize(raw_text: &str) -> crate::error::PipelineResult<std::vec::Vec<crate::domain::sentence::Sentence>> {
    let cleaned = clean_text(raw_text);
    if cleaned.trim().is_empty() {
        return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
            message: std::string::String::from("transcript is empty after cleanup"),
        });
    }

    let mut current_role = crate::domain::sentence::SpeakerRole::Unknown;
    let mut sentences = std::vec::Vec::new();
    let mut next_id = 0usize;

    for raw_line in cleaned.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let (timestamp_seconds, rest) = extract_timestamp(line);
        let (role_update, rest) = extract_speaker(rest);
        if let std::option::Option::Some(role) = role_update {
            current_role = role;
        }

        for sentence_text in split_sentences(rest) {
            let is_question = is_question(&sentence_text);
            let is_transition = is_transition(&sentence_text);
            let emphasis_score = emphasis_score(&sentence_text);

            sentences.push(crate::domain::sentence::Sentence {
                id: next_id,
                text: sentence_text,
                timestamp_seconds,
                speaker_role: current_role,
                is_question,
                is_transition,
                emphasis_score,
            });
            next_id += 1;
        }
    }

    if sentences.is_empty() {
        return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
            message: std::string::String::from("transcript contains no sentence-terminating punctuation"),
        });
    }

    std::result::Result::Ok(sentences)
}

/// Strips control characters and collapses intra-line whitespace runs,
/// preserving line (and therefore inter-sentence) boundaries.
fn clean_text(raw: &str) -> std::string::String {
    let mut out = std::string::String::with_capacity(raw.len());
    for line in raw.lines() {
        let filtered: std::string::String = line.chars().filter(|c| !c.is_control() || *c == '\t').collect();
        out.push_str(&collapse_whitespace(&filtered));
        out.push('\n');
    }
    out
}

fn collapse_whitespace(s: &str) -> std::string::String {
    let mut result = std::string::String::with_capacity(s.len());
    let mut last_was_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
            }
            last_was_space = true;
        } else {
            result.push(c);
            last_was_space = false;
        }
    }
    result.trim().to_string()
}

/// Extracts a leading `[hh:mm:ss]` or `[mm:ss]` timestamp, returning the
/// parsed seconds and the remainder of the line.
fn extract_timestamp(line: &str) -> (std::option::Option<f64>, &str) {
    match timestamp_regex().captures(line) {
        std::option::Option::Some(caps) => {
            let full_match = caps.get(0).unwrap();
            let first: f64 = caps[1].parse().unwrap_or(0.0);
            let second: f64 = caps[2].parse().unwrap_or(0.0);
            let seconds = match caps.get(3) {
                std::option::Option::Some(third) => {
                    let third: f64 = third.as_str().parse().unwrap_or(0.0);
                    first * 3600.0 + second * 60.0 + third
                }
                std::option::Option::None => first * 60.0 + second,
            };
            (std::option::Option::Some(seconds), &line[full_match.end()..])
        }
        std::option::Option::None => (std::option::Option::None, line),
    }
}

/// Extracts a leading `Name:`/`Role:` prefix. Returns `Some(role)` only when
/// the prefix token matches a recognized role keyword from the closed sets;
/// an unrecognized prefix (a bare name) is still stripped from `rest` but
/// does not change the propagated speaker role.
fn extract_speaker(line: &str) -> (std::option::Option<crate::domain::sentence::SpeakerRole>, &str) {
    match speaker_regex().captures(line) {
        std::option::Option::Some(caps) => {
            let full_match = caps.get(0).unwrap();
            let prefix = caps[1].trim().to_lowercase();
            let role = if crate::util::INSTRUCTOR_ROLE_TOKENS.contains(&prefix.as_str()) {
                std::option::Option::Some(crate::domain::sentence::SpeakerRole::Instructor)
            } else if crate::util::PARTICIPANT_ROLE_TOKENS.contains(&prefix.as_str()) {
                std::option::Option::Some(crate::domain::sentence::SpeakerRole::Participant)
            } else {
                std::option::Option::None
            };
            (role, &line[full_match.end()..])
        }
        std::option::Option::None => (std::option::Option::None, line),
    }
}

/// Splits `text` into sentences on `. ? !`, respecting the closed
/// abbreviation set and requiring a following whitespace or end-of-text.
fn split_sentences(text: &str) -> std::vec::Vec<std::string::String> {
    let chars: std::vec::Vec<char> = text.chars().collect();
    let n = chars.len();
    let mut sentences = std::vec::Vec::new();
    let mut current = std::string::String::new();

    for i in 0..n {
        let c = chars[i];
        current.push(c);

        if c == '.' || c == '?' || c == '!' {
            let followed_by_boundary = i + 1 >= n || chars[i + 1].is_whitespace();
            let is_abbreviation = c == '.' && ends_with_abbreviation(&current);

            if followed_by_boundary && !is_abbreviation {
                let trimmed = current.trim().to_string();
                if !trimmed.is_empty() {
                    sentences.push(trimmed);
                }
                current.clear();
            }
        }
    }

    let trimmed = current.trim().to_string();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }

    sentences
}

fn ends_with_abbreviation(current: &str) -> bool {
    let tail: std::string::String = current
        .chars()
        .rev()
        .take(8)
        .collect::<std::vec::Vec<_>>()
        .into_iter()
        .rev()
        .collect::<std::string::String>()
        .to_lowercase();
    ABBREVIATIONS.iter().any(|a| tail.ends_with(a))
}

fn is_question(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.ends_with('?') {
        return true;
    }
    let tokens = crate::util::tokenize(trimmed);
    match tokens.first() {
        std::option::Option::Some(first) => crate::util::INTERROGATIVE_TOKENS.contains(&first.as_str()),
        std::option::Option::None => false,
    }
}

fn is_transition(text: &str) -> bool {
    let lower = text.to_lowercase();
    crate::util::TRANSITION_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

fn emphasis_score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let count: usize = crate::util::EMPHASIS_TOKENS.iter().map(|token| lower.matches(token).count()).sum();
    (count as f64 / 5.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_fails() {
        let result = normalize("   ");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_terminal_punctuation_fails() {
        let result = normalize("this has no sentence terminator at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_basic_split() {
        let sentences = normalize("This is one. This is two!").unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].id, 0);
        assert_eq!(sentences[1].id, 1);
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        let sentences = normalize("Dr. Smith reviewed the e.g. examples carefully.").unwrap();
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_timestamp_extraction_mm_ss() {
        let sentences = normalize("[05:30] Let's begin the lesson.").unwrap();
        assert_eq!(sentences[0].timestamp_seconds, Some(330.0));
    }

    #[test]
    fn test_timestamp_extraction_hh_mm_ss() {
        let sentences = normalize("[01:02:03] Let's begin the lesson.").unwrap();
        assert_eq!(sentences[0].timestamp_seconds, Some(3723.0));
    }

    #[test]
    fn test_speaker_role_propagates() {
        let sentences = normalize(
            "Instructor: Let's configure the server. It should take a minute.\nParticipant: What does that mean?\nHow do we verify it?",
        )
        .unwrap();
        assert_eq!(sentences[0].speaker_role, crate::domain::sentence::SpeakerRole::Instructor);
        assert_eq!(sentences[1].speaker_role, crate::domain::sentence::SpeakerRole::Instructor);
        assert_eq!(sentences[2].speaker_role, crate::domain::sentence::SpeakerRole::Participant);
        assert_eq!(sentences[3].speaker_role, crate::domain::sentence::SpeakerRole::Participant);
    }

    #[test]
    fn test_unrecognized_prefix_keeps_previous_role() {
        let sentences = normalize("Instructor: Let's start.\nAlice: I have a question.").unwrap();
        assert_eq!(sentences[1].speaker_role, crate::domain::sentence::SpeakerRole::Instructor);
    }

    #[test]
    fn test_is_question_detection() {
        let sentences = normalize("How does this work? Configure it now.").unwrap();
        assert!(sentences[0].is_question);
        assert!(!sentences[1].is_question);
    }

    #[test]
    fn test_is_transition_detection() {
        let sentences = normalize("That covers the basics. Now let's move on to advanced topics.").unwrap();
        assert!(!sentences[0].is_transition);
        assert!(sentences[1].is_transition);
    }

    #[test]
    fn test_emphasis_score_clipped() {
        let sentences =
            normalize("This is important, crucial, key, critical, essential, and must be remembered.").unwrap();
        assert_eq!(sentences[0].emphasis_score, 1.0);
    }

    #[test]
    fn test_renormalizing_already_normalized_sentences_is_idempotent() {
        let first = normalize("Configure the server. Is that ready?").unwrap();
        let joined = first
            .iter()
            .map(|s| s.text.clone())
            .collect::<std::vec::Vec<_>>()
            .join(" ");
        let second = normalize(&joined).unwrap();
        let first_texts: std::vec::Vec<&str> = first.iter().map(|s| s.text.as_str()).collect();
        let second_texts: std::vec::Vec<&str> = second.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(first_texts, second_texts);
    }
}
