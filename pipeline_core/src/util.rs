//! Shared lexical utilities and closed token sets used across stages.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial tokenizer, Jaccard scorer, and closed sets.

/// Lowercases and splits `text` into word tokens, stripping punctuation.
///
/// # Examples
///
/// ```
/// use pipeline_core::util::tokenize;
///
/// assert_eq!(tokenize("Configure the server, now!"), vec!["configure", "the", "server", "now"]);
/// ```
pub fn tokenize(text: &str) -> std::vec::Vec<std::string::String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.to_lowercase())
        .collect()
}

/// Jaccard similarity between two token multisets, treated as sets.
///
/// # Examples
///
/// ```
/// use pipeline_core::util::{jaccard_similarity, tokenize};
///
/// let a = tokenize("configure the server");
/// let b = tokenize("configure the database");
/// let score = jaccard_similarity(&a, &b);
/// assert!(score > 0.0 && score < 1.0);
/// ```
pub fn jaccard_similarity(a: &[std::string::String], b: &[std::string::String]) -> f64 {
    let set_a: std::collections::HashSet<&str> = a.iter().map(std::string::String::as_str).collect();
    let set_b: std::collections::HashSet<&str> = b.iter().map(std::string::String::as_str).collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Count of tokens shared between two token sets (used for the source
/// binder's "at least 3 overlapping content tokens" gate).
pub fn overlap_count(a: &[std::string::String], b: &[std::string::String]) -> usize {
    let set_a: std::collections::HashSet<&str> = a.iter().map(std::string::String::as_str).collect();
    let set_b: std::collections::HashSet<&str> = b.iter().map(std::string::String::as_str).collect();
    set_a.intersection(&set_b).count()
}

/// Closed set of interrogative lead tokens used by the normalizer's
/// `is_question` detection.
pub const INTERROGATIVE_TOKENS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "which", "can", "could", "would", "should",
    "do", "does", "is", "are",
];

/// Closed set of transition phrases used by the normalizer's
/// `is_transition` detection.
pub const TRANSITION_PHRASES: &[&str] = &[
    "let's move on",
    "next we'll",
    "next, we",
    "moving on",
    "now let's",
    "next topic",
    "alright, so",
    "so now",
];

/// Closed set of emphasis tokens used by the normalizer's `emphasis_score`.
pub const EMPHASIS_TOKENS: &[&str] = &[
    "important",
    "crucial",
    "key",
    "critical",
    "essential",
    "remember",
    "note that",
    "must",
    "required",
    "never",
    "always",
];

/// Closed set of speaker-role prefix tokens mapping to `SpeakerRole::Instructor`.
pub const INSTRUCTOR_ROLE_TOKENS: &[&str] = &["instructor", "teacher", "presenter", "host"];

/// Closed set of speaker-role prefix tokens mapping to `SpeakerRole::Participant`.
pub const PARTICIPANT_ROLE_TOKENS: &[&str] = &["participant", "student", "attendee", "q"];

/// Closed set of allowed strong verbs that may open a validated action.
pub const STRONG_VERBS: &[&str] = &[
    "configure", "create", "add", "set", "enable", "disable", "update", "modify", "deploy",
    "install", "implement", "run", "execute", "navigate", "open", "access", "select", "click",
    "enter", "choose", "verify", "test", "validate", "confirm", "check", "monitor", "define",
    "initialize", "generate", "build", "apply",
];

/// Closed set of forbidden weak verbs that must not open a validated action.
pub const WEAK_VERBS: &[&str] = &[
    "learn", "understand", "know", "remember", "recall", "review", "read", "study", "examine",
    "consider", "ensure", "make sure", "try", "attempt",
];

/// Closed set of greeting/closing tokens used by the administrative
/// classification heuristic.
pub const GREETING_TOKENS: &[&str] = &[
    "hello", "hi", "welcome", "goodbye", "bye", "thanks", "thank", "everyone", "see you",
    "have a great", "that's all", "wrap up", "wrapping up",
];

/// Strips leading bullet markers (`-`, `*`, `•`, numeric `1.`/`1)`) and
/// surrounding whitespace from an action line.
pub fn strip_bullet_marker(line: &str) -> std::string::String {
    let trimmed = line.trim();
    let trimmed = trimmed
        .trim_start_matches(|c: char| c == '-' || c == '*' || c == '\u{2022}' || c.is_whitespace());
    // Strip a leading "N." or "N)" numeric marker.
    let bytes = trimmed.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let rest = if idx > 0 && idx < bytes.len() && (bytes[idx] == b'.' || bytes[idx] == b')') {
        &trimmed[idx + 1..]
    } else {
        trimmed
    };
    rest.trim().to_string()
}

/// Returns the first word of `action`, lowercased, used to check it against
/// the strong/weak verb closed sets. Handles the two-word weak verbs
/// ("make sure") by checking a leading bigram too.
pub fn leading_verb_candidates(action: &str) -> (std::string::String, std::option::Option<std::string::String>) {
    let lower = action.to_lowercase();
    let mut words = lower.split_whitespace();
    let first = words.next().unwrap_or("").trim_matches(|c: char| !c.is_alphanumeric()).to_string();
    let second = words.next();
    let bigram = second.map(|s| std::format!("{} {}", first, s.trim_matches(|c: char| !c.is_alphanumeric())));
    (first, bigram)
}

/// Collapses any run of whitespace (including newlines) into a single
/// space and trims the ends.
pub fn normalize_whitespace(s: &str) -> std::string::String {
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

/// Truncates `s` to at most `max_chars` characters, backing off to the
/// nearest preceding word boundary so no word is cut mid-token.
pub fn truncate_at_word_boundary(s: &str, max_chars: usize) -> std::string::String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let truncated: std::string::String = s.chars().take(max_chars).collect();
    match truncated.rfind(char::is_whitespace) {
        std::option::Option::Some(idx) => truncated[..idx].trim_end().to_string(),
        std::option::Option::None => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(tokenize("Hello, world!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_jaccard_identical_sets() {
        let a = tokenize("configure the server");
        let b = tokenize("configure the server");
        assert_eq!(jaccard_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint_sets() {
        let a = tokenize("alpha beta");
        let b = tokenize("gamma delta");
        assert_eq!(jaccard_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_strip_bullet_marker_variants() {
        assert_eq!(strip_bullet_marker("- Configure the server"), "Configure the server");
        assert_eq!(strip_bullet_marker("* Configure the server"), "Configure the server");
        assert_eq!(strip_bullet_marker("1. Configure the server"), "Configure the server");
        assert_eq!(strip_bullet_marker("2) Configure the server"), "Configure the server");
    }

    #[test]
    fn test_leading_verb_candidates_bigram() {
        let (first, bigram) = leading_verb_candidates("Make sure the server is running");
        assert_eq!(first, "make");
        assert_eq!(bigram.as_deref(), Some("make sure"));
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        let s = "one two three four five";
        assert_eq!(truncate_at_word_boundary(s, 11), "one two");
    }

    #[test]
    fn test_truncate_noop_when_short_enough() {
        let s = "short text";
        assert_eq!(truncate_at_word_boundary(s, 100), "short text");
    }

    #[test]
    fn test_normalize_whitespace_collapses_newlines() {
        assert_eq!(normalize_whitespace("a\n\n  b\tc"), "a b c");
    }
}
