//! Step generator: composes a structured prompt from a chunk and its
//! excerpts, calls the external LLM, and parses the response into a
//! `StepDraft`.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial step generator implementation.

const TEMPERATURE: f64 = 0.2;
const TOP_P: f64 = 0.85;
const MAX_TOKENS: u32 = 1000;

/// Per-chunk generation failure. Non-fatal to the overall job: the caller
/// records it and produces no step for the affected chunk.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("LLM call timed out after one retry")]
    Timeout,
    #[error("LLM service error after one retry: {0}")]
    ServiceError(std::string::String),
    #[error("unparseable LLM response after one reparse attempt")]
    ParseFailure,
}

/// A generated draft plus the token accounting from whichever LLM call
/// ultimately produced it (first attempt or reparse retry).
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub draft: crate::domain::step_draft::StepDraft,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Generates one `StepDraft` from `chunk` and its selected excerpts.
pub async fn generate(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    excerpts: &[crate::domain::excerpt::ScoredExcerpt],
    llm: &dyn crate::ports::llm_port::LlmPort,
    config: &crate::config::PipelineConfig,
) -> std::result::Result<GenerationOutcome, GenerationError> {
    let prompt = compose_prompt(chunk, excerpts, config, false);
    let response = call_with_retry(llm, &prompt, config).await?;

    if let std::option::Option::Some(parts) = parse_response(&response.text) {
        return std::result::Result::Ok(GenerationOutcome {
            draft: build_draft(chunk.id, parts),
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
        });
    }

    eprintln!("[step_generator] unparseable response for chunk {}, retrying with relabel reminder", chunk.id);
    let relabeled_prompt = compose_prompt(chunk, excerpts, config, true);
    let response = call_with_retry(llm, &relabeled_prompt, config).await?;

    match parse_response(&response.text) {
        std::option::Option::Some(parts) => std::result::Result::Ok(GenerationOutcome {
            draft: build_draft(chunk.id, parts),
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
        }),
        std::option::Option::None => {
            eprintln!("[step_generator] parse failure persisted for chunk {} after relabel retry", chunk.id);
            std::result::Result::Err(GenerationError::ParseFailure)
        }
    }
}

async fn call_with_retry(
    llm: &dyn crate::ports::llm_port::LlmPort,
    prompt: &str,
    config: &crate::config::PipelineConfig,
) -> std::result::Result<crate::ports::llm_port::LlmResponse, GenerationError> {
    let request = || crate::ports::llm_port::LlmRequest {
        prompt: prompt.to_string(),
        temperature: TEMPERATURE,
        top_p: TOP_P,
        max_tokens: MAX_TOKENS,
        timeout: std::time::Duration::from_secs(config.llm_timeout_seconds),
    };

    match llm.generate(request()).await {
        std::result::Result::Ok(response) => std::result::Result::Ok(response),
        std::result::Result::Err(first_error) => {
            eprintln!("[step_generator] LLM call failed ({}), retrying once", first_error);
            match llm.generate(request()).await {
                std::result::Result::Ok(response) => std::result::Result::Ok(response),
                std::result::Result::Err(crate::ports::llm_port::LlmCallError::Timeout(_)) => {
                    eprintln!("[step_generator] LLM call timed out after one retry");
                    std::result::Result::Err(GenerationError::Timeout)
                }
                std::result::Result::Err(crate::ports::llm_port::LlmCallError::ServiceError(message)) => {
                    eprintln!("[step_generator] LLM service error after one retry: {}", message);
                    std::result::Result::Err(GenerationError::ServiceError(message))
                }
            }
        }
    }
}

/// Fixed system instructions, reused verbatim (plus a relabeling reminder on
/// the reparse attempt) so the prompt stays the only channel of control.
fn compose_prompt(
    chunk: &crate::domain::topic_chunk::TopicChunk,
    excerpts: &[crate::domain::excerpt::ScoredExcerpt],
    config: &crate::config::PipelineConfig,
    relabel_reminder: bool,
) -> std::string::String {
    let mut prompt = std::string::String::new();

    prompt.push_str(
        "You are generating one training step from a transcript topic. \
         Use the exact terminology found in the chunk. Use the excerpts only for \
         technical depth, never as a substitute for the chunk's content. Output \
         exactly one step, structured into four labeled sections: TITLE, OVERVIEW, \
         CONTENT, KEY ACTIONS.\n\n",
    );

    if relabel_reminder {
        prompt.push_str(
            "Your previous response could not be parsed. Repeat the four section \
             labels exactly as written (TITLE:, OVERVIEW:, CONTENT:, KEY ACTIONS:), \
             each at the start of its own line.\n\n",
        );
    }

    prompt.push_str(&std::format!("Tone: {}\nAudience: {}\n\n", config.tone, config.audience));

    prompt.push_str("CHUNK:\n");
    prompt.push_str(&chunk.text);
    prompt.push_str("\n\n");

    if !excerpts.is_empty() {
        prompt.push_str("EXCERPTS:\n");
        for scored in excerpts {
            prompt.push_str(&std::format!(
                "- ({}, relevance {:.2}) [{}]: {}\n",
                scored.excerpt.source_title,
                scored.score,
                scored.excerpt.source_url,
                scored.excerpt.text
            ));
        }
        prompt.push('\n');
    }

    prompt.push_str(&std::format!(
        "Constraints: KEY ACTIONS must contain between {} and {} bullet lines, each \
         beginning with one of: {}. CONTENT must contain at least {} words.\n",
        config.min_actions,
        config.max_actions,
        crate::util::STRONG_VERBS.join(", "),
        config.min_content_words
    ));

    prompt
}

struct ParsedSections {
    title: std::string::String,
    overview: std::string::String,
    content: std::string::String,
    actions: std::vec::Vec<std::string::String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Title,
    Overview,
    Content,
    Actions,
}

fn build_draft(chunk_id: usize, parts: ParsedSections) -> crate::domain::step_draft::StepDraft {
    crate::domain::step_draft::StepDraft {
        chunk_id,
        title: parts.title,
        overview: parts.overview,
        content: parts.content,
        actions: parts.actions,
    }
}

/// Line-based parser accepting both canonical and legacy section labels.
/// Returns `None` if no recognized section label is found anywhere in the
/// response, or if either TITLE or CONTENT ends up empty.
fn parse_response(text: &str) -> std::option::Option<ParsedSections> {
    let mut title = std::string::String::new();
    let mut overview = std::string::String::new();
    let mut content = std::string::String::new();
    let mut actions: std::vec::Vec<std::string::String> = std::vec::Vec::new();
    let mut current = Section::None;
    let mut saw_any_label = false;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let std::option::Option::Some((section, rest)) = match_label(line) {
            current = section;
            saw_any_label = true;
            let rest = rest.trim();
            if !rest.is_empty() {
                append_to_section(current, rest, &mut title, &mut overview, &mut content, &mut actions);
            }
            continue;
        }

        if current != Section::None {
            append_to_section(current, line, &mut title, &mut overview, &mut content, &mut actions);
        }
    }

    if !saw_any_label {
        return std::option::Option::None;
    }

    let title = title.trim().to_string();
    let overview = overview.trim().to_string();
    let content = content.trim().to_string();
    let actions: std::vec::Vec<std::string::String> =
        actions.into_iter().map(|a| crate::util::strip_bullet_marker(&a)).filter(|a| !a.is_empty()).collect();

    if title.is_empty() || content.is_empty() {
        return std::option::Option::None;
    }

    std::option::Option::Some(ParsedSections { title, overview, content, actions })
}

fn match_label(line: &str) -> std::option::Option<(Section, &str)> {
    let lower = line.to_lowercase();
    for (labels, section) in [
        (["title:", ""].as_slice(), Section::Title),
        (["overview:", "summary:"].as_slice(), Section::Overview),
        (["content:", "details:"].as_slice(), Section::Content),
        (["key actions:", "actions:"].as_slice(), Section::Actions),
    ] {
        for label in labels {
            if label.is_empty() {
                continue;
            }
            if lower.starts_with(label) {
                return std::option::Option::Some((section, &line[label.len()..]));
            }
        }
    }
    std::option::Option::None
}

fn append_to_section(
    section: Section,
    text: &str,
    title: &mut std::string::String,
    overview: &mut std::string::String,
    content: &mut std::string::String,
    actions: &mut std::vec::Vec<std::string::String>,
) {
    match section {
        Section::Title => {
            if !title.is_empty() {
                title.push(' ');
            }
            title.push_str(text);
        }
        Section::Overview => {
            if !overview.is_empty() {
                overview.push(' ');
            }
            overview.push_str(text);
        }
        Section::Content => {
            if !content.is_empty() {
                content.push(' ');
            }
            content.push_str(text);
        }
        Section::Actions => actions.push(text.to_string()),
        Section::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::topic_chunk::{ChunkClassification, TopicChunk};
    use crate::ports::llm_port::{LlmCallError, LlmPort, LlmRequest, LlmResponse};

    struct StubLlm {
        responses: std::sync::Mutex<std::vec::Vec<std::result::Result<std::string::String, LlmCallError>>>,
    }

    #[async_trait::async_trait]
    impl LlmPort for StubLlm {
        async fn generate(&self, _request: LlmRequest) -> std::result::Result<LlmResponse, LlmCallError> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return std::result::Result::Err(LlmCallError::ServiceError(std::string::String::from("exhausted")));
            }
            match responses.remove(0) {
                std::result::Result::Ok(text) => std::result::Result::Ok(LlmResponse { text, input_tokens: 10, output_tokens: 20 }),
                std::result::Result::Err(e) => std::result::Result::Err(e),
            }
        }
    }

    fn make_chunk() -> TopicChunk {
        TopicChunk {
            id: 0,
            sentence_ids: vec![0, 1, 2],
            text: std::string::String::from("Configure the load balancer for traffic routing."),
            qa_density: 0.0,
            importance: 0.5,
            classification: ChunkClassification::Instructional,
        }
    }

    const WELL_FORMED: &str = "TITLE: Configure the Load Balancer\n\
        OVERVIEW: This step covers load balancer configuration.\n\
        CONTENT: Configure the load balancer to route traffic evenly across backend instances so that no single instance becomes a bottleneck during peak load conditions and failover happens automatically when needed across the cluster today.\n\
        KEY ACTIONS:\n\
        - Configure the backend pool\n\
        - Enable health checks\n\
        - Verify traffic distribution\n";

    #[tokio::test]
    async fn test_parses_well_formed_response_on_first_attempt() {
        let llm = StubLlm { responses: std::sync::Mutex::new(vec![std::result::Result::Ok(WELL_FORMED.to_string())]) };
        let config = crate::config::PipelineConfig::default();
        let outcome = generate(&make_chunk(), &[], &llm, &config).await.unwrap();
        assert_eq!(outcome.draft.title, "Configure the Load Balancer");
        assert_eq!(outcome.draft.actions.len(), 3);
    }

    #[tokio::test]
    async fn test_accepts_legacy_labels() {
        let legacy = "TITLE: Configure the Load Balancer\n\
            SUMMARY: This step covers load balancer configuration.\n\
            DETAILS: Configure the load balancer to route traffic evenly across backend instances so that no single instance becomes a bottleneck during peak load conditions and failover happens automatically when needed across the cluster today.\n\
            ACTIONS:\n\
            - Configure the backend pool\n\
            - Enable health checks\n\
            - Verify traffic distribution\n";
        let llm = StubLlm { responses: std::sync::Mutex::new(vec![std::result::Result::Ok(legacy.to_string())]) };
        let config = crate::config::PipelineConfig::default();
        let outcome = generate(&make_chunk(), &[], &llm, &config).await.unwrap();
        assert_eq!(outcome.draft.actions.len(), 3);
    }

    #[tokio::test]
    async fn test_retries_once_on_parse_failure_then_succeeds() {
        let llm = StubLlm {
            responses: std::sync::Mutex::new(vec![
                std::result::Result::Ok(std::string::String::from("garbage response with no labels at all")),
                std::result::Result::Ok(WELL_FORMED.to_string()),
            ]),
        };
        let config = crate::config::PipelineConfig::default();
        let outcome = generate(&make_chunk(), &[], &llm, &config).await.unwrap();
        assert_eq!(outcome.draft.title, "Configure the Load Balancer");
    }

    #[tokio::test]
    async fn test_gives_up_after_second_parse_failure() {
        let llm = StubLlm {
            responses: std::sync::Mutex::new(vec![
                std::result::Result::Ok(std::string::String::from("garbage one")),
                std::result::Result::Ok(std::string::String::from("garbage two")),
            ]),
        };
        let config = crate::config::PipelineConfig::default();
        let result = generate(&make_chunk(), &[], &llm, &config).await;
        assert!(matches!(result, std::result::Result::Err(GenerationError::ParseFailure)));
    }

    #[tokio::test]
    async fn test_service_error_after_retry_propagates() {
        let llm = StubLlm {
            responses: std::sync::Mutex::new(vec![
                std::result::Result::Err(LlmCallError::ServiceError(std::string::String::from("boom"))),
                std::result::Result::Err(LlmCallError::ServiceError(std::string::String::from("boom again"))),
            ]),
        };
        let config = crate::config::PipelineConfig::default();
        let result = generate(&make_chunk(), &[], &llm, &config).await;
        assert!(matches!(result, std::result::Result::Err(GenerationError::ServiceError(_))));
    }

    #[test]
    fn test_parse_rejects_response_with_no_labels() {
        assert!(parse_response("just some plain text without any labels").is_none());
    }

    #[test]
    fn test_parse_strips_bullet_markers() {
        let parsed = parse_response(WELL_FORMED).unwrap();
        assert_eq!(parsed.actions[0], "Configure the backend pool");
    }
}
