//! Deterministic, offline `LlmPort` adapter: composes a step draft directly
//! from the prompt's chunk text without any network call.
//!
//! The pipeline treats the LLM as an external collaborator reached over the
//! network; this adapter exists so the CLI and tests have a zero-dependency
//! implementation to wire in when no real text-generation endpoint is
//! configured, mirroring the role `LexicalEmbeddingFallback` plays for the
//! embedding port.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial TemplateLlm adapter.

/// Offline `LlmPort` implementation. Extracts the chunk text verbatim out of
/// the prompt body (between the `CHUNK:` and `EXCERPTS:`/`Constraints:`
/// markers `step_generator::compose_prompt` emits) and renders it into the
/// labeled section format the generator's parser expects.
pub struct TemplateLlm;

impl TemplateLlm {
    pub fn new() -> Self {
        TemplateLlm
    }
}

impl std::default::Default for TemplateLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::ports::llm_port::LlmPort for TemplateLlm {
    async fn generate(
        &self,
        request: crate::ports::llm_port::LlmRequest,
    ) -> std::result::Result<crate::ports::llm_port::LlmResponse, crate::ports::llm_port::LlmCallError> {
        let chunk_text = extract_chunk_text(&request.prompt).unwrap_or_default();
        let sentences: std::vec::Vec<&str> = chunk_text
            .split(['.', '?', '!'])
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let title = sentences
            .first()
            .map(|s| crate::util::truncate_at_word_boundary(s, 60))
            .unwrap_or_else(|| std::string::String::from("Review this step"));
        let overview = sentences
            .first()
            .map(|s| s.to_string())
            .unwrap_or_else(|| std::string::String::from("No overview available."));
        let content = chunk_text.clone();

        let actions: std::vec::Vec<std::string::String> = sentences
            .iter()
            .skip(1)
            .take(4)
            .map(|s| std::format!("Configure {}", s.to_lowercase()))
            .collect();
        let actions = if actions.len() < 3 {
            std::vec![
                std::format!("Configure the setup described above"),
                std::format!("Verify the configuration takes effect"),
                std::format!("Review the outcome against expectations"),
            ]
        } else {
            actions
        };

        let mut text = std::string::String::new();
        text.push_str(&std::format!("TITLE: {}\n", title));
        text.push_str(&std::format!("OVERVIEW: {}\n", overview));
        text.push_str(&std::format!("CONTENT: {}\n", content));
        text.push_str("KEY ACTIONS:\n");
        for action in &actions {
            text.push_str(&std::format!("- {}\n", action));
        }

        std::result::Result::Ok(crate::ports::llm_port::LlmResponse {
            input_tokens: (request.prompt.split_whitespace().count()) as u64,
            output_tokens: (text.split_whitespace().count()) as u64,
            text,
        })
    }
}

fn extract_chunk_text(prompt: &str) -> std::option::Option<std::string::String> {
    let marker = "CHUNK:\n";
    let start = prompt.find(marker)? + marker.len();
    let rest = &prompt[start..];
    let end = ["EXCERPTS:", "Constraints:"]
        .iter()
        .filter_map(|m| rest.find(m))
        .min()
        .unwrap_or(rest.len());
    std::option::Option::Some(rest[..end].trim().to_string())
}
