//! LLM service port: a synchronous-from-the-caller's-standpoint text
//! generation collaborator, treated as an opaque pure function from prompt
//! to structured text. The pipeline never hardcodes a model identity.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial LlmPort trait.

/// Parameters for one LLM call.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: std::string::String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    pub timeout: std::time::Duration,
}

/// The result of one LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: std::string::String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Errors an `LlmPort` implementation may surface. These are distinct from
/// `PipelineError::GenerationError` semantics: the step generator stage
/// interprets them and decides whether to retry.
#[derive(Debug, thiserror::Error)]
pub enum LlmCallError {
    #[error("LLM call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("LLM service error: {0}")]
    ServiceError(std::string::String),
}

/// Port for the external large-language-model collaborator.
///
/// Implementations must not block the calling task; use an async runtime
/// suspension point for the network call.
#[async_trait::async_trait]
pub trait LlmPort: std::marker::Send + std::marker::Sync {
    async fn generate(&self, request: LlmRequest) -> std::result::Result<LlmResponse, LlmCallError>;
}
