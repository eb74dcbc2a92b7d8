//! Embedding service port: converts texts into fixed-dimension dense
//! vectors for semantic similarity search. Optional: the pipeline falls
//! back to lexical scoring when this backend is unavailable at startup.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial EmbeddingPort trait.

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingCallError {
    #[error("embedding backend unavailable: {0}")]
    Unavailable(std::string::String),
}

/// Port for the external embedding collaborator.
#[async_trait::async_trait]
pub trait EmbeddingPort: std::marker::Send + std::marker::Sync {
    /// Embeds a batch of texts, returning one vector per input in order.
    /// All returned vectors share a fixed dimension.
    async fn embed(&self, texts: &[std::string::String]) -> std::result::Result<std::vec::Vec<std::vec::Vec<f32>>, EmbeddingCallError>;
}
