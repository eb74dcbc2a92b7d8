//! Deterministic lexical embedding fallback.
//!
//! When no real embedding backend is configured, the pipeline still wants a
//! dense vector it can cosine-compare cheaply and deterministically. This
//! adapter hashes word n-grams into a fixed-dimension +/-1 feature vector
//! (random feature hashing) and L2-normalizes it, approximating semantic
//! similarity without any ML runtime or model weights.
//!
//! This is independent of, and sits below, the excerpt selector's and
//! source binder's own Jaccard-over-token-sets fallback
//! (`crate::stages::excerpt_selector`): those stages score with Jaccard
//! directly when the embedding backend is unavailable. This adapter exists
//! so that an `EmbeddingPort` object is always available to wire into the
//! pipeline even with no network-backed embedding service configured.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial LexicalEmbeddingFallback adapter.

const DIM: usize = 256;

/// Embedding backend using random feature hashing over word 1..3-grams.
pub struct LexicalEmbeddingFallback;

impl LexicalEmbeddingFallback {
    pub fn new() -> Self {
        LexicalEmbeddingFallback
    }

    fn embed_one(text: &str) -> std::vec::Vec<f32> {
        let tokens = crate::util::tokenize(text);
        let mut vector = vec![0.0f32; DIM];

        for n in 1..=3usize {
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                let (index, sign) = Self::hash_gram(&gram);
                vector[index] += sign;
            }
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        vector
    }

    fn hash_gram(gram: &str) -> (usize, f32) {
        let mut hasher = <sha2::Sha256 as sha2::Digest>::new();
        sha2::Digest::update(&mut hasher, gram.as_bytes());
        let digest = sha2::Digest::finalize(hasher);
        let index = (u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize) % DIM;
        let sign = if digest[4] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl std::default::Default for LexicalEmbeddingFallback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::ports::embedding_port::EmbeddingPort for LexicalEmbeddingFallback {
    async fn embed(
        &self,
        texts: &[std::string::String],
    ) -> std::result::Result<std::vec::Vec<std::vec::Vec<f32>>, crate::ports::embedding_port::EmbeddingCallError> {
        std::result::Result::Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }
}

/// Cosine similarity between two equal-length vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::embedding_port::EmbeddingPort;

    #[tokio::test]
    async fn test_identical_text_has_similarity_one() {
        let embedder = LexicalEmbeddingFallback::new();
        let texts = vec![
            std::string::String::from("configure the load balancer"),
            std::string::String::from("configure the load balancer"),
        ];
        let vectors = embedder.embed(&texts).await.unwrap();
        let score = cosine_similarity(&vectors[0], &vectors[1]);
        assert!((score - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_unrelated_text_has_lower_similarity() {
        let embedder = LexicalEmbeddingFallback::new();
        let texts = vec![
            std::string::String::from("configure the load balancer for traffic routing"),
            std::string::String::from("bananas are a good source of potassium"),
        ];
        let vectors = embedder.embed(&texts).await.unwrap();
        let score = cosine_similarity(&vectors[0], &vectors[1]);
        assert!(score < 0.3);
    }

    #[tokio::test]
    async fn test_deterministic_across_calls() {
        let embedder = LexicalEmbeddingFallback::new();
        let texts = vec![std::string::String::from("deploy the new release")];
        let first = embedder.embed(&texts).await.unwrap();
        let second = embedder.embed(&texts).await.unwrap();
        assert_eq!(first, second);
    }
}
