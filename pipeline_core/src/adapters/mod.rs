//! Concrete adapters implementing the port traits in `crate::ports`.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial adapters module layout.

pub mod reqwest_http_client;
pub mod file_cache_store;
pub mod lexical_embedding_fallback;
pub mod template_llm;

pub use reqwest_http_client::ReqwestHttpClient;
pub use file_cache_store::FileCacheStore;
pub use lexical_embedding_fallback::LexicalEmbeddingFallback;
pub use template_llm::TemplateLlm;
