//! HTTP client port used by the knowledge fetcher.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial HttpClientPort trait.

/// A minimal HTTP response: status, a small set of headers, and the body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: std::option::Option<std::string::String>,
    pub body: std::vec::Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpCallError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: std::string::String, timeout: std::time::Duration },
    #[error("request to {url} failed: {message}")]
    Failed { url: std::string::String, message: std::string::String },
}

/// Port for the external HTTP client collaborator.
#[async_trait::async_trait]
pub trait HttpClientPort: std::marker::Send + std::marker::Sync {
    async fn get(&self, url: &str, timeout: std::time::Duration) -> std::result::Result<HttpResponse, HttpCallError>;
}
