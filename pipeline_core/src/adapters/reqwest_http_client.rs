//! HTTP client adapter using reqwest.
//!
//! Grounded on the reqwest-based crawler adapter pattern used elsewhere in
//! this workspace family: a thin wrapper around `reqwest::Client` that maps
//! transport errors onto the port's error type.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial ReqwestHttpClient adapter.

/// HTTP client backed by `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        ReqwestHttpClient {
            client: reqwest::Client::builder()
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestHttpClient { client }
    }
}

impl std::default::Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::ports::http_client_port::HttpClientPort for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        timeout: std::time::Duration,
    ) -> std::result::Result<crate::ports::http_client_port::HttpResponse, crate::ports::http_client_port::HttpCallError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    crate::ports::http_client_port::HttpCallError::Timeout {
                        url: url.to_string(),
                        timeout,
                    }
                } else {
                    crate::ports::http_client_port::HttpCallError::Failed {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::String::from);

        let body = response
            .bytes()
            .await
            .map_err(|e| crate::ports::http_client_port::HttpCallError::Failed {
                url: url.to_string(),
                message: e.to_string(),
            })?
            .to_vec();

        std::result::Result::Ok(crate::ports::http_client_port::HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
