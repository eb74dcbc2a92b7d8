//! Knowledge fetcher + cache: retrieves URL contents, normalizes to text,
//! and caches with TTL. Never fails the pipeline: any per-URL failure
//! yields a `KnowledgeSource` with a non-null `error`.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial knowledge fetcher implementation.

/// Fetches all `urls`, returning one `KnowledgeSource` per URL in input
/// order. Dispatches up to `config.max_concurrent_fetches` fetches
/// concurrently; each has its own `config.url_timeout_seconds` timeout.
///
/// Aborts outstanding fetches and returns early if `cancellation` fires.
pub async fn fetch_all(
    urls: &[std::string::String],
    http: &dyn crate::ports::http_client_port::HttpClientPort,
    cache: &dyn crate::ports::cache_store_port::CacheStorePort,
    config: &crate::config::PipelineConfig,
    cancellation: &tokio_util::sync::CancellationToken,
) -> std::vec::Vec<crate::domain::knowledge_source::KnowledgeSource> {
    use futures::stream::StreamExt;

    if urls.is_empty() {
        return std::vec::Vec::new();
    }

    let indexed: std::vec::Vec<(usize, &std::string::String)> = urls.iter().enumerate().collect();

    let mut results: std::vec::Vec<(usize, crate::domain::knowledge_source::KnowledgeSource)> =
        futures::stream::iter(indexed)
            .map(|(idx, url)| async move {
                let source = fetch_one(url, http, cache, config, cancellation).await;
                (idx, source)
            })
            .buffer_unordered(config.max_concurrent_fetches)
            .collect()
            .await;

    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, source)| source).collect()
}

async fn fetch_one(
    url: &str,
    http: &dyn crate::ports::http_client_port::HttpClientPort,
    cache: &dyn crate::ports::cache_store_port::CacheStorePort,
    config: &crate::config::PipelineConfig,
    cancellation: &tokio_util::sync::CancellationToken,
) -> crate::domain::knowledge_source::KnowledgeSource {
    if cancellation.is_cancelled() {
        return crate::domain::knowledge_source::KnowledgeSource::failed(url, "cancelled");
    }

    if config.cache_enabled {
        if let std::option::Option::Some(entry) = cache.get(url).await {
            let age_seconds = current_unix_seconds().saturating_sub(entry.fetched_at_unix_seconds);
            if age_seconds < config.cache_ttl_seconds {
                return entry.source;
            }
        }
    }

    let timeout = std::time::Duration::from_secs(config.url_timeout_seconds);

    let fetch_future = http.get(url, timeout);
    let outcome = tokio::select! {
        biased;
        _ = cancellation.cancelled() => {
            return crate::domain::knowledge_source::KnowledgeSource::failed(url, "cancelled");
        }
        result = fetch_future => result,
    };

    let source = match outcome {
        std::result::Result::Ok(response) => build_source(url, response, config),
        std::result::Result::Err(crate::ports::http_client_port::HttpCallError::Timeout { .. }) => {
            eprintln!("[knowledge_fetcher] timeout fetching {}", url);
            crate::domain::knowledge_source::KnowledgeSource::failed(url, "request timed out")
        }
        std::result::Result::Err(crate::ports::http_client_port::HttpCallError::Failed { message, .. }) => {
            eprintln!("[knowledge_fetcher] failed fetching {}: {}", url, message);
            crate::domain::knowledge_source::KnowledgeSource::failed(url, message)
        }
    };

    if config.cache_enabled && source.error.is_none() {
        let entry = crate::ports::cache_store_port::CacheEntry {
            fetched_at_unix_seconds: current_unix_seconds(),
            source: source.clone(),
        };
        cache.put(url, &entry).await;
    }

    source
}

fn build_source(
    url: &str,
    response: crate::ports::http_client_port::HttpResponse,
    config: &crate::config::PipelineConfig,
) -> crate::domain::knowledge_source::KnowledgeSource {
    if !(200..300).contains(&response.status) {
        return crate::domain::knowledge_source::KnowledgeSource::failed(
            url,
            std::format!("non-2xx status: {}", response.status),
        );
    }

    let is_html = response
        .content_type
        .as_deref()
        .map(|ct| ct.contains("text/html"))
        .unwrap_or(false);
    let is_pdf = response
        .content_type
        .as_deref()
        .map(|ct| ct.contains("application/pdf"))
        .unwrap_or(false);

    let (media_type, title, content) = if is_pdf {
        match pdf_extract::extract_text_from_mem(&response.body) {
            std::result::Result::Ok(text) => (
                crate::domain::knowledge_source::MediaType::Pdf,
                std::string::String::new(),
                text,
            ),
            std::result::Result::Err(e) => {
                return crate::domain::knowledge_source::KnowledgeSource::failed(
                    url,
                    std::format!("failed to extract PDF text: {}", e),
                );
            }
        }
    } else if is_html {
        let html = std::string::String::from_utf8_lossy(&response.body).into_owned();
        let (title, content) = extract_html_main_content(&html);
        (crate::domain::knowledge_source::MediaType::Web, title, content)
    } else {
        let text = std::string::String::from_utf8_lossy(&response.body).into_owned();
        (crate::domain::knowledge_source::MediaType::Text, std::string::String::new(), text)
    };

    let normalized = crate::util::normalize_whitespace(&content);
    let truncated = crate::util::truncate_at_word_boundary(&normalized, config.max_content_length_per_source);

    crate::domain::knowledge_source::KnowledgeSource {
        url: url.to_string(),
        title,
        content: truncated,
        media_type,
        error: std::option::Option::None,
    }
}

/// Strips `<script>`, `<style>`, `<nav>`, `<footer>`, and `<aside>` blocks
/// before parsing, then extracts the page title and body text via
/// `scraper`. Entity decoding is handled by the HTML parser itself.
fn extract_html_main_content(html: &str) -> (std::string::String, std::string::String) {
    let mut cleaned = html.to_string();
    for tag in ["script", "style", "nav", "footer", "aside"] {
        if let std::result::Result::Ok(re) =
            regex::Regex::new(&std::format!(r"(?is)<{tag}[^>]*>.*?</{tag}>", tag = tag))
        {
            cleaned = re.replace_all(&cleaned, " ").into_owned();
        }
    }

    let document = scraper::Html::parse_document(&cleaned);

    let title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<std::string::String>().trim().to_string())
        .unwrap_or_default();

    let body_text = scraper::Selector::parse("body")
        .ok()
        .map(|sel| {
            document
                .select(&sel)
                .map(|el| el.text().collect::<std::vec::Vec<_>>().join(" "))
                .collect::<std::vec::Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    (title, body_text)
}

fn current_unix_seconds() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::cache_store_port::{CacheEntry, CacheStorePort};
    use crate::ports::http_client_port::{HttpCallError, HttpClientPort, HttpResponse};

    struct StubHttpClient {
        responses: std::collections::HashMap<std::string::String, std::result::Result<HttpResponse, std::string::String>>,
        call_count: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl HttpClientPort for StubHttpClient {
        async fn get(&self, url: &str, _timeout: std::time::Duration) -> std::result::Result<HttpResponse, HttpCallError> {
            self.call_count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match self.responses.get(url) {
                std::option::Option::Some(std::result::Result::Ok(resp)) => std::result::Result::Ok(resp.clone()),
                std::option::Option::Some(std::result::Result::Err(msg)) => {
                    std::result::Result::Err(HttpCallError::Failed { url: url.to_string(), message: msg.clone() })
                }
                std::option::Option::None => {
                    std::result::Result::Err(HttpCallError::Failed { url: url.to_string(), message: std::string::String::from("no stub") })
                }
            }
        }
    }

    struct NullCache;

    #[async_trait::async_trait]
    impl CacheStorePort for NullCache {
        async fn get(&self, _key: &str) -> std::option::Option<CacheEntry> {
            std::option::Option::None
        }
        async fn put(&self, _key: &str, _entry: &CacheEntry) {}
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_input_order() {
        let mut responses = std::collections::HashMap::new();
        responses.insert(
            std::string::String::from("https://a.example"),
            std::result::Result::Ok(HttpResponse { status: 200, content_type: Some("text/plain".to_string()), body: b"A content".to_vec() }),
        );
        responses.insert(
            std::string::String::from("https://b.example"),
            std::result::Result::Ok(HttpResponse { status: 200, content_type: Some("text/plain".to_string()), body: b"B content".to_vec() }),
        );
        let http = StubHttpClient { responses, call_count: std::sync::atomic::AtomicUsize::new(0) };
        let cache = NullCache;
        let config = crate::config::PipelineConfig::default();
        let token = tokio_util::sync::CancellationToken::new();

        let urls = vec!["https://a.example".to_string(), "https://b.example".to_string()];
        let results = fetch_all(&urls, &http, &cache, &config, &token).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://a.example");
        assert_eq!(results[1].url, "https://b.example");
    }

    #[tokio::test]
    async fn test_non_2xx_records_error_and_continues() {
        let mut responses = std::collections::HashMap::new();
        responses.insert(
            std::string::String::from("https://bad.example"),
            std::result::Result::Ok(HttpResponse { status: 500, content_type: None, body: vec![] }),
        );
        let http = StubHttpClient { responses, call_count: std::sync::atomic::AtomicUsize::new(0) };
        let cache = NullCache;
        let config = crate::config::PipelineConfig::default();
        let token = tokio_util::sync::CancellationToken::new();

        let urls = vec!["https://bad.example".to_string()];
        let results = fetch_all(&urls, &http, &cache, &config, &token).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].error.is_some());
    }

    #[tokio::test]
    async fn test_zero_urls_returns_empty() {
        let http = StubHttpClient { responses: std::collections::HashMap::new(), call_count: std::sync::atomic::AtomicUsize::new(0) };
        let cache = NullCache;
        let config = crate::config::PipelineConfig::default();
        let token = tokio_util::sync::CancellationToken::new();
        let results = fetch_all(&[], &http, &cache, &config, &token).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        struct CountingCache {
            entry: CacheEntry,
        }

        #[async_trait::async_trait]
        impl CacheStorePort for CountingCache {
            async fn get(&self, _key: &str) -> std::option::Option<CacheEntry> {
                std::option::Option::Some(self.entry.clone())
            }
            async fn put(&self, _key: &str, _entry: &CacheEntry) {}
        }

        let source = crate::domain::knowledge_source::KnowledgeSource {
            url: std::string::String::from("https://cached.example"),
            title: std::string::String::from("Cached"),
            content: std::string::String::from("cached content"),
            media_type: crate::domain::knowledge_source::MediaType::Text,
            error: std::option::Option::None,
        };
        let cache = CountingCache { entry: CacheEntry { fetched_at_unix_seconds: current_unix_seconds(), source } };
        let http = StubHttpClient { responses: std::collections::HashMap::new(), call_count: std::sync::atomic::AtomicUsize::new(0) };
        let config = crate::config::PipelineConfig::default();
        let token = tokio_util::sync::CancellationToken::new();

        let urls = vec!["https://cached.example".to_string()];
        let results = fetch_all(&urls, &http, &cache, &config, &token).await;

        assert_eq!(results[0].content, "cached content");
        assert_eq!(http.call_count.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
