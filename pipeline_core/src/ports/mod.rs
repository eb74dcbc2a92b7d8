//! Port traits: the interfaces the pipeline engine depends on but does not
//! implement. Concrete implementations live under `crate::adapters`.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial ports module layout.

pub mod llm_port;
pub mod embedding_port;
pub mod http_client_port;
pub mod cache_store_port;
pub mod progress_sink_port;

pub use llm_port::{LlmPort, LlmRequest, LlmResponse};
pub use embedding_port::EmbeddingPort;
pub use http_client_port::{HttpClientPort, HttpResponse};
pub use cache_store_port::CacheStorePort;
pub use progress_sink_port::{PipelineStage, ProgressSinkPort, StageEvent};
