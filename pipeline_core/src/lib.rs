//! Training-step pipeline engine.
//!
//! Turns a raw meeting or tutorial transcript, plus an optional set of
//! supporting knowledge URLs, into an ordered list of structured training
//! steps: a title, an overview, prose content, concrete actions, and the
//! transcript/knowledge sources each step is grounded on.
//!
//! The pipeline runs nine stages in order: normalize, fetch knowledge,
//! segment into topic chunks, filter and rank chunks by importance, select
//! supporting excerpts, generate a draft per chunk via an external LLM,
//! bind each draft back to its sources, validate drafts against quality
//! gates, and assemble the accepted steps with aggregate statistics. See
//! `pipeline::Pipeline` for the entry point.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial crate root.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod stages;
pub mod config;
pub mod error;
pub mod util;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineDeps, PipelineInput};
