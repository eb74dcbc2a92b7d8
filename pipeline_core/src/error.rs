//! Error taxonomy for the training-step pipeline.
//!
//! Covers the conceptual failure kinds a pipeline invocation can surface:
//! invalid input, per-URL fetch errors, embedding backend unavailability,
//! per-chunk generation errors, insufficient content, no valid steps,
//! job timeout, cancellation, and internal invariant violations.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial PipelineError taxonomy.

/// Errors that can terminate a pipeline invocation.
///
/// Per-URL fetch failures and per-chunk generation failures are *not*
/// represented here: those are non-fatal and recorded on the affected
/// `KnowledgeSource`/chunk instead, per the pipeline's error propagation
/// rules. This enum covers only job-terminating conditions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The decoded transcript was empty or contained no sentence-terminating
    /// punctuation after cleanup, or the supplied config failed validation.
    #[error("invalid input: {message}")]
    InvalidInput { message: std::string::String },

    /// No chunk survived the filter/ranker stage.
    #[error("insufficient content: {message}\n{}", format_remediation(remediation))]
    InsufficientContent {
        message: std::string::String,
        remediation: std::vec::Vec<std::string::String>,
    },

    /// Every step draft was rejected by the validator.
    #[error("no valid steps: {message}\n{}", format_remediation(remediation))]
    NoValidSteps {
        message: std::string::String,
        remediation: std::vec::Vec<std::string::String>,
    },

    /// The configured whole-job soft timeout elapsed before completion.
    #[error("job timed out after {elapsed_seconds}s (limit {limit_seconds}s)")]
    JobTimeout {
        elapsed_seconds: u64,
        limit_seconds: u64,
    },

    /// The caller's cancellation signal fired.
    #[error("pipeline invocation cancelled")]
    Cancelled,

    /// A programming invariant was violated; this indicates a bug.
    #[error("internal invariant violated: {message}")]
    Internal { message: std::string::String },
}

/// Renders a numbered remediation list for display in an error message.
fn format_remediation(items: &[std::string::String]) -> std::string::String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| std::format!("  {}. {}", i + 1, item))
        .collect::<std::vec::Vec<_>>()
        .join("\n")
}

impl PipelineError {
    /// Constructs an `InsufficientContent` error with a standard remediation
    /// list referencing the thresholds most likely to have eliminated content.
    pub fn insufficient_content(
        message: impl Into<std::string::String>,
        importance_threshold: f64,
        min_confidence_threshold: f64,
    ) -> Self {
        PipelineError::InsufficientContent {
            message: message.into(),
            remediation: std::vec![
                std::format!(
                    "Lower importance_threshold (currently {:.2}) to retain more chunks",
                    importance_threshold
                ),
                std::format!(
                    "Lower min_confidence_threshold (currently {:.2}) if steps are being rejected upstream",
                    min_confidence_threshold
                ),
                std::string::String::from(
                    "Submit a longer or more clearly structured transcript with fewer Q&A-only segments",
                ),
            ],
        }
    }

    /// Constructs a `NoValidSteps` error, aggregating rejection reason
    /// counts collected across all rejected drafts.
    pub fn no_valid_steps(
        rejection_counts: &std::collections::BTreeMap<std::string::String, usize>,
    ) -> Self {
        let message = std::format!(
            "all {} draft(s) were rejected by the validator",
            rejection_counts.values().sum::<usize>()
        );
        let remediation = rejection_counts
            .iter()
            .map(|(reason, count)| std::format!("{} occurrence(s) of: {}", count, reason))
            .collect();
        PipelineError::NoValidSteps {
            message,
            remediation,
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
