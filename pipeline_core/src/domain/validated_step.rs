//! ValidatedStep domain entity produced by the step validator.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial ValidatedStep/QualityLevel definitions.

/// A coarse quality band derived monotonically from `confidence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum QualityLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl QualityLevel {
    /// Derives the quality level from a clipped confidence value in `[0, 1]`.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.75 {
            QualityLevel::VeryHigh
        } else if confidence >= 0.55 {
            QualityLevel::High
        } else if confidence >= 0.35 {
            QualityLevel::Medium
        } else if confidence >= 0.20 {
            QualityLevel::Low
        } else {
            QualityLevel::VeryLow
        }
    }
}

/// The final output of the step validator for one draft.
///
/// # Examples
///
/// ```
/// use pipeline_core::domain::validated_step::QualityLevel;
///
/// assert_eq!(QualityLevel::from_confidence(0.80), QualityLevel::VeryHigh);
/// assert_eq!(QualityLevel::from_confidence(0.10), QualityLevel::VeryLow);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct ValidatedStep {
    pub draft: crate::domain::step_draft::StepDraft,
    pub sources: std::vec::Vec<crate::domain::source_ref::SourceRef>,
    pub confidence: f64,
    pub quality_level: QualityLevel,
    pub accepted: bool,
    pub rejection_reasons: std::vec::Vec<std::string::String>,
}
