//! Configuration for a pipeline invocation.
//!
//! `PipelineConfig` is the single configuration value recognized by the
//! pipeline entry point. Every stage tunable lives here; there is no other
//! route to configure stage behavior (no ad-hoc keyword arguments scattered
//! across stages).
//!
//! Revision History
//! - 2026-07-28 @AI: Initial PipelineConfig with validation.

/// Configuration accepted by a single pipeline invocation.
///
/// # Examples
///
/// ```
/// use pipeline_core::config::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.min_confidence_threshold, 0.40);
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Free-form tone descriptor injected into the generation prompt.
    pub tone: std::string::String,
    /// Free-form audience descriptor injected into the generation prompt.
    pub audience: std::string::String,

    /// Minimum number of topic chunks the segmenter should aim to produce.
    pub min_steps: usize,
    /// Target number of topic chunks.
    pub target_steps: usize,
    /// Maximum number of topic chunks.
    pub max_steps: usize,

    /// Minimum validator confidence for a step draft to be accepted.
    pub min_confidence_threshold: f64,
    /// Minimum chunk importance to survive the filter/ranker stage.
    pub importance_threshold: f64,
    /// Q&A density at or above which a short chunk is classified
    /// `qa_clarification`.
    pub qa_density_threshold: f64,

    /// Minimum accepted action count per step.
    pub min_actions: usize,
    /// Maximum accepted action count per step.
    pub max_actions: usize,
    /// Minimum content word count per step.
    pub min_content_words: usize,

    /// Maximum retained characters per fetched knowledge source.
    pub max_content_length_per_source: usize,

    /// Whether the embedding backend should be used when available.
    pub embedding_enabled: bool,
    /// Weight applied to semantic (embedding) match score in the source binder.
    pub semantic_match_weight: f64,
    /// Weight applied to lexical (Jaccard) match score in the source binder.
    pub word_match_weight: f64,

    /// Per-LLM-call timeout, in seconds.
    pub llm_timeout_seconds: u64,
    /// Per-URL fetch timeout, in seconds.
    pub url_timeout_seconds: u64,
    /// Whole-job soft timeout, in seconds.
    pub job_timeout_seconds: u64,

    /// Maximum number of chunks generated concurrently.
    pub max_concurrent_generations: usize,
    /// Maximum number of URLs fetched concurrently.
    pub max_concurrent_fetches: usize,

    /// Directory used for the on-disk knowledge cache.
    pub cache_dir: std::string::String,
    /// Cache entry time-to-live, in seconds.
    pub cache_ttl_seconds: u64,
    /// Whether the on-disk cache is consulted/populated at all.
    pub cache_enabled: bool,
}

impl std::default::Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            tone: std::string::String::from("Professional"),
            audience: std::string::String::from("Technical Users"),
            min_steps: 3,
            target_steps: 8,
            max_steps: 50,
            min_confidence_threshold: 0.40,
            importance_threshold: 0.15,
            qa_density_threshold: 0.50,
            min_actions: 3,
            max_actions: 6,
            min_content_words: 50,
            max_content_length_per_source: 100_000,
            embedding_enabled: true,
            semantic_match_weight: 0.5,
            word_match_weight: 0.5,
            llm_timeout_seconds: 60,
            url_timeout_seconds: 30,
            job_timeout_seconds: 600,
            max_concurrent_generations: 4,
            max_concurrent_fetches: 8,
            cache_dir: std::string::String::from(".pipeline_cache"),
            cache_ttl_seconds: 86_400,
            cache_enabled: true,
        }
    }
}

impl PipelineConfig {
    /// Applies a small set of environment variable overrides on top of an
    /// already-loaded config, mirroring the provider/model env var
    /// convention used to build an `Orchestrator` from the environment.
    /// Unset or unparseable variables are left at their current value.
    ///
    /// Recognized variables: `PIPELINE_CACHE_DIR`, `PIPELINE_CACHE_ENABLED`,
    /// `PIPELINE_JOB_TIMEOUT_SECONDS`, `PIPELINE_EMBEDDING_ENABLED`.
    pub fn with_env_overrides(mut self) -> Self {
        if let std::result::Result::Ok(value) = std::env::var("PIPELINE_CACHE_DIR") {
            self.cache_dir = value;
        }
        if let std::result::Result::Ok(value) = std::env::var("PIPELINE_CACHE_ENABLED") {
            if let std::result::Result::Ok(parsed) = value.parse() {
                self.cache_enabled = parsed;
            }
        }
        if let std::result::Result::Ok(value) = std::env::var("PIPELINE_JOB_TIMEOUT_SECONDS") {
            if let std::result::Result::Ok(parsed) = value.parse() {
                self.job_timeout_seconds = parsed;
            }
        }
        if let std::result::Result::Ok(value) = std::env::var("PIPELINE_EMBEDDING_ENABLED") {
            if let std::result::Result::Ok(parsed) = value.parse() {
                self.embedding_enabled = parsed;
            }
        }
        self
    }

    /// Validates the recognized option set, returning a descriptive
    /// `PipelineError::InvalidInput` on the first violation found.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipeline_core::config::PipelineConfig;
    ///
    /// let mut config = PipelineConfig::default();
    /// config.max_steps = 1;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> crate::error::PipelineResult<()> {
        if !(3 <= self.min_steps && self.min_steps <= self.target_steps && self.target_steps <= self.max_steps && self.max_steps <= 50) {
            return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
                message: std::format!(
                    "step bounds must satisfy 3 <= min_steps <= target_steps <= max_steps <= 50, got min={} target={} max={}",
                    self.min_steps, self.target_steps, self.max_steps
                ),
            });
        }
        if self.min_actions == 0 || self.min_actions > self.max_actions {
            return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
                message: std::format!(
                    "min_actions must be > 0 and <= max_actions, got min={} max={}",
                    self.min_actions, self.max_actions
                ),
            });
        }
        for (name, value) in [
            ("min_confidence_threshold", self.min_confidence_threshold),
            ("importance_threshold", self.importance_threshold),
            ("qa_density_threshold", self.qa_density_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
                    message: std::format!("{} must be in [0, 1], got {}", name, value),
                });
            }
        }
        let weight_sum = self.semantic_match_weight + self.word_match_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
                message: std::format!(
                    "semantic_match_weight + word_match_weight must sum to 1.0, got {}",
                    weight_sum
                ),
            });
        }
        if self.max_concurrent_fetches == 0 || self.max_concurrent_generations == 0 {
            return std::result::Result::Err(crate::error::PipelineError::InvalidInput {
                message: std::string::String::from(
                    "max_concurrent_fetches and max_concurrent_generations must be > 0",
                ),
            });
        }
        std::result::Result::Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_step_bounds() {
        let mut config = PipelineConfig::default();
        config.min_steps = 10;
        config.target_steps = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let mut config = PipelineConfig::default();
        config.semantic_match_weight = 0.7;
        config.word_match_weight = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let mut config = PipelineConfig::default();
        config.max_concurrent_fetches = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_env_override_applies_recognized_variable() {
        unsafe {
            std::env::set_var("PIPELINE_JOB_TIMEOUT_SECONDS", "120");
        }
        let config = PipelineConfig::default().with_env_overrides();
        unsafe {
            std::env::remove_var("PIPELINE_JOB_TIMEOUT_SECONDS");
        }
        assert_eq!(config.job_timeout_seconds, 120);
    }

    #[test]
    fn test_deserialize_from_partial_json() {
        let json = r#"{"tone": "Friendly"}"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tone, "Friendly");
        assert_eq!(config.audience, "Technical Users");
    }
}
