//! Implementation of the 'pipeline default-config' command.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial default-config command.

/// Prints `PipelineConfig::default()` as pretty JSON, giving users a
/// starting point to edit and pass back via `--config-file`.
pub async fn execute() -> anyhow::Result<()> {
    let config = pipeline_core::config::PipelineConfig::default();
    let json = serde_json::to_string_pretty(&config)?;
    println!("{}", json);
    std::result::Result::Ok(())
}
