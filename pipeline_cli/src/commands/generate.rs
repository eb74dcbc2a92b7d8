//! Implementation of the 'pipeline generate <TRANSCRIPT_FILE>' command.
//!
//! Wires the real adapters (reqwest-backed HTTP, on-disk cache, random
//! feature hashing embedding fallback, and the offline template LLM) into
//! `pipeline_core::Pipeline` and prints the assembled result.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial generate command.

/// Executes the 'pipeline generate' command.
///
/// Reads `transcript_file`, merges `config_file` (if given) over
/// `PipelineConfig::default()`, runs the pipeline against `urls`, and
/// writes the resulting steps as JSON either to stdout or to `output`.
pub async fn execute(
    transcript_file: &str,
    urls: &[std::string::String],
    config_file: std::option::Option<&str>,
    output: std::option::Option<&str>,
) -> anyhow::Result<()> {
    let raw_transcript_text = std::fs::read_to_string(transcript_file)
        .map_err(|e| anyhow::anyhow!("failed to read transcript file {}: {}", transcript_file, e))?;

    let config: pipeline_core::config::PipelineConfig = match config_file {
        std::option::Option::Some(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read config file {}: {}", path, e))?;
            serde_json::from_str(&contents).map_err(|e| anyhow::anyhow!("invalid config JSON: {}", e))?
        }
        std::option::Option::None => pipeline_core::config::PipelineConfig::default(),
    };
    let config = config.with_env_overrides();

    let cache_dir = config.cache_dir.clone();
    let deps = pipeline_core::pipeline::PipelineDeps {
        llm: std::sync::Arc::new(pipeline_core::adapters::TemplateLlm::new()),
        embedding: std::option::Option::Some(std::sync::Arc::new(pipeline_core::adapters::LexicalEmbeddingFallback::new())),
        http: std::sync::Arc::new(pipeline_core::adapters::ReqwestHttpClient::new()),
        cache: std::sync::Arc::new(pipeline_core::adapters::FileCacheStore::new(cache_dir)),
    };
    let pipeline = pipeline_core::pipeline::Pipeline::new(deps);

    let input = pipeline_core::pipeline::PipelineInput {
        raw_transcript_text,
        knowledge_urls: urls.to_vec(),
    };

    println!("Running pipeline on {}...", transcript_file);
    if !urls.is_empty() {
        println!("Fetching {} knowledge source(s)...", urls.len());
    }

    let sink = crate::display::ConsoleProgressSink;
    let cancellation = tokio_util::sync::CancellationToken::new();
    let result = pipeline
        .run(input, config, &sink, cancellation)
        .await
        .map_err(|e| anyhow::anyhow!("pipeline failed: {}", e))?;

    println!();
    println!(
        "Generated {} step(s) ({} rejected, {} generation failure(s))",
        result.stats.steps_accepted, result.stats.steps_rejected, result.stats.drafts_generation_failed
    );
    println!("Average confidence: {:.2}", result.stats.average_confidence);
    println!();

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| anyhow::anyhow!("failed to serialize result: {}", e))?;

    match output {
        std::option::Option::Some(path) => {
            std::fs::write(path, &json).map_err(|e| anyhow::anyhow!("failed to write output file {}: {}", path, e))?;
            println!("Wrote result to {}", path);
        }
        std::option::Option::None => {
            println!("{}", json);
        }
    }

    std::result::Result::Ok(())
}
