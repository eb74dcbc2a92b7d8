//! Top-level pipeline orchestrator: wires the nine stages together,
//! restoring chunk order after concurrent step generation, enforcing the
//! whole-job soft timeout, and propagating cancellation.
//!
//! Revision History
//! - 2026-07-28 @AI: Initial Pipeline orchestrator.

/// Input accepted by one pipeline invocation.
pub struct PipelineInput {
    pub raw_transcript_text: std::string::String,
    pub knowledge_urls: std::vec::Vec<std::string::String>,
}

/// The external collaborators a `Pipeline` is constructed with. All but the
/// embedding port are required; an absent embedding port degrades the
/// semantic stages to their documented lexical fallback.
pub struct PipelineDeps {
    pub llm: std::sync::Arc<dyn crate::ports::llm_port::LlmPort>,
    pub embedding: std::option::Option<std::sync::Arc<dyn crate::ports::embedding_port::EmbeddingPort>>,
    pub http: std::sync::Arc<dyn crate::ports::http_client_port::HttpClientPort>,
    pub cache: std::sync::Arc<dyn crate::ports::cache_store_port::CacheStorePort>,
}

/// The staged transcript-to-training-steps processor.
///
/// One `Pipeline` may be reused across many `run` invocations; it owns no
/// per-job mutable state.
pub struct Pipeline {
    deps: PipelineDeps,
}

impl Pipeline {
    pub fn new(deps: PipelineDeps) -> Self {
        Pipeline { deps }
    }

    /// Runs one pipeline invocation to completion, or fails with a
    /// `PipelineError`.
    pub async fn run(
        &self,
        input: PipelineInput,
        config: crate::config::PipelineConfig,
        progress: &dyn crate::ports::progress_sink_port::ProgressSinkPort,
        cancellation: tokio_util::sync::CancellationToken,
    ) -> crate::error::PipelineResult<crate::domain::pipeline_result::PipelineResult> {
        config.validate()?;

        let job_timeout = std::time::Duration::from_secs(config.job_timeout_seconds);
        let run_future = self.run_inner(input, config, progress, cancellation.clone());

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => std::result::Result::Err(crate::error::PipelineError::Cancelled),
            outcome = tokio::time::timeout(job_timeout, run_future) => {
                match outcome {
                    std::result::Result::Ok(result) => result,
                    std::result::Result::Err(_elapsed) => std::result::Result::Err(crate::error::PipelineError::JobTimeout {
                        elapsed_seconds: job_timeout.as_secs(),
                        limit_seconds: job_timeout.as_secs(),
                    }),
                }
            }
        }
    }

    async fn run_inner(
        &self,
        input: PipelineInput,
        config: crate::config::PipelineConfig,
        progress: &dyn crate::ports::progress_sink_port::ProgressSinkPort,
        cancellation: tokio_util::sync::CancellationToken,
    ) -> crate::error::PipelineResult<crate::domain::pipeline_result::PipelineResult> {
        let mut stage_durations_ms = std::collections::BTreeMap::new();

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::Normalizing, 0.0, std::option::Option::None));
        let started = std::time::Instant::now();
        let sentences = crate::stages::normalizer::normalize(&input.raw_transcript_text)?;
        record_duration(&mut stage_durations_ms, "normalizing", started);

        if cancellation.is_cancelled() {
            return std::result::Result::Err(crate::error::PipelineError::Cancelled);
        }

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::FetchingKnowledge, 0.1, std::option::Option::None));
        let started = std::time::Instant::now();
        let knowledge_sources = crate::stages::knowledge_fetcher::fetch_all(
            &input.knowledge_urls,
            self.deps.http.as_ref(),
            self.deps.cache.as_ref(),
            &config,
            &cancellation,
        )
        .await;
        record_duration(&mut stage_durations_ms, "fetching_knowledge", started);

        if cancellation.is_cancelled() {
            return std::result::Result::Err(crate::error::PipelineError::Cancelled);
        }

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::Segmenting, 0.2, std::option::Option::None));
        let started = std::time::Instant::now();
        let adjacent_similarities = self.adjacent_sentence_similarities(&sentences, &config).await;
        let chunks = crate::stages::segmenter::segment(&sentences, &adjacent_similarities, &config);
        record_duration(&mut stage_durations_ms, "segmenting", started);

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::FilteringRanking, 0.3, std::option::Option::None));
        let started = std::time::Instant::now();
        let chunks_considered = chunks.len();
        let retained_chunks = crate::stages::filter_ranker::filter_rank(chunks, &sentences, &config)?;
        let chunks_retained = retained_chunks.len();
        record_duration(&mut stage_durations_ms, "filtering_ranking", started);

        if cancellation.is_cancelled() {
            return std::result::Result::Err(crate::error::PipelineError::Cancelled);
        }

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::SelectingExcerpts, 0.4, std::option::Option::None));
        let started = std::time::Instant::now();
        let mut excerpts_by_chunk = std::collections::HashMap::new();
        for chunk in &retained_chunks {
            let excerpts = crate::stages::excerpt_selector::select(
                chunk,
                &knowledge_sources,
                self.deps.embedding.as_deref(),
                &config,
            )
            .await;
            excerpts_by_chunk.insert(chunk.id, excerpts);
        }
        record_duration(&mut stage_durations_ms, "selecting_excerpts", started);

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::GeneratingSteps, 0.5, std::option::Option::None));
        let started = std::time::Instant::now();
        let total_chunks = retained_chunks.len();
        let generation_outcomes = self.generate_all(&retained_chunks, &excerpts_by_chunk, &config, progress, total_chunks).await;
        record_duration(&mut stage_durations_ms, "generating_steps", started);

        if cancellation.is_cancelled() {
            return std::result::Result::Err(crate::error::PipelineError::Cancelled);
        }

        let mut drafts_generation_failed = 0usize;
        let mut input_tokens = 0u64;
        let mut output_tokens = 0u64;
        let mut drafts: std::vec::Vec<crate::domain::step_draft::StepDraft> = std::vec::Vec::new();
        for outcome in generation_outcomes {
            match outcome {
                std::result::Result::Ok(outcome) => {
                    input_tokens += outcome.input_tokens;
                    output_tokens += outcome.output_tokens;
                    drafts.push(outcome.draft);
                }
                std::result::Result::Err(_generation_error) => {
                    drafts_generation_failed += 1;
                }
            }
        }

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::BindingSources, 0.75, std::option::Option::None));
        let started = std::time::Instant::now();
        let mut validated_steps = std::vec::Vec::with_capacity(drafts.len());
        for draft in drafts {
            let empty = std::vec::Vec::new();
            let excerpts = excerpts_by_chunk.get(&draft.chunk_id).unwrap_or(&empty);
            let sources = crate::stages::source_binder::bind(&draft, &sentences, excerpts, self.deps.embedding.as_deref(), &config).await;
            validated_steps.push((draft, sources));
        }
        record_duration(&mut stage_durations_ms, "binding_sources", started);

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::Validating, 0.85, std::option::Option::None));
        let started = std::time::Instant::now();
        let validated_steps: std::vec::Vec<crate::domain::validated_step::ValidatedStep> = validated_steps
            .into_iter()
            .map(|(draft, sources)| crate::stages::validator::validate(draft, sources, &config))
            .collect();
        record_duration(&mut stage_durations_ms, "validating", started);

        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::Assembling, 0.95, std::option::Option::None));
        let started = std::time::Instant::now();
        let result = crate::stages::assembler::assemble(crate::stages::assembler::AssemblyInput {
            validated_steps,
            knowledge_sources,
            chunks_considered,
            chunks_retained,
            drafts_generation_failed,
            input_tokens,
            output_tokens,
            stage_durations_ms,
        })?;
        progress.on_progress(stage_event(crate::ports::progress_sink_port::PipelineStage::Assembling, 1.0, std::option::Option::None));

        std::result::Result::Ok(result)
    }

    /// Computes one cosine similarity per adjacent sentence pair, using the
    /// configured embedding backend when available and enabled, falling back
    /// to Jaccard over token sets otherwise.
    async fn adjacent_sentence_similarities(
        &self,
        sentences: &[crate::domain::sentence::Sentence],
        config: &crate::config::PipelineConfig,
    ) -> std::vec::Vec<f64> {
        if sentences.len() < 2 {
            return std::vec::Vec::new();
        }

        if config.embedding_enabled {
            if let std::option::Option::Some(port) = &self.deps.embedding {
                let texts: std::vec::Vec<std::string::String> = sentences.iter().map(|s| s.text.clone()).collect();
                if let std::result::Result::Ok(vectors) = port.embed(&texts).await {
                    if vectors.len() == sentences.len() {
                        return (0..vectors.len() - 1)
                            .map(|i| crate::adapters::lexical_embedding_fallback::cosine_similarity(&vectors[i], &vectors[i + 1]))
                            .collect();
                    }
                }
            }
        }

        (0..sentences.len() - 1)
            .map(|i| {
                let a = crate::util::tokenize(&sentences[i].text);
                let b = crate::util::tokenize(&sentences[i + 1].text);
                crate::util::jaccard_similarity(&a, &b)
            })
            .collect()
    }

    /// Generates a draft for every retained chunk, up to
    /// `config.max_concurrent_generations` concurrently, restoring chunk-id
    /// order in the returned vector.
    async fn generate_all(
        &self,
        chunks: &[crate::domain::topic_chunk::TopicChunk],
        excerpts_by_chunk: &std::collections::HashMap<usize, std::vec::Vec<crate::domain::excerpt::ScoredExcerpt>>,
        config: &crate::config::PipelineConfig,
        progress: &dyn crate::ports::progress_sink_port::ProgressSinkPort,
        total_chunks: usize,
    ) -> std::vec::Vec<std::result::Result<crate::stages::step_generator::GenerationOutcome, crate::stages::step_generator::GenerationError>> {
        use futures::stream::StreamExt;

        let completed = std::sync::atomic::AtomicUsize::new(0);
        let llm = self.deps.llm.clone();
        let empty_excerpts: std::vec::Vec<crate::domain::excerpt::ScoredExcerpt> = std::vec::Vec::new();

        let indexed: std::vec::Vec<(usize, &crate::domain::topic_chunk::TopicChunk)> = chunks.iter().enumerate().collect();

        let mut results: std::vec::Vec<(
            usize,
            std::result::Result<crate::stages::step_generator::GenerationOutcome, crate::stages::step_generator::GenerationError>,
        )> = futures::stream::iter(indexed)
            .map(|(idx, chunk)| {
                let llm = llm.clone();
                let excerpts = excerpts_by_chunk.get(&chunk.id).unwrap_or(&empty_excerpts).clone();
                let completed = &completed;
                async move {
                    let outcome = crate::stages::step_generator::generate(chunk, &excerpts, llm.as_ref(), config).await;
                    let done = completed.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                    progress.on_progress(crate::ports::progress_sink_port::StageEvent {
                        stage: crate::ports::progress_sink_port::PipelineStage::GeneratingSteps,
                        fraction: 0.5 + 0.25 * (done as f64 / total_chunks.max(1) as f64),
                        current_step: std::option::Option::Some(done),
                        total_steps: std::option::Option::Some(total_chunks),
                        detail: std::option::Option::None,
                    });
                    (idx, outcome)
                }
            })
            .buffer_unordered(config.max_concurrent_generations)
            .collect()
            .await;

        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

fn record_duration(durations: &mut std::collections::BTreeMap<std::string::String, u64>, stage: &str, started: std::time::Instant) {
    durations.insert(stage.to_string(), started.elapsed().as_millis() as u64);
}

fn stage_event(
    stage: crate::ports::progress_sink_port::PipelineStage,
    fraction: f64,
    detail: std::option::Option<std::string::String>,
) -> crate::ports::progress_sink_port::StageEvent {
    crate::ports::progress_sink_port::StageEvent {
        stage,
        fraction,
        current_step: std::option::Option::None,
        total_steps: std::option::Option::None,
        detail,
    }
}
