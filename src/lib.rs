pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use config::{AiProvider, AppConfig, OcrBackend};
use db::SqliteAnalysisStore;
use pipeline::narrative::{GeminiClient, NarrativeGenerator, OllamaNarrator};
use pipeline::ocr::{OcrEngine, OllamaVisionOcr, TesseractOcr};
use pipeline::ollama::OllamaClient;
use pipeline::orchestrator::AnalysisService;
use pipeline::taxonomy::{KeywordMatcher, Taxonomy};

/// Load configuration, wire collaborators, and serve until Ctrl-C.
///
/// Collaborators hold blocking HTTP clients, so they are built and finally
/// dropped on this thread, outside the async runtime.
pub fn run() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    let service = Arc::new(build_service(&config)?);
    let ctx = api::ApiContext::new(service.clone(), config.max_upload_bytes);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime
        .block_on(api::server::serve(config.addr, api::api_router(ctx)))
        .with_context(|| format!("server on {} failed", config.addr))?;
    drop(runtime);

    drop(service);
    Ok(())
}

/// Build the analysis service described by `config`.
pub fn build_service(config: &AppConfig) -> anyhow::Result<AnalysisService> {
    let taxonomy = Taxonomy::load(&config.taxonomy_path)
        .with_context(|| format!("cannot load taxonomy {}", config.taxonomy_path.display()))?;
    let matcher = Arc::new(KeywordMatcher::new(&taxonomy)?);
    tracing::info!(
        categories = taxonomy.category_count(),
        terms = matcher.pattern_count(),
        "Taxonomy ready"
    );

    let ollama = Arc::new(OllamaClient::new(&config.ollama_url, config.http_timeout_secs)?);

    let narrator: Arc<dyn NarrativeGenerator> = match &config.ai_provider {
        AiProvider::Gemini {
            api_key,
            model,
            api_base,
        } => Arc::new(GeminiClient::new(
            api_base,
            api_key.clone(),
            model.clone(),
            config.http_timeout_secs,
        )?),
        AiProvider::Ollama => Arc::new(OllamaNarrator::new(
            ollama.clone(),
            config.ollama_model.clone(),
        )),
    };

    let ocr: Arc<dyn OcrEngine> = match config.ocr_backend {
        OcrBackend::Ollama => Arc::new(OllamaVisionOcr::new(
            ollama.clone(),
            config.ollama_model.clone(),
        )),
        OcrBackend::Tesseract => Arc::new(TesseractOcr::new(
            config.tesseract_bin.clone(),
            &config.tesseract_lang,
        )),
    };

    let store = Arc::new(
        SqliteAnalysisStore::open(&config.db_path)
            .with_context(|| format!("cannot open database {}", config.db_path.display()))?,
    );

    tracing::info!(
        narrator = config.ai_provider_name(),
        ocr = ?config.ocr_backend,
        "Collaborators ready"
    );

    Ok(AnalysisService::new(matcher, narrator, ocr, store))
}
