//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by `serve` and `ask`.
//! The orchestrator and feedback service are generic over their stores; here
//! they are pinned to the SQLite implementations, wrapped in `Option` so the
//! service keeps answering when the database cannot be opened.
//!
//! Lighter commands build only the pieces they touch from an [`Environment`]:
//! `feedback` needs memory and the feedback store, `memory list` needs
//! memory, `history` needs the database alone. None of them needs an API key.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use mendr_core::feedback::FeedbackService;
use mendr_core::healing::{HealingOrchestrator, ResponseClassifier};
use mendr_core::llm::generator::LanguageGenerator;
use mendr_core::memory::box_embedder::BoxEmbedder;
use mendr_core::memory::vector::VectorMemory;
use mendr_infra::config::{
    embedding_cache_dir, load_dotenv, load_global_config, resolve_data_dir,
};
use mendr_infra::llm::create_generator;
use mendr_infra::sqlite::pool::database_url;
use mendr_infra::sqlite::{DatabasePool, SqliteFeedbackStore, SqliteInteractionLog};
use mendr_infra::vector::FastEmbedder;
use mendr_types::config::{
    DEFAULT_FALLBACK_TEMPERATURE, DEFAULT_PRIMARY_TEMPERATURE, GeneratorConfig, GlobalConfig,
};

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteOrchestrator = HealingOrchestrator<Option<SqliteInteractionLog>>;

pub type ConcreteFeedbackService = FeedbackService<Option<SqliteFeedbackStore>>;

/// Data directory and configuration, loaded once per process.
pub struct Environment {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
}

impl Environment {
    /// Load `.env`, resolve and create the data directory, read `config.toml`.
    pub async fn load() -> anyhow::Result<Self> {
        load_dotenv();
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;
        Ok(Self { data_dir, config })
    }

    /// Open the SQLite pool, or `None` when persistence is disabled or unavailable.
    pub async fn open_database(&self) -> Option<DatabasePool> {
        open_database(&self.data_dir, &self.config).await
    }

    /// Load the embedding model and seed the memory table from config.
    pub async fn build_memory(&self) -> anyhow::Result<Arc<VectorMemory>> {
        // Model loading may download files; keep it off the async workers.
        let model = self.config.embedding.model.clone();
        let cache_dir = embedding_cache_dir(&self.data_dir, &self.config.embedding);
        let embedder = tokio::task::spawn_blocking(move || FastEmbedder::new(&model, cache_dir))
            .await?
            .context("failed to load the embedding model")?;

        let memory = Arc::new(VectorMemory::new(BoxEmbedder::new(embedder)));
        let seeded = memory.seed(&self.config.memory.seed).await;
        info!(seeded, model = memory.embedding_model(), "Seeded memory store");
        Ok(memory)
    }

    /// Memory plus the feedback store; everything `mendr feedback` touches.
    pub async fn build_feedback_service(&self) -> anyhow::Result<ConcreteFeedbackService> {
        let memory = self.build_memory().await?;
        let pool = self.open_database().await;
        Ok(FeedbackService::new(pool.map(SqliteFeedbackStore::new), memory))
    }
}

/// Shared application state holding all services.
///
/// Used by the `serve` and `ask` commands and by the REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub feedback_service: Arc<ConcreteFeedbackService>,
    pub memory: Arc<VectorMemory>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Wire every service: database, seeded memory, both generators, the
    /// orchestrator and the feedback service.
    pub async fn init(env: Environment) -> anyhow::Result<Self> {
        let pool = env.open_database().await;
        let memory = env.build_memory().await?;
        let Environment { data_dir, config } = env;

        let primary = generator(&config.primary, DEFAULT_PRIMARY_TEMPERATURE, "primary")?;
        let fallback = generator(&config.fallback, DEFAULT_FALLBACK_TEMPERATURE, "fallback")?;

        let classifier = ResponseClassifier::with_extra_phrases(&config.classifier.extra_phrases);
        let deadline = config.healing.deadline_secs.map(Duration::from_secs);

        let orchestrator = HealingOrchestrator::new(
            primary,
            fallback,
            memory.clone(),
            classifier,
            pool.clone().map(SqliteInteractionLog::new),
        )
        .with_memory_k(config.healing.memory_k)
        .with_deadline(deadline);

        let feedback_service =
            FeedbackService::new(pool.map(SqliteFeedbackStore::new), memory.clone());

        Ok(Self::from_parts(
            orchestrator,
            feedback_service,
            memory,
            config,
            data_dir,
        ))
    }

    /// Assemble state from already-built services.
    pub fn from_parts(
        orchestrator: ConcreteOrchestrator,
        feedback_service: ConcreteFeedbackService,
        memory: Arc<VectorMemory>,
        config: GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            feedback_service: Arc::new(feedback_service),
            memory,
            config: Arc::new(config),
            data_dir,
        }
    }
}

fn generator(
    config: &GeneratorConfig,
    default_temperature: f64,
    role: &str,
) -> anyhow::Result<LanguageGenerator> {
    let generator = create_generator(config, default_temperature)
        .with_context(|| format!("failed to configure the {role} generator"))?;
    info!(
        role,
        provider = generator.provider_name(),
        model = generator.model(),
        temperature = generator.temperature(),
        "Generator ready"
    );
    Ok(generator)
}

async fn open_database(data_dir: &Path, config: &GlobalConfig) -> Option<DatabasePool> {
    let database = &config.database;
    if !database.enabled {
        info!("Persistence disabled; interactions and feedback will not be stored");
        return None;
    }

    let url = database_url(data_dir, &database.file_name);
    match DatabasePool::new(&url).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!(error = %e, url = %url, "Failed to open database; continuing without it");
            None
        }
    }
}
