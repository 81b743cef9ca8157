//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `mendr-core` with fastembed's ONNX
//! models. Inference is CPU-bound, so each batch runs on the blocking pool.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use mendr_core::memory::embedder::Embedder;
use mendr_types::error::RepositoryError;

/// Map a (case-insensitive) model name to its fastembed model and output dimension.
fn resolve_model(name: &str) -> Option<(EmbeddingModel, usize)> {
    match name.to_ascii_lowercase().as_str() {
        "bge-small-en-v1.5" => Some((EmbeddingModel::BGESmallENV15, 384)),
        "all-minilm-l6-v2" => Some((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-base-en-v1.5" => Some((EmbeddingModel::BGEBaseENV15, 768)),
        "nomic-embed-text-v1.5" => Some((EmbeddingModel::NomicEmbedTextV15, 768)),
        _ => None,
    }
}

/// Local embedder backed by a fastembed [`TextEmbedding`].
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedder {
    /// Load (downloading on first use) the named model into `cache_dir`.
    pub fn new(model_name: &str, cache_dir: PathBuf) -> Result<Self, RepositoryError> {
        let (model, dimension) = resolve_model(model_name).ok_or_else(|| {
            RepositoryError::Embedding(format!("unsupported embedding model '{model_name}'"))
        })?;

        tracing::info!(
            model = model_name,
            cache_dir = %cache_dir.display(),
            "Loading embedding model"
        );
        let start = Instant::now();

        let options = InitOptions::new(model)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);
        let embedding =
            TextEmbedding::try_new(options).map_err(|e| RepositoryError::Embedding(e.to_string()))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            model = model_name,
            dimension,
            "Embedding model loaded"
        );

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RepositoryError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let batch = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut guard = model.lock().map_err(|_| {
                RepositoryError::Embedding("embedding model lock poisoned".to_string())
            })?;
            guard
                .embed(batch, None)
                .map_err(|e| RepositoryError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| RepositoryError::Embedding(format!("embedding task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
