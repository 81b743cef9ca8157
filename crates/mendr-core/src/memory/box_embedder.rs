//! Type-erased [`Embedder`], built the same way as `BoxLlmProvider`.

use std::future::Future;
use std::pin::Pin;

use mendr_types::error::RepositoryError;

use super::embedder::Embedder;

type EmbedFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, RepositoryError>> + Send + 'a>>;

/// Dyn-compatible mirror of [`Embedder`].
pub trait ErasedEmbedder: Send + Sync {
    fn erased_embed<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a>;

    fn erased_model_name(&self) -> &str;

    fn erased_dimension(&self) -> usize;
}

impl<E: Embedder> ErasedEmbedder for E {
    fn erased_embed<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a> {
        Box::pin(self.embed(texts))
    }

    fn erased_model_name(&self) -> &str {
        self.model_name()
    }

    fn erased_dimension(&self) -> usize {
        self.dimension()
    }
}

/// Owned embedder picked at runtime (fastembed in production, mocks in tests).
pub struct BoxEmbedder {
    inner: Box<dyn ErasedEmbedder>,
}

impl BoxEmbedder {
    pub fn new<E: Embedder + 'static>(embedder: E) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }

    /// One vector per input text, in input order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RepositoryError> {
        self.inner.erased_embed(texts).await
    }

    pub fn model_name(&self) -> &str {
        self.inner.erased_model_name()
    }

    pub fn dimension(&self) -> usize {
        self.inner.erased_dimension()
    }
}
