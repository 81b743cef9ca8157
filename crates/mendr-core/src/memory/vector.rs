//! In-process vector memory with exact L2 nearest-neighbour search.
//!
//! Every memory lives in a single row holding both its text and its vector,
//! and a row's position in the table is its id. There is no second structure
//! to keep in step, so a search hit always maps back to the right text.
//!
//! Embedding happens outside the lock; the id is assigned under the write
//! lock at push time, so concurrent `add_memory` calls stay dense and ordered.

use std::cmp::Ordering;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use mendr_types::error::RepositoryError;
use mendr_types::memory::{MemoryRecord, RankedMemory};

use super::box_embedder::BoxEmbedder;

/// Default number of memories returned by [`VectorMemory::get_relevant_memories`].
pub const DEFAULT_MEMORY_K: usize = 2;

struct MemoryRow {
    record: MemoryRecord,
    vector: Vec<f32>,
}

/// Append-only memory table searched by exact Euclidean distance.
pub struct VectorMemory {
    embedder: BoxEmbedder,
    rows: RwLock<Vec<MemoryRow>>,
}

impl VectorMemory {
    pub fn new(embedder: BoxEmbedder) -> Self {
        Self {
            embedder,
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Dimension every stored vector must have.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_name()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Snapshot of all records in id order.
    pub async fn records(&self) -> Vec<MemoryRecord> {
        self.rows
            .read()
            .await
            .iter()
            .map(|row| row.record.clone())
            .collect()
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, RepositoryError> {
        let vector = self
            .embedder
            .embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::Embedding("embedder returned no vector".to_string()))?;

        if vector.len() != self.dimension() {
            return Err(RepositoryError::Embedding(format!(
                "expected {} dimensions, got {}",
                self.dimension(),
                vector.len()
            )));
        }
        Ok(vector)
    }

    /// Embed `text` and append it as a new memory.
    ///
    /// Returns `false` and leaves the table untouched when embedding fails.
    pub async fn add_memory(&self, text: &str) -> bool {
        let vector = match self.embed_one(text).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Failed to add memory");
                return false;
            }
        };

        let mut rows = self.rows.write().await;
        let id = rows.len() as u64;
        rows.push(MemoryRow {
            record: MemoryRecord {
                id,
                text: text.to_string(),
            },
            vector,
        });
        info!(memory_id = id, text, "Added memory");
        true
    }

    /// Add each statement in order. Returns how many were stored.
    pub async fn seed<I, S>(&self, texts: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for text in texts {
            if self.add_memory(text.as_ref()).await {
                added += 1;
            }
        }
        added
    }

    /// Up to `k` memories nearest to `query`, closest first, with distances.
    ///
    /// An empty table short-circuits without calling the embedder.
    pub async fn search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RankedMemory>, RepositoryError> {
        if k == 0 || self.is_empty().await {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_one(query).await?;
        let rows = self.rows.read().await;

        let ranked = nearest(&rows, &query_vector, k)
            .into_iter()
            .filter_map(|(idx, distance)| {
                rows.get(idx).map(|row| RankedMemory {
                    record: row.record.clone(),
                    distance,
                })
            })
            .collect();
        Ok(ranked)
    }

    /// Texts of the `k` memories nearest to `query`.
    ///
    /// Fails open: any embedding or search error yields an empty list.
    pub async fn get_relevant_memories(&self, query: &str, k: usize) -> Vec<String> {
        match self.search(query, k).await {
            Ok(ranked) => {
                let texts: Vec<String> = ranked.into_iter().map(|m| m.record.text).collect();
                debug!(count = texts.len(), "Retrieved memories");
                texts
            }
            Err(e) => {
                warn!(error = %e, "Vector similarity lookup failed");
                Vec::new()
            }
        }
    }
}

/// Euclidean distance between two equal-length vectors.
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Flat scan: `(row index, distance)` of the `k` closest rows.
///
/// Ties are broken by ascending index so results are deterministic.
fn nearest(rows: &[MemoryRow], query: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (idx, l2_distance(&row.vector, query)))
        .collect();

    scored.sort_by(|a, b| match a.1.total_cmp(&b.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    scored.truncate(k);
    scored
}
