//! Local text embeddings for the vector memory.

pub mod embedder;

pub use embedder::FastEmbedder;
