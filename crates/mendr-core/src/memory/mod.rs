//! Similarity-searchable memory for the healing loop.
//!
//! `Embedder` turns text into vectors; `VectorMemory` keeps every memory's
//! text and vector in one table and answers exact nearest-neighbour queries.

pub mod box_embedder;
pub mod embedder;
pub mod vector;
