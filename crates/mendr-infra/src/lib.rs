//! Infrastructure layer for mendr.
//!
//! Contains implementations of the traits defined in `mendr-core`: SQLite
//! interaction and feedback logs, the OpenAI-compatible language provider,
//! the fastembed local embedder, and the config/data-dir loaders.

pub mod config;
pub mod llm;
pub mod sqlite;
pub mod vector;
