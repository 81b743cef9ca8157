//! Shared domain types for mendr.
//!
//! This crate contains the data shapes used across the workspace: LLM
//! requests, memory records, healing results, interaction and feedback
//! entries, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod feedback;
pub mod healing;
pub mod llm;
pub mod memory;
