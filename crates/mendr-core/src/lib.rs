//! Business logic and repository trait definitions for mendr.
//!
//! This crate defines the "ports" (provider, embedder and repository traits)
//! that the infrastructure layer implements, plus the self-healing loop that
//! drives them. It depends only on `mendr-types` -- never on `mendr-infra`
//! or any database/IO crate.

pub mod feedback;
pub mod healing;
pub mod llm;
pub mod memory;
pub mod repository;

#[cfg(test)]
mod testing;
