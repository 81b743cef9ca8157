//! LLM provider abstractions for mendr.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `LanguageGenerator`: prompt-in, text-out view over a provider with a
//!   fixed model and sampling temperature

pub mod box_provider;
pub mod generator;
pub mod provider;
