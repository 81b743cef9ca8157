//! The self-healing answer loop.
//!
//! - [`classifier`]: decides whether a generated answer is acceptable.
//! - [`prompt`]: the plain and memory-augmented prompt templates.
//! - [`orchestrator`]: runs the escalating attempts and logs the outcome.

pub mod classifier;
pub mod orchestrator;
pub mod prompt;

pub use classifier::ResponseClassifier;
pub use orchestrator::{HealingOrchestrator, MAX_ATTEMPTS};
