//! Explicit user feedback and the correction path into memory.

pub mod service;

pub use service::{FeedbackOutcome, FeedbackService};
