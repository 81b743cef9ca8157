//! Repository trait definitions for mendr.
//!
//! These traits define the storage interface that the infrastructure layer
//! implements. Both stores are append-only logs: nothing here is ever
//! updated or deleted.

pub mod feedback;
pub mod interaction;

pub use feedback::FeedbackRepository;
pub use interaction::InteractionLogRepository;

/// Default page size for `recent` queries.
pub const DEFAULT_RECENT_LIMIT: i64 = 50;
