use thiserror::Error;

/// Errors from repository and embedding operations (used by trait definitions in mendr-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("embedding error: {0}")]
    Embedding(String),
}

/// Errors raised by the feedback path before anything is written.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback must be 'thumbs_up' or 'thumbs_down', got '{0}'")]
    InvalidFeedbackType(String),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing API key: environment variable '{0}' is not set")]
    MissingApiKey(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
