use thiserror::Error;

/// Errors raised while building a query. All of them abort the current
/// session; nothing is retried.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid time format: {input} (expected YYYY-MM-DD HH:MM or YYYY-MM-DD)")]
    InvalidTimeFormat { input: String },

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("nothing to select: {0}")]
    NoCandidates(String),

    #[error("no selection made")]
    NoSelection,

    #[error("provider failed: {0}")]
    Provider(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
