//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AutoPopupError`] via `#[from]`.

/// Top-level error for the autopopup workspace.
#[derive(Debug, thiserror::Error)]
pub enum AutoPopupError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("condition evaluation failed")]
    Evaluation(#[from] EvaluationError),
}

/// A domain invariant was violated.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("page {0} is declared more than once")]
    DuplicatePage(String),

    #[error("card {card} appears twice on page {page}")]
    DuplicateCard { page: String, card: String },

    #[error("active page {0} is not part of the dashboard")]
    UnknownActivePage(String),

    #[error("startup window of {0}ms is out of range")]
    StartupWindowOutOfRange(u64),
}

/// A condition could not be evaluated against the current snapshot.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("malformed condition")]
    Malformed(#[source] serde_json::Error),

    #[error("condition does not name an entity and none could be resolved")]
    NoEntity,

    #[error("entity {0} is missing from the snapshot")]
    MissingEntity(String),
}
