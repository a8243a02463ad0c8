use thiserror::Error;

/// Failure originating from the durable store.
///
/// The message keeps the full driver detail; callers decide how much of it to expose.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreFailure {
    /// The store rejected the write because of one of its own constraints.
    #[error("Store constraint violated: {0}")]
    Conflict(String),

    /// The store could not be reached or the connection was lost.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    Database(String),
}

impl StoreFailure {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreFailure::Conflict(_))
    }
}
