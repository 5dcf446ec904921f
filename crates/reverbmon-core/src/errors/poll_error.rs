use super::{ProviderError, StoreError};

/// Failure while querying the broadcasting engine for one application.
/// Locally recovered: the application is excluded from the current export
/// cycle only.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("broadcasting engine unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("malformed response from broadcasting engine: {reason}")]
    Malformed { reason: String },
}

pub type PollResult<T> = Result<T, PollError>;

/// The only failures that abort a whole collect cycle: the provider cannot
/// enumerate applications, or the store itself rejects a write.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
