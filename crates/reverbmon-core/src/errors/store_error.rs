/// Errors raised by metrics stores. The in-memory backend never fails;
/// these surface shared-store round trips that went wrong.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("shared store error: {message}")]
    Backend { message: String },

    #[error("metric payload serialization failed: {message}")]
    Serialization { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
