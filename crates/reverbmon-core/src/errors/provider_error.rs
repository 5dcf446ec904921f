use std::path::PathBuf;

/// Errors raised by application-config providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Fatal at construction: the provider never starts with an empty or
    /// partial configuration.
    #[error("invalid application configuration at {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    #[error("application not found: {lookup}")]
    NotFound { lookup: String },

    /// Temp-file write or atomic-rename failure. In-memory state is left
    /// unchanged, so no partial commit is ever visible.
    #[error("failed to persist application configuration to {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    /// Relational-backend failure (SQLite error, poisoned lock).
    #[error("application store error: {message}")]
    Backend { message: String },
}

impl ProviderError {
    pub fn not_found(lookup: impl Into<String>) -> Self {
        Self::NotFound { lookup: lookup.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
