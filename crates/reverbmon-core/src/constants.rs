//! Workspace-wide defaults, kept in one place so config and models agree.

/// Seconds an application snapshot may lag the backing file before the
/// provider revalidates against the filesystem.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5;

/// Default maximum message size accepted by an application, in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 10_000;

/// Default ping interval for an application, in seconds.
pub const DEFAULT_PING_INTERVAL: u32 = 60;

/// Default activity timeout for an application, in seconds.
pub const DEFAULT_ACTIVITY_TIMEOUT: u32 = 30;

/// Default host an application's server options point at.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port an application's server options point at.
pub const DEFAULT_PORT: u16 = 8080;

/// Key prefix for samples persisted in a shared key-value store.
pub const DEFAULT_SHARED_PREFIX: &str = "reverb:metrics:";

/// Upper bound accepted for `max_message_size` during validation.
pub const MAX_MESSAGE_SIZE_LIMIT: u32 = 10_000_000;

/// Bounds accepted for `ping_interval` and `activity_timeout`, in seconds.
pub const INTERVAL_LIMIT_SECS: u32 = 3600;

/// Minimum length accepted for an application key.
pub const MIN_KEY_LENGTH: usize = 16;

/// Minimum length accepted for an application secret.
pub const MIN_SECRET_LENGTH: usize = 32;
