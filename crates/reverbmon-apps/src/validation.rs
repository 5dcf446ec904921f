//! Admission checks for application records. A key collision is a
//! validation failure surfaced to the caller, never a write that corrupts
//! the active set.

use reverbmon_core::constants;
use reverbmon_core::errors::{ProviderError, ValidationError};
use reverbmon_core::models::{AppOptions, ApplicationRecord, ApplicationUpdate};
use reverbmon_core::traits::ApplicationProvider;

/// A record was rejected: either a field failed its bounds, or the provider
/// lookup backing a uniqueness check failed.
#[derive(Debug, thiserror::Error)]
pub enum AdmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Field bounds for a complete record.
pub fn validate_record(record: &ApplicationRecord) -> Result<(), ValidationError> {
    if record.id.is_empty() {
        return Err(ValidationError::new("id", "must not be empty"));
    }
    if record.name.is_empty() || record.name.len() > 255 {
        return Err(ValidationError::new("name", "must be 1 to 255 characters"));
    }
    validate_key(&record.key)?;
    validate_secret(&record.secret)?;
    validate_max_message_size(record.max_message_size)?;
    if let Some(max_connections) = record.max_connections {
        validate_max_connections(max_connections)?;
    }
    validate_options(&record.options)
}

/// Field bounds for the fields present in a partial update.
pub fn validate_update(update: &ApplicationUpdate) -> Result<(), ValidationError> {
    if let Some(name) = &update.name {
        if name.is_empty() || name.len() > 255 {
            return Err(ValidationError::new("name", "must be 1 to 255 characters"));
        }
    }
    if let Some(key) = &update.key {
        validate_key(key)?;
    }
    if let Some(secret) = &update.secret {
        validate_secret(secret)?;
    }
    if let Some(max_message_size) = update.max_message_size {
        validate_max_message_size(max_message_size)?;
    }
    if let Some(Some(max_connections)) = update.max_connections {
        validate_max_connections(max_connections)?;
    }
    if let Some(options) = &update.options {
        if options.port == Some(0) {
            return Err(ValidationError::new("options.port", "must be 1 to 65535"));
        }
        if let Some(ping_interval) = options.ping_interval {
            validate_interval("options.ping_interval", ping_interval)?;
        }
        if let Some(activity_timeout) = options.activity_timeout {
            validate_interval("options.activity_timeout", activity_timeout)?;
        }
    }
    Ok(())
}

/// Admission check for a new record: field bounds plus id/key uniqueness
/// across the active set.
pub fn admit_create(
    provider: &dyn ApplicationProvider,
    record: &ApplicationRecord,
) -> Result<(), AdmitError> {
    validate_record(record)?;

    if provider.exists(&record.id)? {
        return Err(ValidationError::new("id", "has already been taken").into());
    }
    if provider.key_exists(&record.key, None)? {
        return Err(ValidationError::new("key", "has already been taken").into());
    }
    Ok(())
}

/// Admission check for an update: field bounds, plus key uniqueness with the
/// record's own id excluded from the collision check.
pub fn admit_update(
    provider: &dyn ApplicationProvider,
    id: &str,
    update: &ApplicationUpdate,
) -> Result<(), AdmitError> {
    validate_update(update)?;

    if let Some(key) = &update.key {
        if provider.key_exists(key, Some(id))? {
            return Err(ValidationError::new("key", "has already been taken").into());
        }
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key.len() < constants::MIN_KEY_LENGTH || key.len() > 255 {
        return Err(ValidationError::new(
            "key",
            format!("must be {} to 255 characters", constants::MIN_KEY_LENGTH),
        ));
    }
    Ok(())
}

fn validate_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.len() < constants::MIN_SECRET_LENGTH || secret.len() > 255 {
        return Err(ValidationError::new(
            "secret",
            format!("must be at least {} characters", constants::MIN_SECRET_LENGTH),
        ));
    }
    Ok(())
}

fn validate_max_message_size(size: u32) -> Result<(), ValidationError> {
    if size == 0 || size > constants::MAX_MESSAGE_SIZE_LIMIT {
        return Err(ValidationError::new(
            "max_message_size",
            format!("must be 1 to {}", constants::MAX_MESSAGE_SIZE_LIMIT),
        ));
    }
    Ok(())
}

fn validate_max_connections(max_connections: u32) -> Result<(), ValidationError> {
    if max_connections == 0 {
        return Err(ValidationError::new("max_connections", "must be at least 1"));
    }
    Ok(())
}

fn validate_options(options: &AppOptions) -> Result<(), ValidationError> {
    if options.port == 0 {
        return Err(ValidationError::new("options.port", "must be 1 to 65535"));
    }
    validate_interval("options.ping_interval", options.ping_interval)?;
    validate_interval("options.activity_timeout", options.activity_timeout)
}

fn validate_interval(field: &str, value: u32) -> Result<(), ValidationError> {
    if value == 0 || value > constants::INTERVAL_LIMIT_SECS {
        return Err(ValidationError::new(
            field,
            format!("must be 1 to {} seconds", constants::INTERVAL_LIMIT_SECS),
        ));
    }
    Ok(())
}
