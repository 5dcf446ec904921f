/// A record failed a field or uniqueness check. A key collision on
/// create/update lands here, not in data corruption.
#[derive(Debug, thiserror::Error)]
#[error("validation failed for {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}
