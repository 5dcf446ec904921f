use crate::errors::ProviderResult;
use crate::models::{ApplicationRecord, ApplicationUpdate};

/// CRUD + lookup over the configured application set.
pub trait ApplicationProvider: Send + Sync {
    fn all(&self) -> ProviderResult<Vec<ApplicationRecord>>;

    /// Fails with `NotFound` if no application has this id.
    fn find_by_id(&self, id: &str) -> ProviderResult<ApplicationRecord>;

    /// Fails with `NotFound` if no application has this key.
    fn find_by_key(&self, key: &str) -> ProviderResult<ApplicationRecord>;

    /// Full untyped record list, preserving extension fields that are not
    /// mapped onto the strict record.
    fn raw(&self) -> ProviderResult<Vec<serde_json::Value>>;

    fn add_app(&self, app: ApplicationRecord) -> ProviderResult<()>;

    /// Field-level merge into the existing record. Fails with `NotFound` if
    /// the id is absent; returns the merged record.
    fn update_app(&self, id: &str, update: ApplicationUpdate) -> ProviderResult<ApplicationRecord>;

    /// Irreversible. Fails with `NotFound` if the id is absent.
    fn delete_app(&self, id: &str) -> ProviderResult<()>;

    fn exists(&self, id: &str) -> ProviderResult<bool>;

    /// Whether `key` is taken by any application other than `exclude_id`.
    fn key_exists(&self, key: &str, exclude_id: Option<&str>) -> ProviderResult<bool>;

    /// Unconditionally re-read from the backing source, ignoring any cache.
    fn reload(&self) -> ProviderResult<()>;
}
