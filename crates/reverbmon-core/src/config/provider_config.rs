use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

/// File-backed application provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProviderConfig {
    /// Path to the JSON file holding the `apps` array.
    pub path: PathBuf,
    /// How long the cached snapshot may lag the file before the provider
    /// revalidates mtime.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    constants::DEFAULT_CACHE_TTL_SECS
}

impl FileProviderConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), cache_ttl_secs: default_cache_ttl_secs() }
    }
}
