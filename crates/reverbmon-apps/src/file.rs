//! JSON-file backed provider with a TTL+mtime cache and atomic writes.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime};

use reverbmon_core::config::FileProviderConfig;
use reverbmon_core::errors::{ProviderError, ProviderResult};
use reverbmon_core::models::{ApplicationRecord, ApplicationUpdate};
use reverbmon_core::traits::ApplicationProvider;

struct CacheState {
    apps: Vec<ApplicationRecord>,
    last_modified: Option<SystemTime>,
    last_checked: Option<Instant>,
}

/// Application provider backed by a JSON file: `{"apps": [...]}`.
///
/// The snapshot may lag the on-disk file by up to the cache TTL; the file's
/// mtime is checked at most once per TTL window. Writes serialize the full
/// snapshot to a sibling temp file and rename it over the target, so readers
/// never observe a torn file. There is no cross-process write lock: two
/// writers racing refresh→mutate→save can lose the first writer's change.
pub struct FileApplicationProvider {
    path: PathBuf,
    cache_ttl: Duration,
    state: Mutex<CacheState>,
}

impl FileApplicationProvider {
    /// Load the backing file eagerly. Any failure (missing file, unreadable
    /// content, malformed JSON, missing or non-array `apps`) is fatal here:
    /// this provider never starts with an empty or partial configuration.
    pub fn new(config: FileProviderConfig) -> ProviderResult<Self> {
        let (apps, modified) = load_apps(&config.path)?;

        Ok(Self {
            path: config.path,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            state: Mutex::new(CacheState {
                apps,
                last_modified: Some(modified),
                last_checked: Some(Instant::now()),
            }),
        })
    }

    fn state(&self) -> ProviderResult<MutexGuard<'_, CacheState>> {
        self.state
            .lock()
            .map_err(|e| ProviderError::backend(format!("cache lock poisoned: {e}")))
    }

    /// Revalidate the snapshot against the file, at most once per TTL
    /// window. Reload only when the file's mtime is strictly newer than the
    /// cached one.
    fn refresh_if_needed(&self, state: &mut CacheState) -> ProviderResult<()> {
        let now = Instant::now();

        if let Some(checked) = state.last_checked {
            if now.duration_since(checked) < self.cache_ttl {
                return Ok(());
            }
        }

        state.last_checked = Some(now);

        // A file that vanished after construction is not grounds to drop the
        // snapshot; keep serving it until the file reappears.
        let Ok(metadata) = fs::metadata(&self.path) else {
            return Ok(());
        };
        let Ok(current_mtime) = metadata.modified() else {
            return Ok(());
        };

        let newer = state.last_modified.map_or(true, |cached| current_mtime > cached);
        if newer {
            let (apps, modified) = load_apps(&self.path)?;
            tracing::debug!(path = %self.path.display(), apps = apps.len(), "reloaded application snapshot");
            state.apps = apps;
            state.last_modified = Some(modified);
        }

        Ok(())
    }

    /// Serialize the full snapshot to pretty-printed JSON, write it to a
    /// sibling temp file, then atomically rename over the target. On any
    /// failure the temp file is removed and the in-memory state stays
    /// untouched, so no partial commit is ever visible.
    fn save_apps(&self, state: &mut CacheState, apps: Vec<ApplicationRecord>) -> ProviderResult<()> {
        let content = serde_json::to_string_pretty(&serde_json::json!({ "apps": &apps }))
            .map_err(|e| self.persistence(e.to_string()))?;

        let temp_path = self.temp_path();
        if let Err(e) = write_file(&temp_path, content.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.persistence(format!("temp write failed: {e}")));
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.persistence(format!("rename failed: {e}")));
        }

        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());

        state.apps = apps;
        state.last_modified = Some(modified);
        state.last_checked = Some(Instant::now());

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut os: OsString = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }

    fn persistence(&self, reason: String) -> ProviderError {
        ProviderError::Persistence { path: self.path.clone(), reason }
    }
}

impl ApplicationProvider for FileApplicationProvider {
    fn all(&self) -> ProviderResult<Vec<ApplicationRecord>> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;
        Ok(state.apps.clone())
    }

    fn find_by_id(&self, id: &str) -> ProviderResult<ApplicationRecord> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;
        state
            .apps
            .iter()
            .find(|app| app.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(id))
    }

    fn find_by_key(&self, key: &str) -> ProviderResult<ApplicationRecord> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;
        state
            .apps
            .iter()
            .find(|app| app.key == key)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(key))
    }

    fn raw(&self) -> ProviderResult<Vec<serde_json::Value>> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;
        state
            .apps
            .iter()
            .map(|app| serde_json::to_value(app).map_err(|e| ProviderError::backend(e.to_string())))
            .collect()
    }

    fn add_app(&self, app: ApplicationRecord) -> ProviderResult<()> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;

        let mut apps = state.apps.clone();
        apps.push(app);
        self.save_apps(&mut state, apps)
    }

    fn update_app(&self, id: &str, update: ApplicationUpdate) -> ProviderResult<ApplicationRecord> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;

        let index = state
            .apps
            .iter()
            .position(|app| app.id == id)
            .ok_or_else(|| ProviderError::not_found(id))?;

        let mut apps = state.apps.clone();
        apps[index].apply(update);
        let merged = apps[index].clone();

        self.save_apps(&mut state, apps)?;
        Ok(merged)
    }

    fn delete_app(&self, id: &str) -> ProviderResult<()> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;

        if !state.apps.iter().any(|app| app.id == id) {
            return Err(ProviderError::not_found(id));
        }

        let apps: Vec<ApplicationRecord> =
            state.apps.iter().filter(|app| app.id != id).cloned().collect();
        self.save_apps(&mut state, apps)
    }

    fn exists(&self, id: &str) -> ProviderResult<bool> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;
        Ok(state.apps.iter().any(|app| app.id == id))
    }

    fn key_exists(&self, key: &str, exclude_id: Option<&str>) -> ProviderResult<bool> {
        let mut state = self.state()?;
        self.refresh_if_needed(&mut state)?;
        Ok(state
            .apps
            .iter()
            .any(|app| app.key == key && exclude_id != Some(app.id.as_str())))
    }

    fn reload(&self) -> ProviderResult<()> {
        let mut state = self.state()?;
        let (apps, modified) = load_apps(&self.path)?;
        state.apps = apps;
        state.last_modified = Some(modified);
        state.last_checked = Some(Instant::now());
        Ok(())
    }
}

/// Read and parse the backing file, returning the records and the file's
/// mtime at read time.
fn load_apps(path: &Path) -> ProviderResult<(Vec<ApplicationRecord>, SystemTime)> {
    let configuration = |reason: String| ProviderError::Configuration {
        path: path.to_path_buf(),
        reason,
    };

    if !path.exists() {
        return Err(configuration("file not found".to_string()));
    }

    let content = fs::read_to_string(path).map_err(|e| configuration(format!("unreadable: {e}")))?;

    let document: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| configuration(format!("malformed JSON: {e}")))?;

    let apps_value = document
        .get("apps")
        .ok_or_else(|| configuration("'apps' key is missing".to_string()))?;
    if !apps_value.is_array() {
        return Err(configuration("'apps' must be an array".to_string()));
    }

    let apps: Vec<ApplicationRecord> = serde_json::from_value(apps_value.clone())
        .map_err(|e| configuration(format!("invalid application record: {e}")))?;

    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| configuration(format!("cannot stat: {e}")))?;

    Ok((apps, modified))
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    // Flush to disk before the rename makes the content visible.
    file.sync_all()
}
