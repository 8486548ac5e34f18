//! JSON snapshots of the whole store.

use std::fs;
use std::path::Path;

use super::{NovelStore, StoreResult};

impl NovelStore {
    /// Load a store from a snapshot file, or start empty if the file does
    /// not exist yet.
    pub fn load_or_default(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Encode the store as a snapshot document.
    pub fn to_snapshot(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write an encoded snapshot to `path`, replacing any previous one.
    ///
    /// The snapshot is staged next to the target and renamed into place.
    pub fn write_snapshot(path: &Path, encoded: &str) -> StoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, path)?;
        Ok(())
    }
}
