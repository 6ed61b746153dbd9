use chrono::Utc;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs_utils::{ensure_private_dir, write_private};
use crate::paths::Paths;
use crate::profiles::ProfileStore;

/// Read the store from file, returning an empty store if the file doesn't exist
pub fn load(path: &Path) -> Result<ProfileStore> {
    if !path.exists() {
        return Ok(ProfileStore::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(ProfileStore::default());
    }

    serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize the store as indented JSON and write it atomically (0600)
pub fn save(store: &mut ProfileStore, path: &Path) -> Result<()> {
    store.updated_at = Some(Utc::now());
    let content = to_json(store)?;
    write_private(path, &content)
}

pub fn to_json(store: &ProfileStore) -> Result<String> {
    serde_json::to_string_pretty(store).map_err(|source| Error::Parse {
        path: PathBuf::from("<profile store>"),
        source,
    })
}

/// The store loaded under an exclusive lock for one load/mutate/save cycle
///
/// The lock lives on a sidecar file so the store itself can still be replaced
/// by an atomic rename. It is released when the value is dropped.
pub struct LockedStore {
    lock: File,
    store: ProfileStore,
    path: PathBuf,
}

impl LockedStore {
    /// Lock the store and read its current contents (blocks until available)
    pub fn open(paths: &Paths) -> Result<Self> {
        ensure_private_dir(&paths.base_dir)?;

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&paths.lock_file)
            .map_err(|e| Error::io(&paths.lock_file, e))?;

        lock.lock_exclusive()
            .map_err(|e| Error::io(&paths.lock_file, e))?;

        let store = load(&paths.config_file)?;
        tracing::debug!(
            path = %paths.config_file.display(),
            profiles = store.profiles.len(),
            rules = store.directory_rules.len(),
            "loaded profile store"
        );

        Ok(Self {
            lock,
            store,
            path: paths.config_file.clone(),
        })
    }

    /// Get the current store
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Apply a mutation and save the result.
    ///
    /// The closure works on a copy; if it fails nothing is written and the
    /// in-memory store keeps its previous contents.
    pub fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ProfileStore) -> Result<T>,
    {
        let mut next = self.store.clone();
        let value = f(&mut next)?;
        save(&mut next, &self.path)?;
        self.store = next;
        Ok(value)
    }
}

impl Drop for LockedStore {
    fn drop(&mut self) {
        // Release the lock (ignore errors during drop)
        let _ = FileExt::unlock(&self.lock);
    }
}
