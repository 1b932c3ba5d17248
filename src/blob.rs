// contact-deck/src/blob.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::{BTreeMap, HashMap}, io::ErrorKind, path::{Path, PathBuf}, sync::Arc};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Fixed keys; each one is owned by exactly one store.
pub mod keys {
    pub const CONTACTS: &str = "@contacts";
    pub const FAVORITES: &str = "@favorites";
    pub const INTERACTIONS: &str = "@contact_timestamps";
    pub const THEME: &str = "@theme_preference";
}

/// Durable string-keyed storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryBlobStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self { Self::default() }
    pub fn len(&self) -> usize { self.entries.read().len() }
    pub fn is_empty(&self) -> bool { self.entries.read().is_empty() }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }
    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }
}

/// One file per key under a directory: `@contacts` lands in `<dir>/contacts.json`.
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }
    pub fn dir(&self) -> &Path { &self.dir }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let stem: String = key.trim_start_matches('@')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.json"))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }
    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.path_for(key);
        tokio::fs::write(&path, value).await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

/// Per-key async mutexes serialising read-modify-write cycles.
///
/// Locks are never taken across keys, so two stores never wait on each other.
#[derive(Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<&'static str, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self { Self::default() }

    pub async fn lock(&self, key: &'static str) -> OwnedMutexGuard<()> {
        let m = self.locks.lock().entry(key).or_default().clone();
        m.lock_owned().await
    }
}

/// Reads and decodes the JSON value under `key`; `None` when absent.
pub(crate) async fn try_read_json<T: DeserializeOwned>(blobs: &dyn BlobStore, key: &'static str) -> StoreResult<Option<T>> {
    let Some(text) = blobs.get(key).await.map_err(|source| StoreError::Persistence { key, source })? else {
        return Ok(None);
    };
    serde_json::from_str(&text).map(Some).map_err(|source| StoreError::Parse { key, source })
}

/// Degrade-to-empty read: any failure is logged and replaced by `T::default()`.
pub(crate) async fn read_json_or_default<T: DeserializeOwned + Default>(blobs: &dyn BlobStore, key: &'static str) -> T {
    match try_read_json(blobs, key).await {
        Ok(v) => v.unwrap_or_default(),
        Err(e) => {
            warn!(key, error = %e, "read failed; using empty value");
            T::default()
        }
    }
}

/// Whole-blob rewrite; failures propagate.
pub(crate) async fn write_json<T: Serialize + ?Sized>(blobs: &dyn BlobStore, key: &'static str, value: &T) -> StoreResult<()> {
    let text = serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
    debug!(key, bytes = text.len(), "writing blob");
    blobs.set(key, text).await.map_err(|source| StoreError::Persistence { key, source })
}
