//! File Store - Persistent Single-File Backend
//!
//! Persists a whole namespace as one file inside a directory. Every write
//! rewrites the file through a temporary sibling and an atomic rename, so a
//! reader never observes a half-written namespace.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::codecs::JsonCodec;
use crate::config::CacheConfig;
use crate::traits::{CacheCodec, StoreBackend};
use async_trait::async_trait;

type Namespace = BTreeMap<String, serde_json::Value>;

/// File-backed persistent store
///
/// Entries survive process restarts. The directory is not created: a
/// missing or read-only directory makes writes fail, which is exactly what
/// availability probing detects.
///
/// # Example
///
/// ```rust,no_run
/// use data_cache::backends::FileStore;
/// use data_cache::StoreBackend;
///
/// # async fn example() -> anyhow::Result<()> {
/// let store = FileStore::new("/var/cache/myapp", "sessions");
/// store.set_item("user:1", serde_json::json!({"name": "alice"})).await?;
/// # Ok(())
/// # }
/// ```
pub struct FileStore<C: CacheCodec = JsonCodec> {
    dir: PathBuf,
    namespace: String,
    codec: C,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore<JsonCodec> {
    pub fn new(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self::with_codec(dir, namespace, JsonCodec)
    }

    /// Store in `dir` using the configured namespace
    pub fn from_config(dir: impl Into<PathBuf>, config: &CacheConfig) -> Self {
        Self::new(dir, config.namespace.clone())
    }
}

impl<C: CacheCodec> FileStore<C> {
    pub fn with_codec(dir: impl Into<PathBuf>, namespace: impl Into<String>, codec: C) -> Self {
        let dir = dir.into();
        let namespace = namespace.into();
        info!(dir = %dir.display(), namespace = %namespace, codec = codec.name(), "Initializing File Store");

        Self {
            dir,
            namespace,
            codec,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the file holding this namespace
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.cache", self.namespace))
    }

    async fn load(&self) -> Result<Namespace> {
        let path = self.path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => self
                .codec
                .deserialize(&bytes)
                .with_context(|| format!("Corrupt cache file: {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Namespace::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read cache file: {}", path.display())),
        }
    }

    async fn save(&self, namespace: &Namespace) -> Result<()> {
        let bytes = self.codec.serialize(namespace)?;
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", self.namespace, uuid::Uuid::new_v4()));

        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("Failed to write cache file: {}", tmp.display()))?;

        let path = self.path();
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("Failed to replace cache file: {}", path.display()));
        }
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Namespace) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut namespace = self.load().await?;
        if apply(&mut namespace) {
            self.save(&namespace).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<C: CacheCodec> StoreBackend for FileStore<C> {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.update(|namespace| {
            namespace.insert(key.to_string(), value);
            true
        })
        .await?;
        debug!(key = %key, file = %self.path().display(), "[File] Stored key");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.update(|namespace| namespace.remove(key).is_some()).await
    }

    async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>> {
        Ok(self.load().await?.into_iter().collect())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = %path.display(), "[File] Cleared store");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove cache file: {}", path.display())),
        }
    }

    fn name(&self) -> &'static str {
        "File"
    }
}

impl<C: CacheCodec> std::fmt::Debug for FileStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path())
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "ns");
        store.set_item("a", json!({"n": 1})).await.unwrap();
        store.set_item("b", json!("two")).await.unwrap();
        drop(store);

        let reopened = FileStore::new(dir.path(), "ns");
        assert_eq!(reopened.get_item("a").await.unwrap(), Some(json!({"n": 1})));
        assert_eq!(reopened.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileStore::new(dir.path(), "first");
        let second = FileStore::new(dir.path(), "second");
        first.set_item("k", json!(1)).await.unwrap();

        assert_eq!(second.get_item("k").await.unwrap(), None);
        second.clear().await.unwrap();
        assert_eq!(first.get_item("k").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_missing_dir_fails_writes_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("missing"), "ns");

        assert_eq!(store.get_item("k").await.unwrap(), None);
        assert!(store.set_item("k", json!(1)).await.is_err());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "ns");
        tokio::fs::write(store.path(), b"{oops").await.unwrap();

        assert!(store.get_item("k").await.is_err());
    }
}
