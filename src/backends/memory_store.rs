//! Memory Store - `DashMap` In-Process Backend
//!
//! The default backend: a concurrent map holding codec-encoded values.

use anyhow::Result;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::codecs::JsonCodec;
use crate::traits::{CacheCodec, StoreBackend};
use async_trait::async_trait;

/// In-process store backed by `DashMap`
///
/// Values are kept encoded, so what comes back out has made the same
/// structural round trip it would through a persistent medium. A value
/// read from the store is never aliased with the one that was written.
///
/// **Features**:
/// - Lock-free concurrent reads/writes
/// - Pluggable codec (JSON by default)
/// - Always passes availability probing
///
/// **Limitations**:
/// - Lost when the process exits
/// - No size limits (unbounded growth)
///
/// **Example**:
/// ```rust
/// use data_cache::backends::MemoryStore;
/// use data_cache::StoreBackend;
///
/// # async fn example() -> anyhow::Result<()> {
/// let store = MemoryStore::new();
/// let value = serde_json::json!({"user": "alice"});
///
/// store.set_item("user:1", value.clone()).await?;
/// assert_eq!(store.get_item("user:1").await?, Some(value));
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore<C: CacheCodec = JsonCodec> {
    /// Concurrent `HashMap` of encoded values
    map: Arc<DashMap<String, Vec<u8>>>,
    codec: C,
    /// Set counter
    sets: Arc<AtomicU64>,
}

impl MemoryStore<JsonCodec> {
    /// Create new memory store with the JSON codec
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl<C: CacheCodec> MemoryStore<C> {
    pub fn with_codec(codec: C) -> Self {
        info!(codec = codec.name(), "Initializing Memory Store (DashMap)");

        Self {
            map: Arc::new(DashMap::new()),
            codec,
            sets: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get current number of stored entries, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Total number of writes since creation
    #[must_use]
    pub fn set_count(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }
}

impl Default for MemoryStore<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<C: CacheCodec> StoreBackend for MemoryStore<C> {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>> {
        // Copy the bytes out so the shard lock is released before decoding
        let Some(bytes) = self.map.get(key).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(Some(self.codec.deserialize(&bytes)?))
    }

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let bytes = self.codec.serialize(&value)?;
        self.map.insert(key.to_string(), bytes);
        self.sets.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "[Memory] Stored key");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.map.remove(key);
        Ok(())
    }

    async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>> {
        let snapshot: Vec<(String, Vec<u8>)> = self
            .map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut items = HashMap::with_capacity(snapshot.len());
        for (key, bytes) in snapshot {
            items.insert(key, self.codec.deserialize(&bytes)?);
        }
        Ok(items)
    }

    async fn clear(&self) -> Result<()> {
        let removed = self.map.len();
        self.map.clear();
        debug!(count = removed, "[Memory] Cleared store");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}
