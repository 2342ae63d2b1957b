//! Moka Store - In-Memory Backend
//!
//! In-memory store using Moka's concurrent cache as a plain key-value map.

use anyhow::Result;
use moka::future::Cache;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::traits::StoreBackend;
use async_trait::async_trait;

/// Moka-backed in-memory store
///
/// Built without capacity, time-to-live or time-to-idle limits: entries live
/// until removed, and expiration stays the cache engine's job.
/// Values are held as `serde_json::Value` without encoding.
pub struct MokaStore {
    /// Moka cache instance
    cache: Cache<String, serde_json::Value>,
}

impl MokaStore {
    /// Create new Moka store
    pub fn new() -> Self {
        info!("Initializing Moka Store");

        Self {
            cache: Cache::builder().build(),
        }
    }

    /// Approximate number of entries
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MokaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreBackend for MokaStore {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.cache.get(key).await)
    }

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.cache.insert(key.to_string(), value).await;
        debug!(key = %key, "[Moka] Stored key");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>> {
        Ok(self
            .cache
            .iter()
            .map(|(key, value)| (key.as_ref().clone(), value))
            .collect())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        debug!("[Moka] Cleared store");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Moka"
    }
}
