//! Redis Store - Shared Persistent Backend
//!
//! Keeps a whole namespace in a single Redis hash: one field per cache key.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::codecs::JsonCodec;
use crate::config::CacheConfig;
use crate::traits::{CacheCodec, StoreBackend};
use async_trait::async_trait;

/// Redis-backed store with `ConnectionManager` for automatic reconnection
///
/// Operation mapping:
/// - `get_item` → `HGET namespace key`
/// - `set_item` → `HSET namespace key value`
/// - `remove_item` → `HDEL namespace key`
/// - `get_all` → `HGETALL namespace`
/// - `clear` → `DEL namespace`
///
/// Construction fails fast when the server cannot be reached. A store that
/// connected once and later loses the server fails its operations, and the
/// cache engine surfaces those failures.
pub struct RedisStore<C: CacheCodec = JsonCodec> {
    /// Redis connection manager - handles reconnection automatically
    conn_manager: ConnectionManager,
    namespace: String,
    codec: C,
}

impl RedisStore<JsonCodec> {
    /// Connect using `REDIS_URL` (default `redis://127.0.0.1:6379`) and the configured namespace
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis client cannot be created or connection fails.
    pub async fn new(config: &CacheConfig) -> Result<Self> {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        Self::with_url(&redis_url, config.namespace.clone(), JsonCodec).await
    }
}

impl<C: CacheCodec> RedisStore<C> {
    /// Connect to a specific Redis URL
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis client cannot be created or connection fails.
    pub async fn with_url(redis_url: &str, namespace: impl Into<String>, codec: C) -> Result<Self> {
        let namespace = namespace.into();
        info!(redis_url = %redis_url, namespace = %namespace, "Initializing Redis Store with ConnectionManager");

        let client = Client::open(redis_url)
            .with_context(|| format!("Failed to create Redis client with URL: {redis_url}"))?;

        let conn_manager = ConnectionManager::new(client)
            .await
            .context("Failed to establish Redis connection manager")?;

        let mut conn = conn_manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis PING failed")?;

        info!(redis_url = %redis_url, "Redis Store connected successfully");

        Ok(Self {
            conn_manager,
            namespace,
            codec,
        })
    }
}

#[async_trait]
impl<C: CacheCodec> StoreBackend for RedisStore<C> {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let mut conn = self.conn_manager.clone();
        let bytes: Option<Vec<u8>> = conn.hget(&self.namespace, key).await?;
        bytes.map(|bytes| self.codec.deserialize(&bytes)).transpose()
    }

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let bytes = self.codec.serialize(&value)?;
        let mut conn = self.conn_manager.clone();
        let _: () = conn.hset(&self.namespace, key, bytes).await?;
        debug!(key = %key, namespace = %self.namespace, "[Redis] Stored key");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn.hdel(&self.namespace, key).await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>> {
        let mut conn = self.conn_manager.clone();
        let raw: HashMap<String, Vec<u8>> = conn.hgetall(&self.namespace).await?;

        let mut items = HashMap::with_capacity(raw.len());
        for (key, bytes) in raw {
            items.insert(key, self.codec.deserialize(&bytes)?);
        }
        debug!(count = items.len(), namespace = %self.namespace, "[Redis] Loaded namespace");
        Ok(items)
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn.del(&self.namespace).await?;
        debug!(namespace = %self.namespace, "[Redis] Cleared store");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Redis"
    }
}
