//! Fallback Backends Example
//!
//! Prefers a persistent file store and falls back to memory when the cache
//! directory cannot be written.
//!
//! Run with: DATA_CACHE_DIR=/tmp cargo run --example fallback_backends

use data_cache::{CacheConfig, CacheManagerBuilder, FileStore, MemoryStore, StoreBackend, Ttl};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    let config = CacheConfig::from_env();
    let dir = std::env::var("DATA_CACHE_DIR").unwrap_or_else(|_| "/nonexistent/cache".to_string());

    let mut backends: Vec<Arc<dyn StoreBackend>> =
        vec![Arc::new(FileStore::from_config(&dir, &config))];
    backends.extend(redis_backend(&config).await);
    backends.push(Arc::new(MemoryStore::new()));

    let cache = CacheManagerBuilder::new()
        .with_backends(backends)
        .with_config(config)
        .build_and_probe()
        .await;

    for health in cache.health_check().await {
        tracing::info!(
            backend = health.name,
            available = health.available,
            error = health.error.as_deref().unwrap_or("-"),
            "Backend status"
        );
    }
    tracing::info!(selected = ?cache.active_backend(), "Using backend");

    let visits: u64 = cache.get::<u64>("visits").await?.unwrap_or(0) + 1;
    cache.set("visits", &visits, Ttl::Never).await?;
    tracing::info!(visits, "Visit recorded");

    Ok(())
}

#[cfg(feature = "redis")]
async fn redis_backend(config: &CacheConfig) -> Option<Arc<dyn StoreBackend>> {
    match data_cache::RedisStore::new(config).await {
        Ok(redis) => Some(Arc::new(redis)),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, skipping");
            None
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn redis_backend(_config: &CacheConfig) -> Option<Arc<dyn StoreBackend>> {
    None
}
