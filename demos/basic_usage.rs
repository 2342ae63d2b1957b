//! Basic Usage Example
//!
//! Demonstrates simple cache operations: set, get, compute on miss, invalidate.
//!
//! Run with: cargo run --example basic_usage

use data_cache::{CacheManagerBuilder, CacheStrategy, Ttl};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // 1. Default cache: a single in-memory store
    let cache = CacheManagerBuilder::new().build();

    // 2. Store data with different TTLs
    let user_data = serde_json::json!({
        "id": 1,
        "name": "Alice",
        "email": "alice@example.com",
        "role": "admin"
    });
    cache
        .set_with_strategy("user:1", &user_data, CacheStrategy::ShortTerm)
        .await?;
    cache.set("settings", &serde_json::json!({"theme": "dark"}), Ttl::Never).await?;

    // 3. Retrieve data
    if let Some(cached_user) = cache.get::<serde_json::Value>("user:1").await? {
        tracing::info!(user = %cached_user, "Retrieved from cache");
    }

    // 4. Compute on miss
    let report: Vec<u32> = cache
        .get_or_set("report:daily", || async { Ok(vec![3, 1, 4, 1, 5]) }, Ttl::secs(30))
        .await?;
    tracing::info!(?report, "Computed report");

    // 5. Invalidate and list what is left
    cache.invalidate("user:1").await?;
    let remaining = cache.get_all::<serde_json::Value>().await?;
    tracing::info!(keys = ?remaining.keys().collect::<Vec<_>>(), "Remaining entries");

    // 6. Statistics
    let stats = cache.stats();
    tracing::info!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = stats.hit_rate,
        backend = ?stats.active_backend,
        "Cache statistics"
    );

    Ok(())
}
