//! Integration tests for TTL handling
//!
//! Time is driven by a `ManualClock`, so expiry is exact and instant.

mod common;

use common::*;
use data_cache::{CacheError, CacheManagerBuilder, ManualClock, MemoryStore, NEVER_EXPIRES, StoreBackend, Ttl};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// set("x", {n:1}, 5) is readable immediately and gone 6 seconds later
#[tokio::test]
async fn test_expiry_scenario() {
    let (cache, store, clock) = setup_cache();

    cache.set("x", &json!({"n": 1}), Ttl::secs(5)).await.unwrap();
    let cached: Option<serde_json::Value> = cache.get("x").await.unwrap();
    assert_eq!(cached, Some(json!({"n": 1})));

    clock.advance(Duration::from_secs(6));
    let cached: Option<serde_json::Value> = cache.get("x").await.unwrap();
    assert_eq!(cached, None);

    // Read-triggered eviction removed it from the medium
    assert_eq!(store.raw("x").await, None);
    assert_eq!(cache.stats().expired, 1);
}

/// An entry is still valid at exactly its expiry instant
#[tokio::test]
async fn test_expiry_boundary() {
    let (cache, _store, clock) = setup_cache();

    cache.set("edge", &1, Ttl::secs(5)).await.unwrap();

    clock.advance(Duration::from_secs(5));
    assert_eq!(cache.get::<i32>("edge").await.unwrap(), Some(1));

    clock.advance(Duration::from_millis(1));
    assert_eq!(cache.get::<i32>("edge").await.unwrap(), None);
}

/// TTL -1 never expires
#[tokio::test]
async fn test_never_expires() {
    let (cache, store, clock) = setup_cache();

    cache.set("forever", "still here", Ttl::from_secs(-1)).await.unwrap();
    assert_eq!(
        store.raw("forever").await.unwrap()["expiresAt"],
        json!(NEVER_EXPIRES)
    );

    clock.advance(Duration::from_secs(10 * 365 * 24 * 3600));
    let cached: Option<String> = cache.get("forever").await.unwrap();
    assert_eq!(cached.as_deref(), Some("still here"));
}

/// A negative TTL other than -1 stores an entry that is already expired
#[tokio::test]
async fn test_negative_ttl_reads_as_absent() {
    let (cache, store, _clock) = setup_cache();

    cache.set("neg", &1, Ttl::from_secs(-5)).await.unwrap();
    assert_eq!(cache.get::<i32>("neg").await.unwrap(), None);
    assert_eq!(store.raw("neg").await, None);

    cache.set("neg", &1, Ttl::from_secs(-5)).await.unwrap();
    let all: HashMap<String, i32> = cache.get_all().await.unwrap();
    assert!(all.is_empty());
}

/// A failed delete during read-time eviction reaches the caller
#[tokio::test]
async fn test_eviction_delete_failure_surfaces() {
    let (cache, store, clock) = setup_cache();

    cache.set("k", &1, Ttl::secs(1)).await.unwrap();
    clock.advance(Duration::from_secs(2));
    store.set_failing_removes(true);

    let result = cache.get::<i32>("k").await;
    assert!(matches!(result, Err(CacheError::Backend { backend: "Primary", .. })));
    assert!(store.raw("k").await.is_some());

    store.set_failing_removes(false);
    assert_eq!(cache.get::<i32>("k").await.unwrap(), None);
    assert_eq!(store.raw("k").await, None);
}

/// A zero TTL is readable until the clock moves on
#[tokio::test]
async fn test_zero_ttl() {
    let (cache, _store, clock) = setup_cache();

    cache.set("blink", &true, Ttl::from_secs(0)).await.unwrap();
    assert_eq!(cache.get::<bool>("blink").await.unwrap(), Some(true));

    clock.advance(Duration::from_millis(1));
    assert_eq!(cache.get::<bool>("blink").await.unwrap(), None);
}

/// get_all skips and deletes expired entries, keeping live ones
#[tokio::test]
async fn test_get_all_evicts_expired() {
    let (cache, store, clock) = setup_cache();

    cache.set("short", &1, Ttl::secs(1)).await.unwrap();
    cache.set("long", &2, Ttl::secs(100)).await.unwrap();
    cache.set("forever", &3, Ttl::Never).await.unwrap();

    clock.advance(Duration::from_secs(2));

    let all: HashMap<String, i32> = cache.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(!all.contains_key("short"));
    assert_eq!(all.get("long"), Some(&2));
    assert_eq!(all.get("forever"), Some(&3));

    assert_eq!(store.raw("short").await, None);
    assert_eq!(store.len(), 2);
}

/// Expired entries are excluded from get_all after a get already missed them
#[tokio::test]
async fn test_expired_key_absent_everywhere() {
    let (cache, _store, clock) = setup_cache();
    let key = test_key("gone");

    cache.set(&key, "v", Ttl::secs(3)).await.unwrap();
    clock.advance(Duration::from_secs(4));

    assert_eq!(cache.get::<String>(&key).await.unwrap(), None);
    let all: HashMap<String, String> = cache.get_all().await.unwrap();
    assert!(!all.contains_key(&key));
}

/// Expiry is fixed at write time; reading does not extend it
#[tokio::test]
async fn test_reads_do_not_refresh_expiry() {
    let (cache, _store, clock) = setup_cache();

    cache.set("k", &1, Ttl::secs(10)).await.unwrap();
    for _ in 0..3 {
        clock.advance(Duration::from_secs(3));
        assert_eq!(cache.get::<i32>("k").await.unwrap(), Some(1));
    }

    clock.advance(Duration::from_secs(2));
    assert_eq!(cache.get::<i32>("k").await.unwrap(), None);
}

/// Overwriting resets the expiry
#[tokio::test]
async fn test_overwrite_resets_expiry() {
    let (cache, _store, clock) = setup_cache();

    cache.set("k", &1, Ttl::secs(5)).await.unwrap();
    clock.advance(Duration::from_secs(4));
    cache.set("k", &2, Ttl::secs(5)).await.unwrap();
    clock.advance(Duration::from_secs(4));

    assert_eq!(cache.get::<i32>("k").await.unwrap(), Some(2));
}

/// Expiry is stored as an absolute timestamp from the injected clock
#[tokio::test]
async fn test_absolute_timestamp() {
    let clock = ManualClock::new(1_700_000_000_000);
    let store = Arc::new(MemoryStore::new());
    let cache = CacheManagerBuilder::new()
        .with_backend(store.clone())
        .with_clock(Arc::new(clock))
        .build();

    cache.set("k", "v", Ttl::secs(90)).await.unwrap();

    let raw = store.get_item("k").await.unwrap().unwrap();
    assert_eq!(raw, json!({"value": "v", "expiresAt": 1_700_000_090_000_i64}));
}
