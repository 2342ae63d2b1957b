//! Common utilities for integration tests
//!
//! This module provides shared test infrastructure including:
//! - A controllable test backend (failing, delayed, counting)
//! - Cache constructors wired to a manual clock
//! - Test data generators

#![allow(dead_code)]

use anyhow::{Result, bail};
use async_trait::async_trait;
use data_cache::{CacheManager, CacheManagerBuilder, ManualClock, MemoryStore, StoreBackend};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Create a test key with unique suffix
pub fn test_key(name: &str) -> String {
    format!("test_{}_{}", name, rand::random::<u32>())
}

/// Backend wrapping a `MemoryStore` that can be switched into failure and slowed down
pub struct TestStore {
    name: &'static str,
    inner: MemoryStore,
    failing: AtomicBool,
    failing_removes: AtomicBool,
    delay: Option<Duration>,
    set_calls: AtomicUsize,
    get_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl TestStore {
    fn build(name: &'static str, failing: bool, delay: Option<Duration>) -> Arc<Self> {
        Arc::new(Self {
            name,
            inner: MemoryStore::new(),
            failing: AtomicBool::new(failing),
            failing_removes: AtomicBool::new(false),
            delay,
            set_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
        })
    }

    pub fn healthy(name: &'static str) -> Arc<Self> {
        Self::build(name, false, None)
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::build(name, true, None)
    }

    /// Healthy, but every operation sleeps first
    pub fn delayed(name: &'static str, delay: Duration) -> Arc<Self> {
        Self::build(name, false, Some(delay))
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only `remove_item`, leaving reads and writes working
    pub fn set_failing_removes(&self, failing: bool) {
        self.failing_removes.store(failing, Ordering::SeqCst);
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Write straight into the medium, bypassing the cache engine
    pub async fn put_raw(&self, key: &str, value: serde_json::Value) {
        let _ = self.inner.set_item(key, value).await;
    }

    pub async fn raw(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.get_item(key).await.ok().flatten()
    }

    async fn enter(&self) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            bail!("{} storage unavailable", self.name);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for TestStore {
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        if self.failing_removes.load(Ordering::SeqCst) {
            bail!("{} refused delete", self.name);
        }
        self.inner.remove_item(key).await
    }

    async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>> {
        self.enter().await?;
        self.inner.get_all().await
    }

    async fn clear(&self) -> Result<()> {
        self.enter().await?;
        self.inner.clear().await
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Cache over the given backends with a manual clock
pub fn cache_with(backends: Vec<Arc<dyn StoreBackend>>) -> (CacheManager, ManualClock) {
    let clock = ManualClock::starting_now();
    let cache = CacheManagerBuilder::new()
        .with_backends(backends)
        .with_clock(Arc::new(clock.clone()))
        .build();
    (cache, clock)
}

/// Cache over a single healthy test store with a manual clock
pub fn setup_cache() -> (CacheManager, Arc<TestStore>, ManualClock) {
    let store = TestStore::healthy("Primary");
    let (cache, clock) = cache_with(vec![store.clone()]);
    (cache, store, clock)
}

/// Generate test data of various types
pub mod test_data {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct User {
        pub id: u64,
        pub name: String,
        pub email: String,
    }

    impl User {
        pub fn new(id: u64) -> Self {
            Self {
                id,
                name: format!("User {id}"),
                email: format!("user{id}@example.com"),
            }
        }
    }

    /// Generate JSON test data
    pub fn json_user(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": format!("User {id}"),
            "email": format!("user{id}@example.com"),
            "tags": ["a", "b"],
            "active": true,
            "manager": null
        })
    }
}
