//! Cache Manager Builder
//!
//! Provides a builder pattern for constructing a [`CacheManager`] over an
//! ordered list of backends.
//!
//! # Example: Default Backend
//!
//! ```rust
//! use data_cache::CacheManagerBuilder;
//!
//! // A single in-memory store
//! let cache = CacheManagerBuilder::new().build();
//! assert_eq!(cache.backend_names(), vec!["Memory"]);
//! ```
//!
//! # Example: Persistent Store with In-Memory Fallback
//!
//! ```rust,no_run
//! use data_cache::backends::{FileStore, MemoryStore};
//! use data_cache::{CacheConfig, CacheManagerBuilder};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = CacheConfig::from_env();
//! let cache = CacheManagerBuilder::new()
//!     .with_backend(Arc::new(FileStore::from_config("/var/cache/myapp", &config)))
//!     .with_backend(Arc::new(MemoryStore::new()))
//!     .with_config(config)
//!     .build_and_probe()
//!     .await;
//! # }
//! ```

use std::sync::Arc;
use tracing::info;

use crate::backends::MemoryStore;
use crate::cache_manager::CacheManager;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::traits::StoreBackend;

/// Builder for constructing a `CacheManager`
///
/// # Default Behavior
///
/// - **Backends**: a single `MemoryStore` when none is added
/// - **Clock**: `SystemClock`
/// - **Config**: `CacheConfig::default()`
///
/// Backends are tried in the order they were added; the first one that
/// passes probing is used.
pub struct CacheManagerBuilder {
    backends: Vec<Arc<dyn StoreBackend>>,
    clock: Option<Arc<dyn Clock>>,
    config: Option<CacheConfig>,
}

impl CacheManagerBuilder {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            clock: None,
            config: None,
        }
    }

    /// Append a backend to the preference list
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn StoreBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Append several backends, keeping their order
    #[must_use]
    pub fn with_backends<I>(mut self, backends: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn StoreBackend>>,
    {
        self.backends.extend(backends);
        self
    }

    /// Use a custom time source (e.g. `ManualClock` in tests)
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build without probing; the first cache operation selects a backend
    pub fn build(self) -> CacheManager {
        let backends = if self.backends.is_empty() {
            info!("No backends configured, using default Memory store");
            vec![Arc::new(MemoryStore::new()) as Arc<dyn StoreBackend>]
        } else {
            self.backends
        };

        CacheManager::with_parts(
            backends,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.config.unwrap_or_default(),
        )
    }

    /// Build and run the first probe round immediately
    ///
    /// A failed round is not an error: the cache starts with no backend
    /// selected and probes again on first use.
    pub async fn build_and_probe(self) -> CacheManager {
        let cache = self.build();
        cache.probe().await;
        cache
    }
}

impl Default for CacheManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
