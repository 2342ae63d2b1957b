//! Cache Manager - TTL-Aware Operations over the Selected Backend
//!
//! Wraps whichever configured backend passed probing, stamps every value with
//! an expiry, and evicts expired entries lazily when they are read.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::backends::MemoryStore;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::entry::{Envelope, Ttl};
use crate::error::{CacheError, Result};
use crate::prober::{self, BackendHealth};
use crate::traits::StoreBackend;

/// Cache strategies for different data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    /// Real-time data - 10 seconds TTL
    RealTime,
    /// Short-term data - 5 minutes TTL
    ShortTerm,
    /// Medium-term data - 1 hour TTL
    MediumTerm,
    /// Long-term data - 3 hours TTL
    LongTerm,
    /// Never expires
    Forever,
    /// Custom TTL
    Custom(Duration),
    /// The configured default TTL
    Default,
}

impl CacheStrategy {
    /// Convert strategy to a TTL, resolving `Default` against `default_ttl`
    pub fn to_ttl(self, default_ttl: Ttl) -> Ttl {
        match self {
            Self::RealTime => Ttl::secs(10),
            Self::ShortTerm => Ttl::secs(300),   // 5 minutes
            Self::MediumTerm => Ttl::secs(3600), // 1 hour
            Self::LongTerm => Ttl::secs(10800),  // 3 hours
            Self::Forever => Ttl::Never,
            Self::Custom(duration) => Ttl::After(duration),
            Self::Default => default_ttl,
        }
    }
}

/// Cache Manager - get/set/compute over the first available backend
///
/// # Backend selection
///
/// Backends are probed lazily: the first operation that needs a backend
/// while none is selected runs a probe round over every configured backend
/// and selects the first one (in configured order) that passed. Once
/// selected, a backend stays selected even if it later starts failing; its
/// failures are returned to the caller and never trigger a failover.
///
/// # Missing backend
///
/// When no backend is available, reads behave as misses and removals as
/// no-ops. Only writes fail, with [`CacheError::NoBackendAvailable`].
///
/// # Concurrency
///
/// [`get_or_set`](Self::get_or_set) is not single-flight: concurrent callers
/// that all miss will each run their fetcher and each write the result.
/// Callers needing exactly-once computation must serialize calls
/// themselves. No operation has a timeout; a hung backend call hangs the
/// operation awaiting it.
pub struct CacheManager {
    /// Configured backends, in preference order
    backends: Vec<Arc<dyn StoreBackend>>,
    /// Index of the selected backend, `None` until a probe succeeds
    active: RwLock<Option<usize>>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    /// Statistics
    reads: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    writes: AtomicU64,
    fetches: AtomicU64,
    probe_rounds: AtomicU64,
}

impl CacheManager {
    /// Create a cache over `backends` (in preference order) with the wall clock and default config
    ///
    /// No probing happens here; the first operation triggers it.
    pub fn new(backends: Vec<Arc<dyn StoreBackend>>) -> Self {
        Self::with_parts(backends, Arc::new(SystemClock), CacheConfig::default())
    }

    pub(crate) fn with_parts(
        backends: Vec<Arc<dyn StoreBackend>>,
        clock: Arc<dyn Clock>,
        config: CacheConfig,
    ) -> Self {
        info!(
            backends = ?backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "Initializing Cache Manager"
        );

        Self {
            backends,
            active: RwLock::new(None),
            clock,
            config,
            reads: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            probe_rounds: AtomicU64::new(0),
        }
    }

    /// Run a probe round now and replace the selected backend with its outcome
    ///
    /// # Returns
    /// Name of the newly selected backend, `None` if every probe failed
    pub async fn probe(&self) -> Option<&'static str> {
        self.probe_rounds.fetch_add(1, Ordering::Relaxed);
        let selected = prober::select_backend(&self.backends).await;
        *self.active.write() = selected;
        selected.and_then(|index| self.backends.get(index)).map(|b| b.name())
    }

    /// Selected backend, probing first if none is selected
    async fn resolve_backend(&self) -> Option<Arc<dyn StoreBackend>> {
        let current = *self.active.read();
        let index = match current {
            Some(index) => Some(index),
            None => {
                self.probe().await;
                *self.active.read()
            }
        };
        index.and_then(|index| self.backends.get(index).cloned())
    }

    /// Store a value with an explicit TTL
    ///
    /// # Arguments
    /// * `key` - Cache key
    /// * `value` - Any serializable value
    /// * `ttl` - Expiry relative to now, or [`Ttl::Never`]
    ///
    /// # Errors
    /// * [`CacheError::NoBackendAvailable`] - no backend passed probing
    /// * [`CacheError::Backend`] - the selected backend failed the write
    /// * [`CacheError::Encode`] - the value cannot be represented as JSON
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Ttl) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let Some(backend) = self.resolve_backend().await else {
            return Err(CacheError::NoBackendAvailable);
        };

        let value = serde_json::to_value(value).map_err(CacheError::Encode)?;
        let envelope = Envelope::new(value, ttl, self.clock.now_millis());
        let raw = serde_json::to_value(&envelope).map_err(CacheError::Encode)?;

        backend
            .set_item(key, raw)
            .await
            .map_err(|e| CacheError::backend(backend.name(), e))?;

        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, backend = backend.name(), expires_at = envelope.expires_at, "Cached key");
        Ok(())
    }

    /// Store a value with a TTL taken from a cache strategy
    pub async fn set_with_strategy<T>(&self, key: &str, value: &T, strategy: CacheStrategy) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.set(key, value, strategy.to_ttl(self.config.default_ttl)).await
    }

    /// Get a value if it is cached and not expired
    ///
    /// An expired entry is deleted from the backend before `None` is returned.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Live entry found
    /// * `Ok(None)` - Not cached, expired, or no backend available
    /// * `Err(error)` - Backend failure, or the stored entry does not decode into `T`
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.reads.fetch_add(1, Ordering::Relaxed);

        let Some(backend) = self.resolve_backend().await else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };

        let raw = backend
            .get_item(key)
            .await
            .map_err(|e| CacheError::backend(backend.name(), e))?;

        let live = match raw {
            Some(raw) => self.live_value(backend.as_ref(), key, raw).await?,
            None => None,
        };

        match live {
            Some(value) => {
                let value = decode(key, value)?;
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(value))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// Every live entry, keyed by cache key
    ///
    /// Expired entries met during the scan are deleted and left out. Returns
    /// an empty map when no backend is available.
    ///
    /// # Errors
    /// The first live entry that does not decode into `T` aborts the scan
    /// with [`CacheError::Decode`]; expired entries already met stay
    /// deleted. Use `serde_json::Value` for `T` when a cache holds mixed
    /// value types.
    pub async fn get_all<T>(&self) -> Result<HashMap<String, T>>
    where
        T: DeserializeOwned,
    {
        let Some(backend) = self.resolve_backend().await else {
            return Ok(HashMap::new());
        };

        let entries = backend
            .get_all()
            .await
            .map_err(|e| CacheError::backend(backend.name(), e))?;

        let mut result = HashMap::with_capacity(entries.len());
        for (key, raw) in entries {
            if let Some(value) = self.live_value(backend.as_ref(), &key, raw).await? {
                let value = decode(&key, value)?;
                result.insert(key, value);
            }
        }

        debug!(count = result.len(), backend = backend.name(), "Loaded all live entries");
        Ok(result)
    }

    /// Get a cached value, or compute, store and return it
    ///
    /// `fetcher` runs only on a miss. Its error is returned as
    /// [`CacheError::Fetcher`] and nothing is written.
    ///
    /// Not single-flight: two concurrent calls that both miss both run
    /// their fetchers, and the later write wins.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use data_cache::{CacheManager, Ttl};
    /// # async fn example(cache: &CacheManager) -> Result<(), data_cache::CacheError> {
    /// let profile: serde_json::Value = cache
    ///     .get_or_set("profile:42", || async {
    ///         Ok(serde_json::json!({"id": 42, "name": "alice"}))
    ///     }, Ttl::secs(300))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_or_set<T, F, Fut>(&self, key: &str, fetcher: F, ttl: Ttl) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(cached) = self.get(key).await? {
            return Ok(cached);
        }

        debug!(key = %key, "Cache miss, running fetcher");
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let value = fetcher().await.map_err(CacheError::Fetcher)?;

        self.set(key, &value, ttl).await?;
        Ok(value)
    }

    /// [`get_or_set`](Self::get_or_set) with a TTL taken from a cache strategy
    pub async fn get_or_set_with_strategy<T, F, Fut>(
        &self,
        key: &str,
        fetcher: F,
        strategy: CacheStrategy,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.get_or_set(key, fetcher, strategy.to_ttl(self.config.default_ttl))
            .await
    }

    /// Remove one key; a no-op when no backend is available
    pub async fn invalidate(&self, key: &str) -> Result<()> {
        let Some(backend) = self.resolve_backend().await else {
            return Ok(());
        };

        backend
            .remove_item(key)
            .await
            .map_err(|e| CacheError::backend(backend.name(), e))?;
        debug!(key = %key, backend = backend.name(), "Invalidated key");
        Ok(())
    }

    /// Remove every entry from the selected backend; a no-op when none is available
    pub async fn clear_all(&self) -> Result<()> {
        let Some(backend) = self.resolve_backend().await else {
            return Ok(());
        };

        backend
            .clear()
            .await
            .map_err(|e| CacheError::backend(backend.name(), e))?;
        info!(backend = backend.name(), "Cleared cache");
        Ok(())
    }

    /// Unwrap an envelope, deleting it from `backend` when expired
    async fn live_value(
        &self,
        backend: &dyn StoreBackend,
        key: &str,
        raw: serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        let envelope: Envelope = decode(key, raw)?;

        if envelope.is_expired(self.clock.now_millis()) {
            backend
                .remove_item(key)
                .await
                .map_err(|e| CacheError::backend(backend.name(), e))?;
            self.expired.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, expires_at = envelope.expires_at, "Evicted expired entry");
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    /// Name of the selected backend, without probing
    pub fn active_backend(&self) -> Option<&'static str> {
        let current = *self.active.read();
        current
            .and_then(|index| self.backends.get(index))
            .map(|b| b.name())
    }

    /// Names of the configured backends, in preference order
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Probe every configured backend and report each one
    ///
    /// The selected backend is left untouched.
    pub async fn health_check(&self) -> Vec<BackendHealth> {
        prober::probe_all(&self.backends).await
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheManagerStats {
        let reads = self.reads.load(Ordering::Relaxed);
        let hits = self.hits.load(Ordering::Relaxed);
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if reads > 0 {
            (hits as f64 / reads as f64) * 100.0
        } else {
            0.0
        };

        CacheManagerStats {
            reads,
            hits,
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            probe_rounds: self.probe_rounds.load(Ordering::Relaxed),
            hit_rate,
            active_backend: self.active_backend(),
        }
    }
}

impl Default for CacheManager {
    /// A cache over a single in-memory store
    fn default() -> Self {
        Self::new(vec![Arc::new(MemoryStore::new())])
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| CacheError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Cache Manager statistics
#[derive(Debug, Clone)]
pub struct CacheManagerStats {
    /// Calls to `get` (including those made by `get_or_set`)
    pub reads: u64,
    pub hits: u64,
    pub misses: u64,
    /// Entries deleted because they were read after expiring
    pub expired: u64,
    pub writes: u64,
    /// Fetcher invocations by `get_or_set`
    pub fetches: u64,
    pub probe_rounds: u64,
    /// Percentage of reads that hit
    pub hit_rate: f64,
    pub active_backend: Option<&'static str>,
}
