//! Data Cache
//!
//! A pluggable key-value cache that sits in front of heterogeneous,
//! possibly-unreliable storage backends, featuring:
//! - **Backend fallback**: the first configured backend that passes a
//!   write/delete probe is used; probing is lazy and re-runs only while no
//!   backend is selected
//! - **TTL envelopes**: every value is stored with an absolute expiry and
//!   evicted lazily when read after it
//! - **Compute on miss**: `get_or_set` runs a fetcher and caches its result
//! - **Built-in backends**: `DashMap` memory store, Moka, single-file
//!   persistent store, Redis hash
//!
//! # Quick Start
//!
//! ```rust
//! use data_cache::{CacheManagerBuilder, Ttl};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), data_cache::CacheError> {
//!     let cache = CacheManagerBuilder::new().build();
//!
//!     cache.set("user:1", &serde_json::json!({"name": "alice"}), Ttl::secs(60)).await?;
//!
//!     let user: Option<serde_json::Value> = cache.get("user:1").await?;
//!     assert_eq!(user, Some(serde_json::json!({"name": "alice"})));
//!
//!     let score: u32 = cache
//!         .get_or_set("score:1", || async { Ok(100) }, Ttl::Never)
//!         .await?;
//!     assert_eq!(score, 100);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure Semantics
//!
//! - Probe failures only exclude a backend from selection.
//! - With no backend available, `set` fails with
//!   [`CacheError::NoBackendAvailable`]; reads return misses and removals do
//!   nothing.
//! - Once a backend is selected, its errors are returned to the caller; the
//!   cache never fails over to another backend on its own.
//!
//! # Architecture
//!
//! ```text
//! get/set/get_or_set → selected backend? ─ yes → backend → {value, expiresAt}
//!                              │
//!                              no → probe all backends concurrently
//!                                   → select first passing (configured order)
//! ```

pub mod backends;
pub mod builder;
pub mod cache_manager;
pub mod clock;
pub mod codecs;
pub mod config;
pub mod entry;
pub mod error;
pub mod prober;
pub mod traits;

pub use backends::{FileStore, MemoryStore};

#[cfg(feature = "moka")]
pub use backends::MokaStore;

#[cfg(feature = "redis")]
pub use backends::RedisStore;

pub use builder::CacheManagerBuilder;
pub use cache_manager::{CacheManager, CacheManagerStats, CacheStrategy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codecs::JsonCodec;
#[cfg(feature = "msgpack")]
pub use codecs::MsgPackCodec;
pub use config::CacheConfig;
pub use entry::{Envelope, NEVER_EXPIRES, Ttl};
pub use error::CacheError;
pub use prober::BackendHealth;
pub use traits::{CacheCodec, StoreBackend};

// Re-export async_trait for user convenience
pub use async_trait::async_trait;
