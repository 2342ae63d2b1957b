//! Storage Backend Implementations
//!
//! Thin adapters translating the [`StoreBackend`](crate::traits::StoreBackend)
//! operations onto a specific storage medium.
//!
//! # Available Backends
//!
//! ## In-Memory
//! - **`MemoryStore`** - `DashMap` of codec-encoded values (default backend)
//! - **Moka** - Moka concurrent cache used as a plain map (feature: `moka`)
//!
//! ## Persistent
//! - **`FileStore`** - One file per namespace, atomic rewrites
//! - **Redis** - One hash per namespace on a Redis server (feature: `redis`)
//!
//! # Usage
//!
//! ```rust,no_run
//! use data_cache::backends::{FileStore, MemoryStore};
//! use data_cache::CacheManagerBuilder;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Prefer the persistent store, fall back to memory when the directory is unusable
//! let cache = CacheManagerBuilder::new()
//!     .with_backend(Arc::new(FileStore::new("/var/cache/myapp", "data_cache")))
//!     .with_backend(Arc::new(MemoryStore::new()))
//!     .build_and_probe()
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod file_store;
pub mod memory_store;

#[cfg(feature = "moka")]
pub mod moka_store;

#[cfg(feature = "redis")]
pub mod redis_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

#[cfg(feature = "moka")]
pub use moka_store::MokaStore;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
