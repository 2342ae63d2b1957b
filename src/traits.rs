//! Storage Backend Traits
//!
//! This module defines the trait abstractions that allow users to plug their
//! own storage media and serialization codecs into the cache.
//!
//! # Architecture
//!
//! - `CacheCodec`: Trait for pluggable serialization backends
//! - `StoreBackend`: Core trait for every storage medium the engine can select
//!
//! # Example: Custom Backend
//!
//! ```rust,ignore
//! use data_cache::{StoreBackend, async_trait};
//! use std::collections::HashMap;
//! use anyhow::Result;
//!
//! struct MyStore {
//!     // Your implementation
//! }
//!
//! #[async_trait]
//! impl StoreBackend for MyStore {
//!     async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>> {
//!         // Your implementation
//!     }
//!
//!     async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()> {
//!         // Your implementation
//!     }
//!
//!     async fn remove_item(&self, key: &str) -> Result<()> {
//!         // Your implementation
//!     }
//!
//!     async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>> {
//!         // Your implementation
//!     }
//!
//!     async fn clear(&self) -> Result<()> {
//!         // Your implementation
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Debug;

/// Trait for stored value serialization/deserialization
///
/// Backends that keep bytes (memory map, file, Redis hash) run every value
/// through a codec, so a value read back has gone through the same
/// structural round trip regardless of the medium.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync + Debug` to support concurrent access across async tasks
/// and provide debugging capabilities.
///
/// # Example: Custom Codec
///
/// ```rust,ignore
/// use data_cache::CacheCodec;
/// use anyhow::Result;
/// use serde::{Serialize, de::DeserializeOwned};
///
/// #[derive(Debug)]
/// struct MyCustomCodec;
///
/// impl CacheCodec for MyCustomCodec {
///     fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
///         Ok(mycodec::serialize(value)?)
///     }
///
///     fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
///         Ok(mycodec::deserialize(bytes)?)
///     }
///
///     fn name(&self) -> &'static str {
///         "mycodec"
///     }
/// }
/// ```
pub trait CacheCodec: Send + Sync + Debug {
    /// Serialize a value to bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented by this codec.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Deserialize bytes to a value
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid encoding of `T`.
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;

    /// Get the name of the codec, used for logging
    fn name(&self) -> &'static str;
}

/// Core storage backend trait
///
/// A backend is a thin adapter translating the five operations below onto a
/// specific storage medium. It knows nothing about expiration: the cache
/// engine wraps every value in an envelope before handing it over.
///
/// # Required Operations
///
/// - `get_item`: Read one value (`Ok(None)` when the key is absent)
/// - `set_item`: Store one value, silently overwriting
/// - `remove_item`: Delete one value (no-op when absent)
/// - `get_all`: Snapshot every stored entry
/// - `clear`: Delete every entry in the backend's namespace
///
/// # Failure
///
/// Any operation may fail with a medium-specific error (unsupported medium,
/// full disk, lost connection, serialization failure). Each single-key
/// operation must be atomic on its own; nothing else is required.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to support concurrent access across async tasks.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Get value by key
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - Value found
    /// * `Ok(None)` - Key not stored
    /// * `Err(e)` - The medium failed
    async fn get_item(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Store value under key, replacing any previous value
    async fn set_item(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Remove value by key
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Value removed (or didn't exist)
    /// * `Err(e)` - The medium failed
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Snapshot of all entries at call time
    async fn get_all(&self) -> Result<HashMap<String, serde_json::Value>>;

    /// Delete all entries
    async fn clear(&self) -> Result<()>;

    /// Get the name of this backend
    ///
    /// Used for logging and health reports (e.g., "Memory", "File", "Redis").
    fn name(&self) -> &'static str {
        "unknown"
    }
}
