//! Error types for cache operations

use thiserror::Error;

/// Errors surfaced by [`CacheManager`](crate::CacheManager) operations.
///
/// Probe-time failures never show up here: they only exclude a backend from
/// selection. Everything that goes wrong after a backend has been selected is
/// returned to the caller as-is.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No configured backend passed the availability probe.
    ///
    /// Only writes report this; reads and removals treat a missing backend
    /// as a miss or a no-op.
    #[error("No available storage backend")]
    NoBackendAvailable,

    /// The selected backend failed during a normal operation.
    #[error("Backend '{backend}' failed: {source}")]
    Backend {
        backend: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The producer passed to `get_or_set` failed; nothing was written.
    #[error("Fetcher failed: {0}")]
    Fetcher(#[source] anyhow::Error),

    /// A stored item is not a valid envelope or does not decode into the requested type.
    #[error("Failed to decode cached value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be converted into its stored representation.
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CacheError {
    pub(crate) fn backend(backend: &'static str, source: anyhow::Error) -> Self {
        Self::Backend { backend, source }
    }
}

/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
