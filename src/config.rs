//! Cache configuration
//!
//! Defaults can be overridden through environment variables:
//!
//! - `DATA_CACHE_DEFAULT_TTL` - default TTL in seconds (`-1` = never expires)
//! - `DATA_CACHE_NAMESPACE` - namespace used by persistent backends

use crate::entry::Ttl;
use tracing::warn;

/// Default TTL applied by [`CacheStrategy::Default`](crate::CacheStrategy::Default)
pub const DEFAULT_TTL_SECS: i64 = 60;

/// Default namespace for persistent backends (file name, Redis hash key)
pub const DEFAULT_NAMESPACE: &str = "data_cache";

/// Configuration shared by the cache engine and the backends built from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL used when a write does not specify one explicitly
    pub default_ttl: Ttl,
    /// Namespace isolating this cache's entries inside a shared medium
    pub namespace: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Ttl::from_secs(DEFAULT_TTL_SECS),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl CacheConfig {
    /// Read configuration from the environment, falling back to defaults
    ///
    /// An unparsable `DATA_CACHE_DEFAULT_TTL` is logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("DATA_CACHE_DEFAULT_TTL") {
            match raw.trim().parse::<i64>() {
                Ok(secs) => config.default_ttl = Ttl::from_secs(secs),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid DATA_CACHE_DEFAULT_TTL"),
            }
        }

        if let Ok(namespace) = std::env::var("DATA_CACHE_NAMESPACE") {
            if !namespace.trim().is_empty() {
                config.namespace = namespace;
            }
        }

        config
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Ttl) -> Self {
        self.default_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.default_ttl, Ttl::After(Duration::from_secs(60)));
        assert_eq!(config.namespace, "data_cache");
    }

    #[test]
    fn test_overrides() {
        let config = CacheConfig::default()
            .with_default_ttl(Ttl::Never)
            .with_namespace("sessions");
        assert_eq!(config.default_ttl, Ttl::Never);
        assert_eq!(config.namespace, "sessions");
    }
}
