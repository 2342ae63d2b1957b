//! Cache entries: TTL and the stored envelope
//!
//! Every value is written as `{"value": ..., "expiresAt": ...}` where
//! `expiresAt` is milliseconds since the Unix epoch, or `-1` for entries that
//! never expire.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stored `expiresAt` for entries that never expire
pub const NEVER_EXPIRES: i64 = -1;

/// Time-to-live supplied with every write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Entry is retrievable until overwritten or removed
    Never,
    /// Entry expires this long after the write
    After(Duration),
    /// Entry is already expired this long at write time
    Ago(Duration),
}

impl Ttl {
    /// Seconds-based TTL where `-1` means never expires
    ///
    /// Other negative values put the expiry before the write, so the entry
    /// reads as absent straight away.
    pub fn from_secs(secs: i64) -> Self {
        let offset = Duration::from_secs(secs.unsigned_abs());
        match secs {
            NEVER_EXPIRES => Self::Never,
            s if s < 0 => Self::Ago(offset),
            _ => Self::After(offset),
        }
    }

    /// Expire after `secs` seconds
    pub fn secs(secs: u64) -> Self {
        Self::After(Duration::from_secs(secs))
    }

    /// Absolute expiry for a write happening at `now_ms`
    pub fn expires_at(self, now_ms: i64) -> i64 {
        match self {
            Self::Never => NEVER_EXPIRES,
            Self::After(ttl) => now_ms.saturating_add(millis(ttl)),
            Self::Ago(ttl) => now_ms.saturating_sub(millis(ttl)),
        }
    }
}

fn millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Self::After(ttl)
    }
}

/// Physical representation of a cache entry inside a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub value: serde_json::Value,
    pub expires_at: i64,
}

impl Envelope {
    pub fn new(value: serde_json::Value, ttl: Ttl, now_ms: i64) -> Self {
        Self {
            value,
            expires_at: ttl.expires_at(now_ms),
        }
    }

    /// Strictly past the expiry instant; an entry is still valid at exactly `expires_at`
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at != NEVER_EXPIRES && self.expires_at < now_ms
    }
}
