//! Backend Availability Prober
//!
//! Decides which configured backend is usable by writing and then deleting a
//! sentinel key on every candidate at once.

use anyhow::Result;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::traits::StoreBackend;

/// Key written during a probe round trip
pub const PROBE_KEY: &str = "_test";

/// Value written during a probe round trip
pub const PROBE_VALUE: &str = "test";

/// Probe outcome for one backend
#[derive(Debug, Clone)]
pub struct BackendHealth {
    /// Position in the configured backend list
    pub index: usize,
    pub name: &'static str,
    pub available: bool,
    /// Failure reason when the probe did not pass
    pub error: Option<String>,
}

/// Write-then-delete round trip on a single backend
///
/// # Errors
///
/// Returns the first failing operation's error.
pub async fn probe_backend(backend: &dyn StoreBackend) -> Result<()> {
    backend
        .set_item(PROBE_KEY, serde_json::Value::from(PROBE_VALUE))
        .await?;
    backend.remove_item(PROBE_KEY).await?;
    Ok(())
}

/// Probe every backend concurrently and report each outcome in configured order
///
/// All probes run to completion; a failing backend never cuts the others short.
pub async fn probe_all(backends: &[Arc<dyn StoreBackend>]) -> Vec<BackendHealth> {
    let checks = backends.iter().enumerate().map(|(index, backend)| async move {
        match probe_backend(backend.as_ref()).await {
            Ok(()) => {
                debug!(backend = backend.name(), index, "Probe passed");
                BackendHealth {
                    index,
                    name: backend.name(),
                    available: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(backend = backend.name(), index, error = %e, "Probe failed, backend excluded");
                BackendHealth {
                    index,
                    name: backend.name(),
                    available: false,
                    error: Some(format!("{e:#}")),
                }
            }
        }
    });

    // join_all preserves input order regardless of completion order
    join_all(checks).await
}

/// Index of the first backend, in configured order, that passes its probe
pub async fn select_backend(backends: &[Arc<dyn StoreBackend>]) -> Option<usize> {
    let selected = probe_all(backends)
        .await
        .into_iter()
        .find(|health| health.available);

    match &selected {
        Some(health) => info!(backend = health.name, index = health.index, "Selected storage backend"),
        None => warn!(candidates = backends.len(), "No storage backend passed probing"),
    }

    selected.map(|health| health.index)
}
