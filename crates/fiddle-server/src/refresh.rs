//! Periodic library catalog reload.
//!
//! Re-reads the catalog file on a fixed interval and swaps the parsed
//! snapshot into the shared [`CatalogHandle`]. A file that fails to parse
//! leaves the current snapshot in place.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fiddle_core::CatalogHandle;
use tokio::task::JoinHandle;

use crate::error::{ServerError, ServerResult};

/// Spawn the reload task. Abort the returned handle to stop it.
///
/// Fails if `every` is zero.
pub fn spawn_catalog_refresh(
    handle: Arc<CatalogHandle>,
    path: PathBuf,
    every: Duration,
) -> ServerResult<JoinHandle<()>> {
    if every.is_zero() {
        return Err(ServerError::Config(
            "catalog refresh interval must be greater than zero".to_string(),
        ));
    }

    Ok(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; the catalog was just loaded.
        ticker.tick().await;
        loop {
            ticker.tick().await;

            // File IO and JSON parsing stay off the runtime workers.
            let reload = {
                let handle = handle.clone();
                let path = path.clone();
                tokio::task::spawn_blocking(move || handle.reload_from_file(&path))
            };
            match reload.await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    tracing::warn!(
                        "Catalog reload from {} failed, keeping previous catalog: {}",
                        path.display(),
                        e
                    );
                }
                Err(e) => {
                    tracing::warn!("Catalog reload task failed: {}", e);
                }
            }
        }
    }))
}
