//! Fiddle HTTP server.
//!
//! Serves resolved fiddles to the editor and exports them as standalone
//! source.
//!
//! # Architecture
//!
//! The server consists of:
//! - **Routes**: HTTP handlers over a shared [`FiddleResolver`]
//! - **Refresh**: optional periodic reload of the library catalog file
//!
//! Storage is a [`MemoryStore`] seeded from a JSON file; the catalog is a
//! JSON array of libraries.

pub mod error;
pub mod refresh;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use fiddle_core::{CatalogHandle, FiddleResolver, LibraryCatalog, MemoryStore, ResolverConfig};

pub use error::{ServerError, ServerResult};
pub use refresh::spawn_catalog_refresh;
pub use routes::{AppState, create_router};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Library catalog file. No file means an empty catalog.
    pub catalog_path: Option<PathBuf>,
    /// Fiddle store fixture file. No file means an empty store.
    pub store_path: Option<PathBuf>,
    /// Interval for re-reading the catalog file.
    pub catalog_refresh: Option<Duration>,
    /// Resolution settings.
    pub resolver: ResolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8880,
            catalog_path: None,
            store_path: None,
            catalog_refresh: None,
            resolver: ResolverConfig::default(),
        }
    }
}

/// Load the store and catalog named in the config and build the app state.
pub fn build_state(config: &ServerConfig) -> ServerResult<Arc<AppState>> {
    let catalog = match &config.catalog_path {
        Some(path) => LibraryCatalog::load(path)?,
        None => LibraryCatalog::default(),
    };
    let store = match &config.store_path {
        Some(path) => MemoryStore::load(path)?,
        None => MemoryStore::new(),
    };
    tracing::info!(
        "Loaded {} libraries and {} fiddle versions",
        catalog.len(),
        store.fiddle_count()
    );

    let resolver = FiddleResolver::new(
        Arc::new(store),
        Arc::new(CatalogHandle::new(catalog)),
        config.resolver.clone(),
    );
    Ok(Arc::new(AppState {
        resolver: Arc::new(resolver),
    }))
}

/// Start the fiddle server.
pub async fn serve(config: ServerConfig) -> ServerResult<()> {
    if config.catalog_refresh.is_some_and(|every| every.is_zero()) {
        return Err(ServerError::Config(
            "catalog refresh interval must be greater than zero".to_string(),
        ));
    }
    let state = build_state(&config)?;

    // Spawn catalog reload task if both a file and an interval are configured
    let refresh_task = match (&config.catalog_path, config.catalog_refresh) {
        (Some(path), Some(every)) => Some(spawn_catalog_refresh(
            state.resolver.catalog().clone(),
            path.clone(),
            every,
        )?),
        _ => None,
    };

    let app = create_router(state);

    // Build address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ServerError::Io {
            path: PathBuf::new(),
            message: format!("Invalid address: {}:{}", config.host, config.port),
        })?;

    tracing::info!("Starting fiddle server at http://{}", addr);

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    // Handle Ctrl+C for graceful shutdown
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    if let Some(task) = refresh_task {
        task.abort();
        let _ = task.await;
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
