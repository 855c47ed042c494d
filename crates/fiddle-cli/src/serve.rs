//! Serve command implementation for the fiddle CLI.
//!
//! Starts the HTTP server over the configured store and catalog.

use std::path::PathBuf;
use std::time::Duration;

use fiddle_core::ResolverConfig;
use fiddle_server::ServerConfig;

use crate::DataArgs;
use crate::colors;

/// Flags of the `serve` command.
pub struct ServeOptions {
    pub data: DataArgs,
    pub host: String,
    pub port: u16,
    pub template: Option<PathBuf>,
    pub default_version: String,
    pub lookup_timeout_ms: u64,
    pub catalog_refresh_secs: Option<u64>,
}

/// Start the fiddle server.
pub async fn execute(options: ServeOptions) -> anyhow::Result<()> {
    let mut resolver = ResolverConfig {
        default_version: options.default_version,
        lookup_timeout: Duration::from_millis(options.lookup_timeout_ms),
        ..ResolverConfig::default()
    };
    if let Some(path) = &options.template {
        resolver.default_template = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read template {}: {}", path.display(), e))?;
    }

    let (catalog_path, store_path) = options.data.resolve();
    let config = ServerConfig {
        host: options.host,
        port: options.port,
        catalog_path,
        store_path,
        catalog_refresh: options.catalog_refresh_secs.map(Duration::from_secs),
        resolver,
    };

    println!(
        "\n{}Fiddle Server{} - Shareable Fiddles",
        colors::BOLD,
        colors::RESET
    );
    println!("{}", "─".repeat(50));
    print_source("Catalog", config.catalog_path.as_ref());
    print_source("Store", config.store_path.as_ref());
    println!(
        "{}  ◆ Server:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    fiddle_server::serve(config).await?;

    Ok(())
}

fn print_source(label: &str, path: Option<&PathBuf>) {
    let shown = path.map_or_else(|| "(empty)".to_string(), |p| p.display().to_string());
    println!(
        "{}  ◆ {}:{} {}",
        colors::CYAN,
        label,
        colors::RESET,
        shown
    );
}
