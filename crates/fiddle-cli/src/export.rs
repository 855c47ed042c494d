//! Export command implementation for the fiddle CLI.
//!
//! Prints a saved fiddle as standalone annotated source.

use fiddle_server::ServerConfig;

use crate::DataArgs;

/// Resolve a saved fiddle and print its annotated source.
pub async fn execute(id: &str, version: u32, data: &DataArgs) -> anyhow::Result<()> {
    let (catalog_path, store_path) = data.resolve();
    let config = ServerConfig {
        catalog_path,
        store_path,
        ..ServerConfig::default()
    };
    let state = fiddle_server::build_state(&config)?;

    let fiddle = state.resolver.resolve(id, version, None).await?;
    println!("{}", fiddle_core::serialize(&fiddle));

    Ok(())
}
