//! Fiddle CLI - serve, encode and export shareable fiddles.

mod colors;
mod export;
mod parse;
mod serve;
mod token;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fiddle")]
#[command(about = "Serve, encode and export shareable fiddles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where fiddles and libraries are loaded from.
#[derive(clap::Args, Debug, Clone)]
pub struct DataArgs {
    /// Library catalog file (JSON array of libraries)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Fiddle store file (JSON with `fiddles` and `users`)
    #[arg(long)]
    store: Option<PathBuf>,
}

impl DataArgs {
    /// Explicit paths, falling back to files in the data directory.
    pub fn resolve(&self) -> (Option<PathBuf>, Option<PathBuf>) {
        (
            self.catalog.clone().or_else(|| data_file("libraries.json")),
            self.store.clone().or_else(|| data_file("store.json")),
        )
    }
}

/// A file under `<data dir>/fiddle`, if it exists.
fn data_file(name: &str) -> Option<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("fiddle").join(name))
        .filter(|path| path.is_file())
}

#[derive(Subcommand)]
enum Commands {
    /// Start the fiddle HTTP server
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8880")]
        port: u16,

        /// Source file used as the default template
        #[arg(long)]
        template: Option<PathBuf>,

        /// Language version for unsaved fiddles
        #[arg(long, default_value = "2.12")]
        default_version: String,

        /// Timeout for each store lookup, in milliseconds
        #[arg(long, default_value = "5000")]
        lookup_timeout_ms: u64,

        /// Reload the catalog file every N seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        catalog_refresh_secs: Option<u64>,
    },

    /// Encode source into a URL token (reads stdin when no file is given)
    Encode {
        /// Source file
        file: Option<PathBuf>,
    },

    /// Decode a URL token back into source
    Decode {
        /// Token to decode
        token: String,
    },

    /// Split annotated source into code and resolved libraries
    Parse {
        /// Annotated source file
        file: PathBuf,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Print a saved fiddle as standalone annotated source
    Export {
        /// Fiddle identifier
        id: String,

        /// Fiddle version
        #[arg(default_value = "0")]
        version: u32,

        #[command(flatten)]
        data: DataArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => tracing::Level::DEBUG,
        (Commands::Serve { .. }, false) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve {
            data,
            host,
            port,
            template,
            default_version,
            lookup_timeout_ms,
            catalog_refresh_secs,
        } => {
            let options = serve::ServeOptions {
                data,
                host,
                port,
                template,
                default_version,
                lookup_timeout_ms,
                catalog_refresh_secs,
            };
            serve::execute(options).await?;
        }

        Commands::Encode { file } => token::encode(file.as_deref())?,

        Commands::Decode { token } => token::decode(&token)?,

        Commands::Parse { file, data } => parse::execute(&file, &data)?,

        Commands::Export { id, version, data } => export::execute(&id, version, &data).await?,
    }

    Ok(())
}
