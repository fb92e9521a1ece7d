//! Tessera CLI - classify batches of images in parallel.
//!
//! Tessera discovers images, pushes them through a pixel classifier on a
//! bounded pool of worker threads and writes one result image per input.
//! Images that fail to classify are reported and skipped; the rest of the
//! batch is unaffected.
//!
//! # Usage
//!
//! ```bash
//! # Label every slice in a directory with 8 threads
//! tessera classify ./slices --output ./masks --parallel 8
//!
//! # Foreground probability maps, JSON summary
//! tessera classify ./slices --probability --summary json
//!
//! # View configuration
//! tessera config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Tessera - classify batches of images in parallel.
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "TESSERA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify images and write one result image per input
    Classify(cli::classify::ClassifyArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(tessera_core::Config::default_path);
    let config = if config_path.exists() {
        match tessera_core::Config::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `tessera config path`."
                );
                tessera_core::Config::default()
            }
        }
    } else {
        tessera_core::Config::default()
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tessera v{}", tessera_core::VERSION);

    match cli.command {
        Commands::Classify(args) => cli::classify::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, &config, config_path).await,
    }
}
