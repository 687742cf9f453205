//! Pixarify - turn a portrait into a Pixar-style character.
//!
//! The portrait is described by a hosted vision model, and the description
//! plus the portrait are handed to a hosted image model. The result is shown
//! in a single-page browser form, or printed by the `transform` command.
//!
//! # Usage
//!
//! ```bash
//! # Serve the upload form
//! pixarify serve --bind 127.0.0.1:8501
//!
//! # Transform one local file
//! pixarify transform me.jpg
//!
//! # View configuration
//! pixarify config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod web;

/// Pixarify - transform yourself into a Pixar character.
#[derive(Parser, Debug)]
#[command(name = "pixarify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the browser upload form
    Serve(cli::serve::ServeArgs),

    /// Pixarify a single local image
    Transform(cli::transform::TransformArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match pixarify_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pixarify config path`."
            );
            pixarify_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pixarify v{}", pixarify_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Transform(args) => cli::transform::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
