//! Cocorabot CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP chat server
//! - `doctor` — Diagnose configuration and knowledge-base health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cocorabot",
    about = "Cocorabot — Condorito, the ExploCocora tourism chat assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the knowledge-base path
        #[arg(short, long)]
        knowledge: Option<std::path::PathBuf>,
    },

    /// Diagnose configuration and knowledge-base health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A local .env is convenient in development; absence is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port, knowledge } => commands::serve::run(port, knowledge).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
