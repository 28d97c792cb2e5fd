//! Elia Control - terminal client for the Elia assistant.
//!
//! Interactive chat by default, plus one-shot checks and a listing of the
//! builtin knowledge base.

mod chat;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use elia_core::EliaConfig;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "eliactl")]
#[command(about = "Elia - Assistante contraception et interactions", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Configuration file (default: the elia/config.toml under the user
    /// config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session (the default)
    Chat,

    /// One-shot interaction check for a single product
    Check {
        /// Product or supplement to evaluate
        product: String,

        /// Pill brand for the profile
        #[arg(long)]
        pill: Option<String>,

        /// Intake time for the profile, e.g. "8h" or "21h30"
        #[arg(long)]
        time: Option<String>,

        /// Continuous-delivery method (implant, patch, ring, IUD)
        #[arg(long)]
        continuous: bool,

        /// Other regular medications
        #[arg(long)]
        medications: Option<String>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the products covered by the local knowledge base
    Products,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = EliaConfig::load(&config_path)?;
    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run(&config).await,
        Commands::Check {
            product,
            pill,
            time,
            continuous,
            medications,
            json,
        } => chat::check(&config, &product, pill, time, continuous, medications, json).await,
        Commands::Products => chat::products(&config),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("elia")
        .join("config.toml")
}

/// Logs go to stderr so they never interleave with the conversation.
fn init_tracing(config: &EliaConfig) {
    let filter = EnvFilter::try_from_env("ELIA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
