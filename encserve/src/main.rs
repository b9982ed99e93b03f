use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use encserve_core::cli;
use encserve_core::conf::{DEFAULT_CONFIG_PATH, load_config};
use encserve_core::logging::init_logging;
use encserve_core::server;

#[derive(Parser, Debug)]
#[command(
    name = "encserve",
    version,
    about = "Static file server for precompressed (.br/.gz) assets"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the server (default)
    Run {
        /// Path to the config file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Validate configuration and exit
    Check {
        /// Path to the config file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Print errors without colors
        #[arg(short, long)]
        plain: bool,
    },

    /// Print the resolved configuration
    Dump {
        /// Path to the config file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Write .br and .gz variants next to compressible files
    Precompress {
        /// Directory to process
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check { config, plain }) => cli::check(&config, plain),

        Some(Command::Dump { config }) => cli::dump(&config),

        Some(Command::Precompress { dir }) => {
            init_logging();
            cli::precompress(&dir)
        }

        Some(Command::Run { config }) => run(config),

        None => run(PathBuf::from(DEFAULT_CONFIG_PATH)),
    }
}

fn run(config: PathBuf) -> Result<()> {
    init_logging();

    let cfg = load_config(&config)
        .with_context(|| format!("failed to load config {}", config.display()))?;
    tracing::debug!(?cfg, "starting encserve");

    server::run(cfg)
}
