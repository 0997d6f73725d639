//! Voicemask CLI
//!
//! Command-line front end for the anonymization pipeline.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voicemask::cli::commands;
use voicemask::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Voicemask v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Process {
            input,
            format,
            output,
            base64,
        } => commands::process(config, &input, format.as_deref(), output.as_deref(), base64)
            .with_context(|| format!("processing {}", input.display())),
        Commands::Detect { input } => {
            commands::detect(&input).with_context(|| format!("reading {}", input.display()))
        }
        Commands::Scrub { input, output } => commands::scrub_file(config, &input, output.as_deref())
            .with_context(|| format!("scrubbing {}", input.display())),
        Commands::Chunk {
            input,
            duration_ms,
            format,
            out_dir,
        } => commands::chunk(config, &input, duration_ms, format.as_deref(), &out_dir)
            .with_context(|| format!("chunking {}", input.display())),
        Commands::Inspect { input } => {
            commands::inspect(&input).with_context(|| format!("reading {}", input.display()))
        }
    }
}
