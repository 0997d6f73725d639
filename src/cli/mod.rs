//! CLI Module
//!
//! Command-line interface for the Voicemask anonymization pipeline.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voicemask - strip vendor fingerprints from synthesized speech
#[derive(Parser, Debug)]
#[command(name = "voicemask")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON processor configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize an audio file into a canonical MP3
    #[command(name = "process")]
    Process {
        /// Input audio file
        input: PathBuf,

        /// Declared container format (detected when omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// Output path (defaults to <input>.anon.mp3)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the JSON transport envelope instead of raw MP3
        #[arg(long)]
        base64: bool,
    },

    /// Print the container format detected from the magic bytes
    #[command(name = "detect")]
    Detect {
        /// Input audio file
        input: PathBuf,
    },

    /// Run only the binary scrubber over an MP3 file
    #[command(name = "scrub")]
    Scrub {
        /// Input MP3 file
        input: PathBuf,

        /// Output path (defaults to <input>.scrubbed.mp3)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split audio into fixed-duration WAV segments
    #[command(name = "chunk")]
    Chunk {
        /// Input audio file
        input: PathBuf,

        /// Segment duration in milliseconds (defaults to the configured value)
        #[arg(short, long)]
        duration_ms: Option<u64>,

        /// Declared container format (detected when omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// Directory receiving chunk_NNN.wav files
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Report encoder fingerprints left in an MP3 file
    #[command(name = "inspect")]
    Inspect {
        /// Input MP3 file
        input: PathBuf,
    },
}
