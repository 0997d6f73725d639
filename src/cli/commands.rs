//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::anonymize::{audit, scrub_with, AudioProcessor, ScrubOptions};
use crate::config::ProcessorConfig;
use crate::engine::format::detect_format;
use crate::error::Result;

/// Load the processor configuration, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ProcessorConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration: {}", path.display());
            ProcessorConfig::from_json_file(path)
        }
        None => Ok(ProcessorConfig::default()),
    }
}

/// Anonymize one file.
pub fn process(
    config: ProcessorConfig,
    input: &Path,
    format: Option<&str>,
    output: Option<&Path>,
    base64: bool,
) -> Result<()> {
    info!("Processing: {}", input.display());

    let processor = AudioProcessor::new(config)?;
    let raw = std::fs::read(input)?;
    let envelope = processor.process(&raw, format);

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| with_suffix(input, if base64 { "anon.json" } else { "anon.mp3" }));

    if base64 {
        std::fs::write(&output, serde_json::to_string_pretty(&envelope)?)?;
    } else {
        std::fs::write(&output, envelope.audio_bytes()?)?;
    }

    if !envelope.was_anonymized {
        warn!("Pipeline fell back to pass-through for {}", input.display());
    }

    println!("Input:       {} ({} bytes)", input.display(), envelope.input_bytes);
    println!("  sha256:    {}", sha256_hex(&raw));
    println!("Output:      {} ({} bytes)", output.display(), envelope.output_bytes);
    println!("  sha256:    {}", sha256_hex(&envelope.audio_bytes()?));
    println!("Extension:   {}", envelope.extension);
    println!("Anonymized:  {}", envelope.was_anonymized);
    if let Some(report) = envelope.scrub_report {
        println!(
            "Scrubbed:    {} bytes ({} text runs, {} signatures, {} frames kept)",
            report.modifications(),
            report.text_runs,
            report.signatures,
            report.frames_preserved
        );
    }

    Ok(())
}

/// Print the detected container format.
pub fn detect(input: &Path) -> Result<()> {
    let raw = std::fs::read(input)?;
    println!("{}", detect_format(&raw));
    Ok(())
}

/// Run only the binary scrubber.
pub fn scrub_file(config: ProcessorConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    config.validate()?;
    info!("Scrubbing: {}", input.display());

    let raw = std::fs::read(input)?;
    let (scrubbed, report) = scrub_with(raw, ScrubOptions::from(&config));

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| with_suffix(input, "scrubbed.mp3"));
    std::fs::write(&output, &scrubbed)?;

    println!("Output:      {}", output.display());
    println!("Frames kept: {}", report.frames_preserved);
    println!(
        "Neutralized: {} bytes ({} in text runs, {} in signatures)",
        report.modifications(),
        report.text_run_bytes,
        report.signature_bytes
    );

    Ok(())
}

/// Split a file into WAV segments.
pub fn chunk(
    config: ProcessorConfig,
    input: &Path,
    duration_ms: Option<u64>,
    format: Option<&str>,
    out_dir: &Path,
) -> Result<()> {
    info!("Chunking: {}", input.display());

    let processor = AudioProcessor::new(config)?;
    let raw = std::fs::read(input)?;
    let chunks = processor.try_chunk_audio(&raw, duration_ms, format)?;

    std::fs::create_dir_all(out_dir)?;
    for (index, chunk) in chunks.iter().enumerate() {
        let path = out_dir.join(format!("chunk_{:03}.wav", index));
        std::fs::write(&path, chunk)?;
        println!("{} ({} bytes)", path.display(), chunk.len());
    }

    Ok(())
}

/// Print the fingerprint audit of a file.
pub fn inspect(input: &Path) -> Result<()> {
    let raw = std::fs::read(input)?;
    println!("{}", audit(&raw));
    Ok(())
}

fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}.{}", stem, suffix))
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
