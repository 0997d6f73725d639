//! In-memory WAV I/O
//!
//! Reads and writes WAV containers with the hound crate. Everything works on
//! byte slices; the pipeline never touches the filesystem.
//!
//! Only the `fmt ` and `data` chunks are read. `LIST`/`INFO` and any other
//! chunk is skipped by hound and never reaches the decoded samples.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::DecodedAudio;
use crate::error::{Result, VoicemaskError};

/// Decode a WAV container into interleaved float samples
///
/// Supports 8/16/24/32-bit integer and 32-bit float data.
///
/// # Errors
/// * `DecodeFailure` - If the bytes are not a readable WAV file
/// * `UnsupportedFormat` - For bit depths hound cannot deliver
/// * `EmptyAudio` - If the data chunk holds no samples
pub fn read_wav(bytes: &[u8]) -> Result<DecodedAudio> {
    let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| wav_error("open", e))?;

    let spec = reader.spec();
    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    DecodedAudio::new(samples, spec.channels, spec.sample_rate)
}

/// Encode interleaved float samples as a 16-bit PCM WAV container
pub fn write_wav(audio: &DecodedAudio) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: audio.channels(),
        sample_rate: audio.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer =
            WavWriter::new(Cursor::new(&mut bytes), spec).map_err(|e| wav_error("create", e))?;

        for &sample in audio.samples() {
            let scaled = (sample * 32767.0).round().clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(scaled)
                .map_err(|e| wav_error("write", e))?;
        }

        writer.finalize().map_err(|e| wav_error("finalize", e))?;
    }

    Ok(bytes)
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| wav_error("read float samples from", e)),
        SampleFormat::Int => {
            if !(8..=32).contains(&bits_per_sample) {
                return Err(VoicemaskError::UnsupportedFormat {
                    format: format!("{}-bit integer WAV", bits_per_sample),
                });
            }
            let max_val = (1u64 << (bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| wav_error("read integer samples from", e))
        }
    }
}

fn wav_error(action: &str, e: hound::Error) -> VoicemaskError {
    VoicemaskError::DecodeFailure {
        format: "wav".to_string(),
        reason: format!("failed to {} WAV data: {}", action, e),
        source: Some(Box::new(e)),
    }
}

// ============================================================================
// Tests
// ============================================================================
