//! Fixed-duration segmentation
//!
//! Splits decoded audio into segments of equal duration (the last may be
//! shorter) and writes each as a standalone 16-bit PCM WAV. Source channel
//! layout and rate are kept.

use tracing::debug;

use crate::engine::buffer::DecodedAudio;
use crate::engine::io::write_wav;
use crate::error::{Result, VoicemaskError};

/// Frames per segment for a duration at a sample rate
pub fn frames_per_chunk(sample_rate: u32, chunk_duration_ms: u64) -> Result<usize> {
    let frames = sample_rate as u64 * chunk_duration_ms / 1000;
    if frames == 0 {
        return Err(VoicemaskError::InvalidConfig {
            field: "chunk_duration_ms".to_string(),
            reason: format!(
                "{} ms holds no whole sample at {} Hz",
                chunk_duration_ms, sample_rate
            ),
        });
    }
    Ok(frames as usize)
}

/// Split into WAV-encoded segments
pub fn split_into_wav_chunks(audio: &DecodedAudio, chunk_duration_ms: u64) -> Result<Vec<Vec<u8>>> {
    let step = frames_per_chunk(audio.sample_rate(), chunk_duration_ms)?;
    let total = audio.num_frames();

    let mut chunks = Vec::with_capacity(total.div_ceil(step));
    let mut start = 0;
    while start < total {
        let end = (start + step).min(total);
        chunks.push(write_wav(&audio.slice_frames(start, end)?)?);
        start = end;
    }

    debug!(
        frames = total,
        frames_per_chunk = step,
        chunks = chunks.len(),
        "split audio"
    );
    Ok(chunks)
}
