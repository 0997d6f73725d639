//! Canonical MP3 encoding
//!
//! Wraps LAME with a fixed profile: mono, 44.1kHz, constant bitrate. No ID3
//! tag is ever handed to the encoder, so LAME writes neither ID3v1 nor ID3v2,
//! and the Xing/Info/LAME tag frame is switched off. LAME has no APE writer.
//! With identical input and settings the output is bit-identical.

use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, FlushGap, Mode, MonoPcm, Quality};
use tracing::debug;

use crate::engine::buffer::{PcmFrame, CANONICAL_SAMPLE_RATE};
use crate::error::{Result, VoicemaskError};

/// Bytes LAME may emit on flush
const FLUSH_RESERVE: usize = 7200;

/// Samples handed to LAME per encode call
const ENCODE_BLOCK: usize = 1152 * 64;

/// Encoder settings for the canonical output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mp3Settings {
    /// Constant bitrate in kbit/s
    pub bitrate_kbps: u32,
}

impl Default for Mp3Settings {
    fn default() -> Self {
        Mp3Settings { bitrate_kbps: 128 }
    }
}

/// Encode canonical PCM to a tag-free CBR MP3 stream
///
/// # Errors
/// * `EncodeFailure` - If LAME rejects the settings or the samples, or emits no frames
pub fn encode_mp3(pcm: &PcmFrame, settings: Mp3Settings) -> Result<Vec<u8>> {
    if pcm.is_empty() {
        return Err(encode_error("no samples to encode"));
    }
    let bitrate = bitrate_from_kbps(settings.bitrate_kbps)?;

    let mut builder = Builder::new().ok_or_else(|| encode_error("LAME failed to allocate"))?;
    builder
        .set_num_channels(1)
        .map_err(|e| encode_error(format!("set_num_channels: {:?}", e)))?;
    builder
        .set_sample_rate(CANONICAL_SAMPLE_RATE)
        .map_err(|e| encode_error(format!("set_sample_rate: {:?}", e)))?;
    builder
        .set_mode(Mode::Mono)
        .map_err(|e| encode_error(format!("set_mode: {:?}", e)))?;
    builder
        .set_brate(bitrate)
        .map_err(|e| encode_error(format!("set_brate: {:?}", e)))?;
    builder
        .set_quality(Quality::Good)
        .map_err(|e| encode_error(format!("set_quality: {:?}", e)))?;
    builder
        .set_to_write_vbr_tag(false)
        .map_err(|e| encode_error(format!("set_to_write_vbr_tag: {:?}", e)))?;

    let mut encoder = builder
        .build()
        .map_err(|e| encode_error(format!("build: {:?}", e)))?;

    let samples = pcm.samples();
    let mut output = Vec::with_capacity(max_required_buffer_size(samples.len()) + FLUSH_RESERVE);

    for block in samples.chunks(ENCODE_BLOCK) {
        output.reserve(max_required_buffer_size(block.len()));
        encoder
            .encode_to_vec(MonoPcm(block), &mut output)
            .map_err(|e| encode_error(format!("encode: {:?}", e)))?;
    }

    // Padded flush: the final partial frame is always emitted
    output.reserve(FLUSH_RESERVE);
    encoder
        .flush_to_vec::<FlushGap>(&mut output)
        .map_err(|e| encode_error(format!("flush: {:?}", e)))?;

    if output.is_empty() {
        return Err(encode_error(format!(
            "LAME produced no frames for {} samples",
            samples.len()
        )));
    }

    debug!(
        samples = samples.len(),
        bytes = output.len(),
        bitrate_kbps = settings.bitrate_kbps,
        "encoded mp3"
    );
    Ok(output)
}

fn bitrate_from_kbps(kbps: u32) -> Result<Bitrate> {
    let bitrate = match kbps {
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => return Err(encode_error(format!("{} kbit/s is not a CBR bitrate", other))),
    };
    Ok(bitrate)
}

fn encode_error(reason: impl Into<String>) -> VoicemaskError {
    VoicemaskError::EncodeFailure {
        reason: reason.into(),
    }
}
