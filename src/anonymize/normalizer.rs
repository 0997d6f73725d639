//! Container normalizer
//!
//! Turns any supported container into the canonical MP3:
//!
//! ```text
//! AudioBuffer ─decode─→ DecodedAudio ─downmix─→ mono ─resample─→ 44.1kHz
//!   ─peak normalize─→ ─high-pass─→ PcmFrame ─LAME─→ AudioBuffer(mp3)
//! ```
//!
//! The decoded container is dropped as soon as its samples are copied out.
//! The PCM frame is rebuilt from bare samples, so titles, encoder strings
//! and timestamps of the source have nowhere to survive.

use tracing::{debug, warn};

use crate::config::ProcessorConfig;
use crate::dsp::{downmix_to_mono, high_pass, peak_normalize, quantize_i16, resample, LevelAnalysis};
use crate::engine::buffer::{AudioBuffer, DecodedAudio, PcmFrame, CANONICAL_SAMPLE_RATE};
use crate::engine::decode::DecoderRegistry;
use crate::engine::format::AudioFormat;
use crate::engine::mp3::{encode_mp3, Mp3Settings};
use crate::error::Result;

/// Decode → canonical PCM → MP3, borrowing the registry and settings
#[derive(Debug, Clone, Copy)]
pub struct ContainerNormalizer<'a> {
    registry: &'a DecoderRegistry,
    config: &'a ProcessorConfig,
}

impl<'a> ContainerNormalizer<'a> {
    pub fn new(registry: &'a DecoderRegistry, config: &'a ProcessorConfig) -> Self {
        Self { registry, config }
    }

    /// Decode and canonicalize to mono 16-bit 44.1kHz PCM
    ///
    /// # Errors
    /// * `DecodeFailure` - Corrupt data or a declared format the bytes contradict
    /// * `UnsupportedFormat` - No decoder for the declared format
    /// * `EmptyAudio` - Nothing decodable in the container
    pub fn to_pcm(&self, input: AudioBuffer) -> Result<PcmFrame> {
        let decoded = self.decode(input)?;
        let source_channels = decoded.channels();
        let source_rate = decoded.sample_rate();

        let mut mono = downmix_to_mono(decoded.samples(), source_channels);
        drop(decoded);
        mono = resample(&mono, source_rate, CANONICAL_SAMPLE_RATE);

        let source_levels = LevelAnalysis::analyze(&mono);
        let gain = peak_normalize(&mut mono, self.config.headroom_db);
        high_pass(&mut mono, CANONICAL_SAMPLE_RATE, self.config.highpass_hz);

        let frame = PcmFrame::from_samples(quantize_i16(&mono));
        debug!(
            source_channels,
            source_rate,
            source_peak_db = source_levels.peak_db(),
            source_dc = source_levels.dc_offset,
            samples = frame.num_samples(),
            gain,
            "canonicalized pcm"
        );
        Ok(frame)
    }

    /// Full normalization; the result is always an MP3 buffer
    ///
    /// # Errors
    /// Any decode error from [`Self::to_pcm`], or `EncodeFailure` from LAME
    pub fn normalize(&self, input: AudioBuffer) -> Result<AudioBuffer> {
        let pcm = self.to_pcm(input)?;
        let settings = Mp3Settings {
            bitrate_kbps: self.config.bitrate_kbps,
        };
        let mp3 = encode_mp3(&pcm, settings)?;
        Ok(AudioBuffer::new(mp3, AudioFormat::Mp3))
    }

    /// Decode with the declared format, optionally retrying via auto-detection
    pub fn decode(&self, input: AudioBuffer) -> Result<DecodedAudio> {
        match self.registry.decode(&input) {
            Ok(decoded) => Ok(decoded),
            Err(e) if self.config.retry_autodetect && input.format() != AudioFormat::Unknown => {
                warn!(
                    declared = %input.format(),
                    error = %e,
                    "declared format failed to decode, retrying with auto-detection"
                );
                let retry = AudioBuffer::new(input.into_data(), AudioFormat::Unknown);
                self.registry.decode(&retry)
            }
            Err(e) => Err(e),
        }
    }
}
