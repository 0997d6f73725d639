//! Container decoding
//!
//! Decoding is dispatched through a [`DecoderRegistry`]: an explicit table
//! from format label to decode function, built once and passed by reference.
//!
//! ```text
//! AudioBuffer → signature check → registry[format] → DecodedAudio
//! ```
//!
//! WAV goes through hound, headerless PCM is parsed directly, and every
//! compressed container (MP3, OGG Vorbis, FLAC, AIFF, M4A/AAC) goes through
//! symphonia's probe → format reader → decoder chain. `Unknown` also uses the
//! symphonia probe, which scans for container markers on its own.

use std::collections::HashMap;
use std::io::{Cursor, ErrorKind};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::engine::buffer::{AudioBuffer, DecodedAudio, PcmFrame, CANONICAL_SAMPLE_RATE};
use crate::engine::format::{detect_format, AudioFormat};
use crate::engine::io::read_wav;
use crate::error::{Result, VoicemaskError};

/// Signature of a container decoder
pub type DecodeFn = fn(&[u8], AudioFormat) -> Result<DecodedAudio>;

/// Format → decoder dispatch table
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<AudioFormat, DecodeFn>,
}

impl DecoderRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register (or replace) the decoder for a format
    pub fn register(&mut self, format: AudioFormat, decoder: DecodeFn) {
        self.decoders.insert(format, decoder);
    }

    /// Whether a decoder exists for this format
    pub fn supports(&self, format: AudioFormat) -> bool {
        self.decoders.contains_key(&format)
    }

    /// Decode a buffer using its declared format
    ///
    /// A declared format that contradicts the magic bytes (the detector sees a
    /// different known container) is rejected before any decoder runs.
    ///
    /// # Errors
    /// * `DecodeFailure` - Declared format mismatch or corrupt data
    /// * `UnsupportedFormat` - No decoder registered for the format
    /// * `EmptyAudio` - The container decoded to zero samples
    pub fn decode(&self, buffer: &AudioBuffer) -> Result<DecodedAudio> {
        let declared = buffer.format();
        check_signature(buffer.data(), declared)?;

        let decoder = self
            .decoders
            .get(&declared)
            .ok_or_else(|| VoicemaskError::UnsupportedFormat {
                format: declared.to_string(),
            })?;

        let decoded = decoder(buffer.data(), declared)?;
        debug!(
            format = %declared,
            channels = decoded.channels(),
            sample_rate = decoded.sample_rate(),
            frames = decoded.num_frames(),
            "decoded container"
        );
        Ok(decoded)
    }
}

impl Default for DecoderRegistry {
    /// Registry with a decoder for every label in the closed format set
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(AudioFormat::Wav, decode_wav);
        registry.register(AudioFormat::RawPcm, decode_raw_pcm);
        for format in [
            AudioFormat::Mp3,
            AudioFormat::Ogg,
            AudioFormat::Flac,
            AudioFormat::Aiff,
            AudioFormat::M4a,
            AudioFormat::Unknown,
        ] {
            registry.register(format, decode_with_symphonia);
        }
        registry
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<String> = self.decoders.keys().map(|k| k.to_string()).collect();
        formats.sort();
        f.debug_struct("DecoderRegistry")
            .field("formats", &formats)
            .finish()
    }
}

/// Reject a declared format when the magic bytes name a different container
fn check_signature(data: &[u8], declared: AudioFormat) -> Result<()> {
    if matches!(declared, AudioFormat::Unknown | AudioFormat::RawPcm) {
        return Ok(());
    }
    let sniffed = detect_format(data);
    if sniffed.is_known() && sniffed != declared {
        return Err(VoicemaskError::decode(
            declared.to_string(),
            format!("bytes carry a {} signature", sniffed),
        ));
    }
    Ok(())
}

// ============================================================================
// Decoders
// ============================================================================

/// Decode a RIFF/WAVE container with hound
pub fn decode_wav(data: &[u8], _format: AudioFormat) -> Result<DecodedAudio> {
    read_wav(data)
}

/// Decode headerless 16-bit little-endian mono PCM at the canonical rate
pub fn decode_raw_pcm(data: &[u8], _format: AudioFormat) -> Result<DecodedAudio> {
    let frame = PcmFrame::from_le_bytes(data)?;
    DecodedAudio::new(frame.to_f32(), 1, CANONICAL_SAMPLE_RATE)
}

/// Decode any container symphonia can probe
///
/// Packets from tracks other than the first audio track are ignored. Corrupt
/// packets are skipped; the stream ends at EOF.
pub fn decode_with_symphonia(data: &[u8], format: AudioFormat) -> Result<DecodedAudio> {
    let label = format.to_string();
    let source = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = format.extension() {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| symphonia_error(&label, "probe", e))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| VoicemaskError::decode(label.clone(), "no audio track"))?;
    let track_id = track.id;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);
    let mut sample_rate = track.codec_params.sample_rate;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| symphonia_error(&label, "open codec for", e))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(symphonia_error(&label, "read", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if channels.is_none() {
                    channels = Some(spec.channels.count() as u16);
                }
                if sample_rate.is_none() {
                    sample_rate = Some(spec.rate);
                }

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                debug!(format = %label, reason, "skipping corrupt packet");
            }
            Err(e) => return Err(symphonia_error(&label, "decode", e)),
        }
    }

    let channels =
        channels.ok_or_else(|| VoicemaskError::decode(label.clone(), "unknown channel count"))?;
    let sample_rate =
        sample_rate.ok_or_else(|| VoicemaskError::decode(label.clone(), "unknown sample rate"))?;

    DecodedAudio::new(samples, channels, sample_rate)
}

fn symphonia_error(format: &str, action: &str, e: SymphoniaError) -> VoicemaskError {
    VoicemaskError::DecodeFailure {
        format: format.to_string(),
        reason: format!("failed to {} stream: {}", action, e),
        source: Some(Box::new(e)),
    }
}
