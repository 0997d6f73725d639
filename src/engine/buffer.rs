//! Audio buffer types
//!
//! Three representations flow through the pipeline:
//! - [`AudioBuffer`]: encoded container bytes plus their format label
//! - [`DecodedAudio`]: interleaved float samples at the source layout
//! - [`PcmFrame`]: canonical mono 16-bit 44.1kHz samples
//!
//! Stages consume one value and produce a new one; nothing is shared mutably.

use crate::engine::format::{detect_format, AudioFormat};
use crate::error::{Result, VoicemaskError};

/// Canonical output sample rate
pub const CANONICAL_SAMPLE_RATE: u32 = 44_100;

/// Canonical output channel count
pub const CANONICAL_CHANNELS: u16 = 1;

/// Canonical output sample width in bits
pub const CANONICAL_BITS_PER_SAMPLE: u16 = 16;

// ============================================================================
// Encoded container bytes
// ============================================================================

/// Immutable encoded audio with its container label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    data: Vec<u8>,
    format: AudioFormat,
}

impl AudioBuffer {
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Wrap bytes and label them with the magic-byte detector
    pub fn detect(data: Vec<u8>) -> Self {
        let format = detect_format(&data);
        Self { data, format }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Take ownership of the underlying bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

// ============================================================================
// Decoded samples at the source layout
// ============================================================================

/// Decoded audio samples with metadata
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved audio samples normalized to -1.0..1.0
    samples: Vec<f32>,
    /// Number of audio channels (1 = mono, 2 = stereo)
    channels: u16,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl DecodedAudio {
    /// Create a decoded buffer with the given parameters
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(VoicemaskError::EmptyAudio);
        }
        if channels == 0 || sample_rate == 0 {
            return Err(VoicemaskError::UnsupportedFormat {
                format: format!("{} channels at {} Hz", channels, sample_rate),
            });
        }
        if samples.len() % channels as usize != 0 {
            return Err(VoicemaskError::UnsupportedFormat {
                format: format!(
                    "Sample count {} is not divisible by channel count {}",
                    samples.len(),
                    channels
                ),
            });
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Create a sine wave test tone on every channel
    pub fn sine_wave(frequency: f32, duration_secs: f32, channels: u16, sample_rate: u32) -> Self {
        let num_frames = (duration_secs * sample_rate as f32) as usize;
        let mut samples = Vec::with_capacity(num_frames * channels as usize);

        for i in 0..num_frames {
            let t = i as f32 / sample_rate as f32;
            let sample = (2.0 * std::f32::consts::PI * frequency * t).sin();
            for _ in 0..channels {
                samples.push(sample);
            }
        }

        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Get a reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get the number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Get the duration in seconds
    pub fn duration(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Copy out a range of frames as a new buffer with the same layout
    pub fn slice_frames(&self, start: usize, end: usize) -> Result<DecodedAudio> {
        let end = end.min(self.num_frames());
        let channels = self.channels as usize;
        let start = start.min(end);
        DecodedAudio::new(
            self.samples[start * channels..end * channels].to_vec(),
            self.channels,
            self.sample_rate,
        )
    }
}

// ============================================================================
// Canonical PCM
// ============================================================================

/// Canonical mono 16-bit 44.1kHz PCM
///
/// Channel count, sample width and rate are fixed by the type; only the
/// samples vary. A frame is always built from bare samples, so nothing from
/// the source container can ride along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmFrame {
    samples: Vec<i16>,
}

impl PcmFrame {
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Parse headerless 16-bit little-endian mono PCM
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(VoicemaskError::decode(
                "pcm",
                format!("odd byte length {} for 16-bit samples", bytes.len()),
            ));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn channels(&self) -> u16 {
        CANONICAL_CHANNELS
    }

    pub fn sample_rate(&self) -> u32 {
        CANONICAL_SAMPLE_RATE
    }

    pub fn bits_per_sample(&self) -> u16 {
        CANONICAL_BITS_PER_SAMPLE
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / CANONICAL_SAMPLE_RATE as f64
    }

    /// Samples as floats in -1.0..1.0
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32 / 32768.0).collect()
    }

    /// Serialize as headerless 16-bit little-endian bytes
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_wave_generation() {
        let buffer = DecodedAudio::sine_wave(440.0, 1.0, 2, 44100);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_rate(), 44100);
        assert_eq!(buffer.num_frames(), 44100);
        assert!((buffer.duration() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_buffer_error() {
        let result = DecodedAudio::new(vec![], 1, 44100);
        assert!(matches!(result, Err(VoicemaskError::EmptyAudio)));
    }

    #[test]
    fn test_channel_mismatch_error() {
        let result = DecodedAudio::new(vec![0.0, 0.1, 0.2], 2, 44100);
        assert!(matches!(result, Err(VoicemaskError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_slice_frames_keeps_layout() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // L, R, L, R, L, R
        let buffer = DecodedAudio::new(samples, 2, 8000).unwrap();

        let slice = buffer.slice_frames(1, 3).unwrap();
        assert_eq!(slice.samples(), &[3.0, 4.0, 5.0, 6.0]);
        assert_eq!(slice.channels(), 2);
        assert_eq!(slice.sample_rate(), 8000);
    }

    #[test]
    fn test_pcm_frame_byte_round_trip() {
        let frame = PcmFrame::from_samples(vec![0, 1, -1, i16::MAX, i16::MIN]);
        let bytes = frame.to_le_bytes();
        assert_eq!(bytes.len(), 10);
        assert_eq!(PcmFrame::from_le_bytes(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_pcm_frame_rejects_odd_length() {
        assert!(PcmFrame::from_le_bytes(&[0, 1, 2]).is_err());
    }

    #[test]
    fn test_pcm_frame_is_canonical() {
        let frame = PcmFrame::from_samples(vec![0; 44100]);
        assert_eq!(frame.channels(), 1);
        assert_eq!(frame.bits_per_sample(), 16);
        assert_eq!(frame.sample_rate(), 44100);
        assert!((frame.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_audio_buffer_detects_format() {
        let mut data = b"fLaC".to_vec();
        data.resize(16, 0);
        let buffer = AudioBuffer::detect(data);
        assert_eq!(buffer.format(), AudioFormat::Flac);
        assert_eq!(buffer.len(), 16);
    }
}
