//! Container format labels and magic-byte detection
//!
//! Detection only looks at a fixed prefix of the buffer. It never decodes
//! and never fails: anything unrecognised is `AudioFormat::Unknown`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoicemaskError};

/// Minimum prefix length the detector inspects
pub const DETECT_PREFIX_LEN: usize = 12;

/// Closed set of container formats the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    Aiff,
    M4a,
    /// Headerless 16-bit little-endian mono PCM at 44.1kHz
    RawPcm,
    Unknown,
}

impl AudioFormat {
    /// All formats with a concrete container
    pub const KNOWN: [AudioFormat; 7] = [
        AudioFormat::Wav,
        AudioFormat::Mp3,
        AudioFormat::Ogg,
        AudioFormat::Flac,
        AudioFormat::Aiff,
        AudioFormat::M4a,
        AudioFormat::RawPcm,
    ];

    /// Map a caller-supplied format hint onto a label
    ///
    /// Case-insensitive, tolerates a leading dot and a few common aliases.
    /// Unrecognised hints map to `Unknown`, which forces auto-detection.
    pub fn from_hint(hint: &str) -> AudioFormat {
        let normalized = hint.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "wav" | "wave" | "x-wav" | "audio/wav" => AudioFormat::Wav,
            "mp3" | "mpeg" | "mpga" | "audio/mpeg" => AudioFormat::Mp3,
            "ogg" | "oga" | "vorbis" | "audio/ogg" => AudioFormat::Ogg,
            "flac" | "audio/flac" => AudioFormat::Flac,
            "aiff" | "aif" | "aifc" | "audio/aiff" => AudioFormat::Aiff,
            "m4a" | "mp4" | "aac" | "audio/mp4" => AudioFormat::M4a,
            "pcm" | "raw" | "s16le" | "raw-pcm" | "raw_pcm" => AudioFormat::RawPcm,
            _ => AudioFormat::Unknown,
        }
    }

    /// Canonical file extension, `None` for `Unknown`
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            AudioFormat::Wav => Some("wav"),
            AudioFormat::Mp3 => Some("mp3"),
            AudioFormat::Ogg => Some("ogg"),
            AudioFormat::Flac => Some("flac"),
            AudioFormat::Aiff => Some("aiff"),
            AudioFormat::M4a => Some("m4a"),
            AudioFormat::RawPcm => Some("pcm"),
            AudioFormat::Unknown => None,
        }
    }

    /// Whether this label names a concrete container
    pub fn is_known(&self) -> bool {
        !matches!(self, AudioFormat::Unknown)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension().unwrap_or("unknown"))
    }
}

/// Sniff the container format from the leading bytes of a buffer
///
/// Buffers shorter than [`DETECT_PREFIX_LEN`] bytes are always `Unknown`.
/// Signatures are checked in a fixed order:
///
/// | Format | Magic bytes                                   |
/// |--------|-----------------------------------------------|
/// | WAV    | `RIFF` + 4 bytes + `WAVE`                     |
/// | MP3    | `ID3`, or `0xFF` then a byte with top 3 bits set |
/// | OGG    | `OggS`                                        |
/// | FLAC   | `fLaC`                                        |
/// | AIFF   | `FORM` + 4 bytes + `AIFF`/`AIFC`              |
/// | M4A    | bytes 4..8 == `ftyp`                          |
pub fn detect_format(data: &[u8]) -> AudioFormat {
    if data.len() < DETECT_PREFIX_LEN {
        return AudioFormat::Unknown;
    }

    if data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return AudioFormat::Wav;
    }

    if data.starts_with(b"ID3") || is_frame_sync(data[0], data[1]) {
        return AudioFormat::Mp3;
    }

    if data.starts_with(b"OggS") {
        return AudioFormat::Ogg;
    }

    if data.starts_with(b"fLaC") {
        return AudioFormat::Flac;
    }

    if data.starts_with(b"FORM") && (&data[8..12] == b"AIFF" || &data[8..12] == b"AIFC") {
        return AudioFormat::Aiff;
    }

    if &data[4..8] == b"ftyp" {
        return AudioFormat::M4a;
    }

    AudioFormat::Unknown
}

/// Like [`detect_format`], but an unrecognised buffer is an error
pub fn detect_known_format(data: &[u8]) -> Result<AudioFormat> {
    match detect_format(data) {
        AudioFormat::Unknown => Err(VoicemaskError::FormatDetectionAmbiguous),
        format => Ok(format),
    }
}

/// MPEG frame sync: `0xFF` followed by a byte whose top 3 bits are set
#[inline]
pub fn is_frame_sync(first: u8, second: u8) -> bool {
    first == 0xFF && (second & 0xE0) == 0xE0
}
