//! Transport envelope returned to callers

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::anonymize::scrubber::ScrubReport;
use crate::error::Result;

/// Extension reported for anonymized output and unknown fallbacks
pub const CANONICAL_EXTENSION: &str = "mp3";

/// Base64 audio plus the extension it should be stored under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportEnvelope {
    /// Standard-alphabet base64 of the audio bytes
    pub audio_base64: String,
    /// Lowercase extension without a dot
    pub extension: String,
    /// False when the pipeline fell back to passing the input through
    pub was_anonymized: bool,
    /// Scrubber statistics for anonymized output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrub_report: Option<ScrubReport>,
    pub input_bytes: usize,
    pub output_bytes: usize,
}

impl TransportEnvelope {
    /// Envelope for a successfully anonymized MP3
    pub fn anonymized(mp3: &[u8], input_bytes: usize, report: ScrubReport) -> Self {
        Self {
            audio_base64: STANDARD.encode(mp3),
            extension: CANONICAL_EXTENSION.to_string(),
            was_anonymized: true,
            scrub_report: Some(report),
            input_bytes,
            output_bytes: mp3.len(),
        }
    }

    /// Envelope carrying the caller's bytes unmodified
    pub fn passthrough(original: &[u8], extension: &str) -> Self {
        Self {
            audio_base64: STANDARD.encode(original),
            extension: extension.to_string(),
            was_anonymized: false,
            scrub_report: None,
            input_bytes: original.len(),
            output_bytes: original.len(),
        }
    }

    /// Envelope returning an undecodable base64 payload as-is
    pub fn passthrough_base64(original: &str, extension: &str) -> Self {
        Self {
            audio_base64: original.to_string(),
            extension: extension.to_string(),
            was_anonymized: false,
            scrub_report: None,
            input_bytes: original.len(),
            output_bytes: original.len(),
        }
    }

    /// Decode the carried audio back to bytes
    pub fn audio_bytes(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.audio_base64)?)
    }

    /// The `(base64, extension)` pair
    pub fn into_parts(self) -> (String, String) {
        (self.audio_base64, self.extension)
    }
}
