//! Error handling for Voicemask
//!
//! Every pipeline failure is a `VoicemaskError`. The public entry points of
//! [`crate::anonymize::AudioProcessor`] never surface these to callers; they
//! convert them into a pass-through fallback.

use thiserror::Error;

/// Result type alias for Voicemask operations
pub type Result<T> = std::result::Result<T, VoicemaskError>;

/// Main error type for Voicemask operations
#[derive(Error, Debug)]
pub enum VoicemaskError {
    // Detection Errors
    #[error("Could not determine the container format from the leading bytes")]
    FormatDetectionAmbiguous,

    // Decode Errors
    #[error("Failed to decode {format} audio: {reason}")]
    DecodeFailure {
        format: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Encode Errors
    #[error("MP3 encoder rejected the audio: {reason}")]
    EncodeFailure { reason: String },

    // Transport Errors
    #[error("Invalid base64 audio payload: {0}")]
    Base64DecodeFailure(#[from] base64::DecodeError),

    // Configuration Errors
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VoicemaskError {
    /// Shorthand for a decode failure without an underlying source error
    pub fn decode(format: impl Into<String>, reason: impl Into<String>) -> Self {
        VoicemaskError::DecodeFailure {
            format: format.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            VoicemaskError::FormatDetectionAmbiguous => "FORMAT_DETECTION_AMBIGUOUS",
            VoicemaskError::DecodeFailure { .. } => "DECODE_FAILURE",
            VoicemaskError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            VoicemaskError::EmptyAudio => "EMPTY_AUDIO",
            VoicemaskError::EncodeFailure { .. } => "ENCODE_FAILURE",
            VoicemaskError::Base64DecodeFailure(_) => "BASE64_DECODE_FAILURE",
            VoicemaskError::InvalidConfig { .. } => "INVALID_CONFIG",
            VoicemaskError::Io(_) => "IO_ERROR",
            VoicemaskError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors degrade to auto-detection or pass-through instead of
    /// aborting the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VoicemaskError::FormatDetectionAmbiguous
                | VoicemaskError::DecodeFailure { .. }
                | VoicemaskError::UnsupportedFormat { .. }
                | VoicemaskError::EmptyAudio
                | VoicemaskError::EncodeFailure { .. }
                | VoicemaskError::Base64DecodeFailure(_)
        )
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            VoicemaskError::FormatDetectionAmbiguous => {
                "Pass an explicit format hint (wav, mp3, ogg, flac, aiff, m4a)"
            }
            VoicemaskError::DecodeFailure { .. } => {
                "Check that the format hint matches the bytes, or omit it to auto-detect"
            }
            VoicemaskError::UnsupportedFormat { .. } => {
                "Supported formats: WAV, MP3, OGG Vorbis, FLAC, AIFF, M4A/AAC, raw 16-bit PCM"
            }
            VoicemaskError::EmptyAudio => "The vendor returned no audio samples",
            VoicemaskError::EncodeFailure { .. } => {
                "Check the configured bitrate is a valid MPEG-1 Layer III CBR rate"
            }
            VoicemaskError::Base64DecodeFailure(_) => "Send standard (RFC 4648) base64 with padding",
            VoicemaskError::InvalidConfig { .. } => "Fix the configuration value and reload",
            _ => "Check the error details and try again",
        }
    }
}
