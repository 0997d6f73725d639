//! Processor configuration
//!
//! Settings are plain serde data with defaults matching the canonical
//! output profile (mono, 44.1kHz, 128 kbit/s CBR). A JSON file can override
//! any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoicemaskError};

/// MPEG-1 Layer III bitrates LAME accepts in CBR mode (kbit/s)
pub const SUPPORTED_BITRATES_KBPS: [u32; 13] =
    [32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];

/// Configuration for [`crate::anonymize::AudioProcessor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Constant bitrate of the emitted MP3 (default: 128)
    pub bitrate_kbps: u32,
    /// Peak headroom below full scale after normalization (default: 1.0 dB)
    pub headroom_db: f32,
    /// High-pass cutoff for DC/rumble removal, 0 disables (default: 20 Hz)
    pub highpass_hz: f32,
    /// Segment length for [`crate::anonymize::AudioProcessor::chunk_audio`] (default: 30s)
    pub chunk_duration_ms: u64,
    /// Shortest printable run the scrubber treats as embedded text (default: 4)
    pub text_run_min: usize,
    /// Lookahead window when measuring a printable run (default: 100)
    pub text_run_window: usize,
    /// Retry with container auto-detection when the declared format fails to decode
    pub retry_autodetect: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            bitrate_kbps: 128,
            headroom_db: 1.0,
            highpass_hz: 20.0,
            chunk_duration_ms: 30_000,
            text_run_min: 4,
            text_run_window: 100,
            retry_autodetect: false,
        }
    }
}

impl ProcessorConfig {
    /// Load a configuration from a JSON file, filling missing fields with defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ProcessorConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is inside the range the pipeline supports
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_BITRATES_KBPS.contains(&self.bitrate_kbps) {
            return Err(invalid(
                "bitrate_kbps",
                format!(
                    "{} is not a Layer III CBR bitrate (expected one of {:?})",
                    self.bitrate_kbps, SUPPORTED_BITRATES_KBPS
                ),
            ));
        }
        if !(0.0..=12.0).contains(&self.headroom_db) {
            return Err(invalid(
                "headroom_db",
                format!("{} is outside 0..=12 dB", self.headroom_db),
            ));
        }
        if !(0.0..=200.0).contains(&self.highpass_hz) {
            return Err(invalid(
                "highpass_hz",
                format!("{} is outside 0..=200 Hz", self.highpass_hz),
            ));
        }
        if self.chunk_duration_ms == 0 {
            return Err(invalid("chunk_duration_ms", "must be greater than zero"));
        }
        if self.text_run_min < 2 {
            return Err(invalid("text_run_min", "must be at least 2"));
        }
        if self.text_run_window < self.text_run_min {
            return Err(invalid(
                "text_run_window",
                format!("must be at least text_run_min ({})", self.text_run_min),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> VoicemaskError {
    VoicemaskError::InvalidConfig {
        field: field.to_string(),
        reason: reason.into(),
    }
}
