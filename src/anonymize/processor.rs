//! Pipeline orchestrator
//!
//! [`AudioProcessor`] sequences format resolution, container normalization,
//! scrubbing and base64 transport encoding. Its public entry points never
//! return an error: any failure degrades to passing the caller's bytes
//! through unchanged, flagged with `was_anonymized = false`.
//!
//! The processor holds no per-request state and is `Send + Sync`; share one
//! instance behind an `Arc`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, error, info};

use crate::anonymize::chunk::split_into_wav_chunks;
use crate::anonymize::envelope::{TransportEnvelope, CANONICAL_EXTENSION};
use crate::anonymize::normalizer::ContainerNormalizer;
use crate::anonymize::scrubber::{scrub_with, ScrubOptions};
use crate::config::ProcessorConfig;
use crate::engine::buffer::AudioBuffer;
use crate::engine::decode::DecoderRegistry;
use crate::engine::format::{detect_known_format, AudioFormat};
use crate::error::{Result, VoicemaskError};

/// Anonymizing audio pipeline
#[derive(Debug, Clone, Default)]
pub struct AudioProcessor {
    config: ProcessorConfig,
    registry: DecoderRegistry,
}

impl AudioProcessor {
    /// Create a processor with the default decoder table
    ///
    /// # Errors
    /// * `InvalidConfig` - If the configuration fails validation
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        Self::with_registry(config, DecoderRegistry::default())
    }

    /// Create a processor with a custom decoder table
    pub fn with_registry(config: ProcessorConfig, registry: DecoderRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    /// Format from a non-empty hint, otherwise from the magic bytes
    pub fn resolve_format(&self, raw: &[u8], hint: Option<&str>) -> AudioFormat {
        match non_empty_hint(hint) {
            Some(hint) => AudioFormat::from_hint(hint),
            None => detect_known_format(raw).unwrap_or_else(|e| {
                debug!(code = e.error_code(), hint = e.recovery_hint(), "{}", e);
                AudioFormat::Unknown
            }),
        }
    }

    fn normalizer(&self) -> ContainerNormalizer<'_> {
        ContainerNormalizer::new(&self.registry, &self.config)
    }

    /// Anonymize audio, surfacing any failure
    ///
    /// # Errors
    /// Every decode, encode and configuration error of the pipeline
    pub fn try_process(&self, raw: &[u8], hint: Option<&str>) -> Result<TransportEnvelope> {
        let format = self.resolve_format(raw, hint);
        debug!(format = %format, bytes = raw.len(), "resolved input format");

        let normalized = self
            .normalizer()
            .normalize(AudioBuffer::new(raw.to_vec(), format))?;
        let (scrubbed, report) = scrub_with(normalized.into_data(), ScrubOptions::from(&self.config));

        info!(
            format = %format,
            input_bytes = raw.len(),
            output_bytes = scrubbed.len(),
            neutralized = report.modifications(),
            "anonymized audio"
        );
        Ok(TransportEnvelope::anonymized(&scrubbed, raw.len(), report))
    }

    /// Anonymize audio, falling back to the original bytes on failure
    pub fn process(&self, raw: &[u8], hint: Option<&str>) -> TransportEnvelope {
        match self.try_process(raw, hint) {
            Ok(envelope) => envelope,
            Err(e) => {
                let extension = self.fallback_extension(raw, hint);
                error!(
                    error = %e,
                    code = e.error_code(),
                    recoverable = e.is_recoverable(),
                    hint = e.recovery_hint(),
                    bytes = raw.len(),
                    extension = %extension,
                    "anonymization failed, passing input through"
                );
                TransportEnvelope::passthrough(raw, &extension)
            }
        }
    }

    /// Anonymize base64 audio
    ///
    /// Whitespace anywhere in the payload (MIME line wrapping) is ignored.
    /// A payload that is not valid base64 comes back unchanged.
    pub fn process_base64(&self, audio_base64: &str, hint: Option<&str>) -> TransportEnvelope {
        let compact: String = audio_base64
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        match STANDARD.decode(compact.as_bytes()) {
            Ok(raw) => self.process(&raw, hint),
            Err(e) => {
                let e = VoicemaskError::from(e);
                let extension = self.fallback_extension(&[], hint);
                error!(
                    error = %e,
                    code = e.error_code(),
                    hint = e.recovery_hint(),
                    extension = %extension,
                    "payload is not valid base64, passing it through"
                );
                TransportEnvelope::passthrough_base64(audio_base64, &extension)
            }
        }
    }

    /// Split audio into WAV segments, surfacing any failure
    pub fn try_chunk_audio(
        &self,
        raw: &[u8],
        chunk_duration_ms: Option<u64>,
        hint: Option<&str>,
    ) -> Result<Vec<Vec<u8>>> {
        let duration = chunk_duration_ms.unwrap_or(self.config.chunk_duration_ms);
        let format = self.resolve_format(raw, hint);
        let decoded = self
            .normalizer()
            .decode(AudioBuffer::new(raw.to_vec(), format))?;
        split_into_wav_chunks(&decoded, duration)
    }

    /// Split audio into fixed-duration WAV segments
    ///
    /// `None` uses the configured duration (30s by default). On any failure
    /// the whole input comes back as a single element.
    pub fn chunk_audio(
        &self,
        raw: &[u8],
        chunk_duration_ms: Option<u64>,
        hint: Option<&str>,
    ) -> Vec<Vec<u8>> {
        match self.try_chunk_audio(raw, chunk_duration_ms, hint) {
            Ok(chunks) => chunks,
            Err(e) => {
                error!(error = %e, bytes = raw.len(), "chunking failed, returning input whole");
                vec![raw.to_vec()]
            }
        }
    }

    /// Extension for pass-through output: the resolved format's, else the
    /// caller's own hint, else `"mp3"`
    fn fallback_extension(&self, raw: &[u8], hint: Option<&str>) -> String {
        if let Some(extension) = self.resolve_format(raw, hint).extension() {
            return extension.to_string();
        }
        non_empty_hint(hint)
            .map(|h| h.trim_start_matches('.').to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| CANONICAL_EXTENSION.to_string())
    }
}

fn non_empty_hint(hint: Option<&str>) -> Option<&str> {
    hint.map(str::trim).filter(|h| !h.is_empty())
}

#[cfg(feature = "async")]
impl AudioProcessor {
    /// Run [`AudioProcessor::process`] on the blocking thread pool
    pub async fn process_async(
        self: std::sync::Arc<Self>,
        raw: Vec<u8>,
        hint: Option<String>,
    ) -> TransportEnvelope {
        let input: std::sync::Arc<[u8]> = raw.into();
        let task_input = input.clone();
        let task_hint = hint.clone();
        let processor = self.clone();

        let joined = tokio::task::spawn_blocking(move || {
            processor.process(&task_input, task_hint.as_deref())
        })
        .await;

        match joined {
            Ok(envelope) => envelope,
            Err(e) => {
                let extension = self.fallback_extension(&input, hint.as_deref());
                error!(error = %e, "processing task failed, passing input through");
                TransportEnvelope::passthrough(&input, &extension)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::DecodedAudio;
    use crate::engine::io::write_wav;

    fn wav_bytes(duration: f32) -> Vec<u8> {
        write_wav(&DecodedAudio::sine_wave(330.0, duration, 2, 22050)).unwrap()
    }

    #[test]
    fn test_processor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AudioProcessor>();
    }

    #[test]
    fn test_new_validates_config() {
        let config = ProcessorConfig {
            bitrate_kbps: 7,
            ..Default::default()
        };
        assert!(matches!(
            AudioProcessor::new(config),
            Err(VoicemaskError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_resolve_format_prefers_hint() {
        let processor = AudioProcessor::default();
        let wav = wav_bytes(0.05);
        assert_eq!(processor.resolve_format(&wav, None), AudioFormat::Wav);
        assert_eq!(processor.resolve_format(&wav, Some("  ")), AudioFormat::Wav);
        assert_eq!(processor.resolve_format(&wav, Some("FLAC")), AudioFormat::Flac);
    }

    #[test]
    fn test_process_wav() {
        let processor = AudioProcessor::default();
        let envelope = processor.process(&wav_bytes(0.3), Some("wav"));

        assert!(envelope.was_anonymized);
        assert_eq!(envelope.extension, "mp3");
        let mp3 = envelope.audio_bytes().unwrap();
        assert_eq!(mp3[0], 0xFF);
        assert_eq!(envelope.output_bytes, mp3.len());
    }

    #[test]
    fn test_fallback_keeps_hint_extension() {
        let processor = AudioProcessor::default();
        let garbage = vec![0x13u8; 40];
        let envelope = processor.process(&garbage, Some("wav"));

        assert!(!envelope.was_anonymized);
        assert_eq!(envelope.extension, "wav");
        assert_eq!(envelope.audio_bytes().unwrap(), garbage);
    }

    #[test]
    fn test_fallback_keeps_unrecognised_hint() {
        let processor = AudioProcessor::default();
        let garbage = vec![0x13u8; 40];

        assert_eq!(processor.process(&garbage, Some(" opus ")).extension, "opus");
        assert_eq!(processor.process(&garbage, Some(".webm")).extension, "webm");
        assert_eq!(processor.process(&garbage, None).extension, "mp3");
        assert_eq!(processor.process_base64("@@@", Some("opus")).extension, "opus");
    }

    #[test]
    fn test_try_process_surfaces_error() {
        let processor = AudioProcessor::default();
        assert!(processor.try_process(&[1, 2, 3], None).is_err());
    }

    #[test]
    fn test_chunk_audio_falls_back_on_zero_duration() {
        let processor = AudioProcessor::default();
        let wav = wav_bytes(0.2);
        assert_eq!(processor.chunk_audio(&wav, Some(0), None), vec![wav.clone()]);
        assert_eq!(processor.chunk_audio(&wav, Some(100), None).len(), 2);
    }
}
