//! Voicemask - anonymizing audio pipeline for text-to-speech output
//!
//! Audio returned by speech vendors carries fingerprints of its origin:
//! container choice, encoder tags, loudness, DC offset. Voicemask turns any
//! supported container into one canonical, tag-free MP3 so the vendor
//! cannot be told apart from the bytes.
//!
//! # Architecture
//!
//! - `engine`: format detection, buffer types, decoding, MP3 encoding
//! - `dsp`: downmix, resampling, normalization, high-pass
//! - `anonymize`: normalizer, binary scrubber, orchestrator, audit
//!
//! ```no_run
//! use voicemask::{AudioProcessor, ProcessorConfig};
//!
//! let processor = AudioProcessor::new(ProcessorConfig::default())?;
//! let envelope = processor.process(&std::fs::read("speech.wav")?, Some("wav"));
//! if !envelope.was_anonymized {
//!     eprintln!("fell back to pass-through");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod anonymize;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;

pub use anonymize::{audit, scrub, AudioProcessor, AuditReport, ScrubReport, TransportEnvelope};
pub use config::ProcessorConfig;
pub use engine::{detect_format, AudioBuffer, AudioFormat, PcmFrame};
pub use error::{Result, VoicemaskError};
