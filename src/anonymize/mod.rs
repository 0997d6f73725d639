//! Anonymization pipeline
//!
//! ```text
//! raw bytes + hint
//!     │ resolve format (hint, else magic bytes)
//!     ▼
//! ContainerNormalizer ── decode → mono/16-bit/44.1kHz → normalize → MP3
//!     ▼
//! scrubber ── zero text runs and tag signatures between frames
//!     ▼
//! TransportEnvelope { base64, "mp3", was_anonymized }
//! ```
//!
//! Any failure along the way yields a pass-through envelope instead.

pub mod audit;
pub mod chunk;
pub mod envelope;
pub mod frame;
pub mod normalizer;
pub mod processor;
pub mod scrubber;

pub use audit::{audit, AuditReport};
pub use envelope::TransportEnvelope;
pub use frame::FrameHeader;
pub use normalizer::ContainerNormalizer;
pub use processor::AudioProcessor;
pub use scrubber::{scrub, scrub_with, ScrubOptions, ScrubReport};
