//! Audio Engine Module
//!
//! Container-level plumbing shared by every pipeline stage:
//! - Format labels and magic-byte detection
//! - Encoded, decoded and canonical buffer types
//! - Decoder registry (WAV via hound, compressed containers via symphonia)
//! - Canonical MP3 encoding

pub mod buffer;
pub mod decode;
pub mod format;
pub mod io;
pub mod mp3;

pub use buffer::{
    AudioBuffer, DecodedAudio, PcmFrame, CANONICAL_BITS_PER_SAMPLE, CANONICAL_CHANNELS,
    CANONICAL_SAMPLE_RATE,
};
pub use decode::{DecodeFn, DecoderRegistry};
pub use format::{detect_format, detect_known_format, AudioFormat};
pub use io::{read_wav, write_wav};
pub use mp3::{encode_mp3, Mp3Settings};
