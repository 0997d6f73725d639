//! Binary scrubber
//!
//! A single left-to-right pass over an MP3 byte stream. Bytes inside
//! recognised MPEG frames are never touched; outside them, printable text
//! runs and 4-byte tag signatures are overwritten with zeros.
//!
//! ```text
//! cursor ─┬─ valid frame header            ─→ skip frame (or rest of buffer)
//!         ├─ printable run ≥ min            ─→ zero run, skip run
//!         ├─ tag signature (9+ bytes left)  ─→ zero 4 bytes, skip 4
//!         └─ otherwise                      ─→ advance 1
//! ```
//!
//! Output length always equals input length. Already-zero bytes are left
//! as-is, so a scrubbed buffer scrubs to itself with no modifications.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anonymize::frame::frame_at;
use crate::config::ProcessorConfig;

/// Buffers shorter than this are returned unchanged
pub const MIN_SCRUB_LEN: usize = 10;

/// A tag signature is only tested while more than this many bytes remain
pub(crate) const SIGNATURE_TAIL: usize = 8;

/// Known tag headers matched verbatim
const KNOWN_SIGNATURES: [&[u8; 4]; 4] = [b"ID3\x03", b"ID3\x04", b"TAG+", b"APEV"];

/// Scrubber heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrubOptions {
    /// Shortest printable run that is neutralized
    pub text_run_min: usize,
    /// Lookahead window when measuring a run
    pub text_run_window: usize,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            text_run_min: 4,
            text_run_window: 100,
        }
    }
}

impl From<&ProcessorConfig> for ScrubOptions {
    fn from(config: &ProcessorConfig) -> Self {
        Self {
            text_run_min: config.text_run_min,
            text_run_window: config.text_run_window,
        }
    }
}

/// What a scrub pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubReport {
    /// Total bytes changed from non-zero to zero
    pub bytes_neutralized: usize,
    /// Bytes zeroed inside text runs
    pub text_run_bytes: usize,
    /// Bytes zeroed by signature matches
    pub signature_bytes: usize,
    /// Text runs that had at least one byte zeroed
    pub text_runs: usize,
    /// Signature matches
    pub signatures: usize,
    /// Frames skipped untouched
    pub frames_preserved: usize,
}

impl ScrubReport {
    /// Number of bytes the pass changed
    pub fn modifications(&self) -> usize {
        self.bytes_neutralized
    }

    pub fn is_unmodified(&self) -> bool {
        self.bytes_neutralized == 0
    }
}

/// Scrub with the default heuristics
pub fn scrub(data: Vec<u8>) -> (Vec<u8>, ScrubReport) {
    scrub_with(data, ScrubOptions::default())
}

/// Scrub with explicit heuristics
pub fn scrub_with(mut data: Vec<u8>, options: ScrubOptions) -> (Vec<u8>, ScrubReport) {
    let mut report = ScrubReport::default();
    let len = data.len();
    if len < MIN_SCRUB_LEN {
        return (data, report);
    }

    let mut cursor = 0;
    while cursor + 4 < len {
        if let Some((_, frame_len)) = frame_at(&data, cursor) {
            report.frames_preserved += 1;
            cursor += frame_len;
            continue;
        }

        if is_printable(data[cursor]) {
            let run = text_run_len(&data[cursor..], options.text_run_window);
            if run >= options.text_run_min {
                let zeroed = zero_nonzero(&mut data[cursor..cursor + run]);
                if zeroed > 0 {
                    report.text_runs += 1;
                    report.text_run_bytes += zeroed;
                }
                cursor += run;
                continue;
            }
        }

        if len - cursor > SIGNATURE_TAIL && is_tag_signature(&data[cursor..cursor + 4]) {
            let zeroed = zero_nonzero(&mut data[cursor..cursor + 4]);
            report.signatures += 1;
            report.signature_bytes += zeroed;
            cursor += 4;
            continue;
        }

        cursor += 1;
    }

    report.bytes_neutralized = report.text_run_bytes + report.signature_bytes;
    debug!(
        bytes = len,
        frames = report.frames_preserved,
        neutralized = report.bytes_neutralized,
        text_runs = report.text_runs,
        signatures = report.signatures,
        "scrub pass complete"
    );
    (data, report)
}

/// Printable ASCII (space through tilde)
pub(crate) fn is_printable(byte: u8) -> bool {
    (32..=126).contains(&byte)
}

/// Bytes that may continue a text run
pub(crate) fn is_text_byte(byte: u8) -> bool {
    is_printable(byte) || matches!(byte, 0 | b'\t' | b'\n' | b'\r')
}

/// Length of the text run at the start of `bytes`, capped at `window`
pub(crate) fn text_run_len(bytes: &[u8], window: usize) -> usize {
    bytes
        .iter()
        .take(window)
        .take_while(|&&b| is_text_byte(b))
        .count()
}

/// All-alphabetic, three letters plus a digit, or a known tag header
pub(crate) fn is_tag_signature(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }
    let quad = &bytes[..4];
    if KNOWN_SIGNATURES.iter().any(|sig| quad == &sig[..]) {
        return true;
    }
    let letters = quad[..3].iter().all(u8::is_ascii_alphabetic);
    letters && (quad[3].is_ascii_alphabetic() || quad[3].is_ascii_digit())
}

fn zero_nonzero(bytes: &mut [u8]) -> usize {
    let mut zeroed = 0;
    for byte in bytes.iter_mut().filter(|b| **b != 0) {
        *byte = 0;
        zeroed += 1;
    }
    zeroed
}
