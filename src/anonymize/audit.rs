//! Fingerprint audit
//!
//! Read-only counterpart of the scrubber: walks the same frame grid and
//! reports anything outside frames that could identify an encoder. A clean
//! report means no ID3v1/ID3v2/APE/Xing block and no printable run of four
//! or more bytes outside valid MPEG frames.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::anonymize::frame::frame_at;
use crate::anonymize::scrubber::{
    is_printable, is_tag_signature, text_run_len, ScrubOptions, SIGNATURE_TAIL,
};

/// Encoder and tag markers searched for outside frames
pub const ENCODER_MARKERS: [&str; 8] = ["Xing", "Info", "LAME", "Lavf", "TSSE", "TXXX", "APETAGEX", "TAG"];

/// Findings of an audit pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub total_bytes: usize,
    pub frames: usize,
    pub frame_bytes: usize,
    /// PCM samples per channel carried by the frames
    pub frame_samples: usize,
    /// Stream opens with an ID3v2 header
    pub leading_id3: bool,
    pub text_runs_outside_frames: usize,
    pub signatures_outside_frames: usize,
    /// Markers found outside frames, in [`ENCODER_MARKERS`] order
    pub encoder_markers: Vec<String>,
}

impl AuditReport {
    /// Nothing outside frames could identify the encoder
    pub fn is_clean(&self) -> bool {
        !self.leading_id3
            && self.text_runs_outside_frames == 0
            && self.signatures_outside_frames == 0
            && self.encoder_markers.is_empty()
    }

    /// Bytes not covered by a recognised frame
    pub fn gap_bytes(&self) -> usize {
        self.total_bytes - self.frame_bytes
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bytes:              {}", self.total_bytes)?;
        writeln!(f, "frames:             {} ({} bytes)", self.frames, self.frame_bytes)?;
        writeln!(f, "frame samples:      {}", self.frame_samples)?;
        writeln!(f, "bytes outside:      {}", self.gap_bytes())?;
        writeln!(f, "leading ID3:        {}", self.leading_id3)?;
        writeln!(f, "text runs outside:  {}", self.text_runs_outside_frames)?;
        writeln!(f, "signatures outside: {}", self.signatures_outside_frames)?;
        if self.encoder_markers.is_empty() {
            writeln!(f, "encoder markers:    none")?;
        } else {
            writeln!(f, "encoder markers:    {}", self.encoder_markers.join(", "))?;
        }
        write!(f, "clean:              {}", self.is_clean())
    }
}

/// Audit with the default text-run heuristics
pub fn audit(data: &[u8]) -> AuditReport {
    audit_with(data, ScrubOptions::default())
}

/// Audit a byte stream without modifying it
pub fn audit_with(data: &[u8], options: ScrubOptions) -> AuditReport {
    let len = data.len();
    let mut report = AuditReport {
        total_bytes: len,
        leading_id3: data.starts_with(b"ID3"),
        ..Default::default()
    };

    let mut gaps: Vec<Range<usize>> = Vec::new();
    let mut cursor = 0;
    while cursor + 4 < len {
        if let Some((header, frame_len)) = frame_at(data, cursor) {
            report.frames += 1;
            report.frame_bytes += frame_len;
            report.frame_samples += header.samples_per_frame();
            cursor += frame_len;
            continue;
        }

        let step = if is_printable(data[cursor])
            && text_run_len(&data[cursor..], options.text_run_window) >= options.text_run_min
        {
            report.text_runs_outside_frames += 1;
            text_run_len(&data[cursor..], options.text_run_window)
        } else if len - cursor > SIGNATURE_TAIL && is_tag_signature(&data[cursor..cursor + 4]) {
            report.signatures_outside_frames += 1;
            4
        } else {
            1
        };
        push_gap(&mut gaps, cursor..cursor + step);
        cursor += step;
    }
    if cursor < len {
        push_gap(&mut gaps, cursor..len);
    }

    report.encoder_markers = ENCODER_MARKERS
        .iter()
        .filter(|marker| gaps.iter().any(|gap| contains(&data[gap.clone()], marker.as_bytes())))
        .map(|marker| marker.to_string())
        .collect();
    report
}

fn push_gap(gaps: &mut Vec<Range<usize>>, range: Range<usize>) {
    match gaps.last_mut() {
        Some(last) if last.end == range.start => last.end = range.end,
        _ => gaps.push(range),
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymize::scrubber::scrub;

    fn frame() -> Vec<u8> {
        let mut frame = vec![0x55u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        frame
    }

    #[test]
    fn test_contiguous_frames_are_clean() {
        let mut data = frame();
        data.extend_from_slice(&frame());

        let report = audit(&data);
        assert_eq!(report.frames, 2);
        assert_eq!(report.frame_samples, 2304);
        assert_eq!(report.gap_bytes(), 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_text_inside_frames_is_ignored() {
        let mut data = frame();
        data[100..109].copy_from_slice(b"LAME3.100");
        assert!(audit(&data).is_clean());
    }

    #[test]
    fn test_tags_outside_frames_are_reported() {
        let mut data = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
        data.extend_from_slice(&frame());
        data.extend_from_slice(b"TAGSong Title");
        data.extend_from_slice(&[0x80; 8]);

        let report = audit(&data);
        assert!(report.leading_id3);
        assert_eq!(report.frames, 1);
        assert!(report.text_runs_outside_frames >= 1);
        assert!(report.encoder_markers.contains(&"TAG".to_string()));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_scrubbed_gap_text_is_clean() {
        let mut data = frame();
        data.extend_from_slice(b"Lavf58.76.100");
        data.extend_from_slice(&frame());

        assert_eq!(audit(&data).encoder_markers, vec!["Lavf".to_string()]);
        let (scrubbed, _) = scrub(data);
        assert!(audit(&scrubbed).is_clean());
    }
}
