//! MPEG audio frame headers
//!
//! Parses the 4-byte header that opens every MPEG-1/2/2.5 Layer I/II/III
//! frame and computes the exact frame length, padding included.

use crate::engine::format::is_frame_sync;

/// Bytes in a frame header
pub const HEADER_LEN: usize = 4;

/// MPEG audio version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

/// MPEG audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    One,
    Two,
    Three,
}

// Bitrates in kbit/s indexed by the 4-bit bitrate field. Index 0 (free) and
// 15 (bad) are rejected before lookup.
const MPEG1_LAYER1: [u32; 15] = [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448];
const MPEG1_LAYER2: [u32; 15] = [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384];
const MPEG1_LAYER3: [u32; 15] = [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const MPEG2_LAYER1: [u32; 15] = [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256];
const MPEG2_LAYER23: [u32; 15] = [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

const MPEG1_RATES: [u32; 3] = [44100, 48000, 32000];
const MPEG2_RATES: [u32; 3] = [22050, 24000, 16000];
const MPEG25_RATES: [u32; 3] = [11025, 12000, 8000];

/// A decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    pub bitrate_kbps: u32,
    pub sample_rate: u32,
    pub padding: bool,
}

impl FrameHeader {
    /// Parse the header at the start of `bytes`
    ///
    /// Returns `None` for anything that is not a usable header: no sync,
    /// reserved version or layer, free/bad bitrate index, reserved rate index.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_LEN || !is_frame_sync(bytes[0], bytes[1]) {
            return None;
        }

        let version = match (bytes[1] >> 3) & 0b11 {
            0b00 => MpegVersion::Mpeg25,
            0b10 => MpegVersion::Mpeg2,
            0b11 => MpegVersion::Mpeg1,
            _ => return None,
        };
        let layer = match (bytes[1] >> 1) & 0b11 {
            0b01 => Layer::Three,
            0b10 => Layer::Two,
            0b11 => Layer::One,
            _ => return None,
        };

        let bitrate_index = (bytes[2] >> 4) as usize;
        let rate_index = ((bytes[2] >> 2) & 0b11) as usize;
        if bitrate_index == 0 || bitrate_index == 15 || rate_index == 3 {
            return None;
        }

        let bitrates = match (version, layer) {
            (MpegVersion::Mpeg1, Layer::One) => &MPEG1_LAYER1,
            (MpegVersion::Mpeg1, Layer::Two) => &MPEG1_LAYER2,
            (MpegVersion::Mpeg1, Layer::Three) => &MPEG1_LAYER3,
            (_, Layer::One) => &MPEG2_LAYER1,
            (_, _) => &MPEG2_LAYER23,
        };
        let rates = match version {
            MpegVersion::Mpeg1 => &MPEG1_RATES,
            MpegVersion::Mpeg2 => &MPEG2_RATES,
            MpegVersion::Mpeg25 => &MPEG25_RATES,
        };

        Some(FrameHeader {
            version,
            layer,
            bitrate_kbps: bitrates[bitrate_index],
            sample_rate: rates[rate_index],
            padding: (bytes[2] >> 1) & 1 == 1,
        })
    }

    /// Total frame length in bytes, header included
    pub fn frame_len(&self) -> usize {
        let kbps = self.bitrate_kbps as usize;
        let rate = self.sample_rate as usize;
        let pad = self.padding as usize;
        match (self.layer, self.version) {
            (Layer::One, _) => (12_000 * kbps / rate + pad) * 4,
            (Layer::Two, _) | (Layer::Three, MpegVersion::Mpeg1) => 144_000 * kbps / rate + pad,
            (Layer::Three, _) => 72_000 * kbps / rate + pad,
        }
    }

    /// PCM samples carried per channel
    pub fn samples_per_frame(&self) -> usize {
        match (self.layer, self.version) {
            (Layer::One, _) => 384,
            (Layer::Two, _) | (Layer::Three, MpegVersion::Mpeg1) => 1152,
            (Layer::Three, _) => 576,
        }
    }
}

/// Parse a header at `offset` and return the span its frame covers
///
/// A frame cut short by the end of the buffer spans the remaining bytes.
pub fn frame_at(buf: &[u8], offset: usize) -> Option<(FrameHeader, usize)> {
    let header = FrameHeader::parse(buf.get(offset..)?)?;
    let span = header.frame_len().min(buf.len() - offset);
    Some((header, span))
}
