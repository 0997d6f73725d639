//! Shared fixtures for integration tests
#![allow(dead_code)]

/// Interleaved 16-bit sine samples on every channel
pub fn sine_samples(frequency: f64, duration_secs: f64, channels: u16, sample_rate: u32) -> Vec<i16> {
    let frames = (duration_secs * sample_rate as f64).round() as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let value = ((2.0 * std::f64::consts::PI * frequency * t).sin() * 12000.0) as i16;
        for _ in 0..channels {
            samples.push(value);
        }
    }
    samples
}

/// A 16-bit PCM WAV, optionally with a LIST/INFO chunk naming an artist
pub fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32, artist: Option<&str>) -> Vec<u8> {
    let block_align = channels * 2;

    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
    fmt.extend_from_slice(&channels.to_le_bytes());
    fmt.extend_from_slice(&sample_rate.to_le_bytes());
    fmt.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    fmt.extend_from_slice(&block_align.to_le_bytes());
    fmt.extend_from_slice(&16u16.to_le_bytes());

    let mut chunks = Vec::new();
    push_chunk(&mut chunks, b"fmt ", &fmt);

    if let Some(artist) = artist {
        let mut text = artist.as_bytes().to_vec();
        text.push(0);
        let mut info = b"INFO".to_vec();
        push_chunk(&mut info, b"IART", &text);
        push_chunk(&mut chunks, b"LIST", &info);
    }

    let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    push_chunk(&mut chunks, b"data", &data);

    let mut wav = b"RIFF".to_vec();
    wav.extend_from_slice(&(4 + chunks.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(&chunks);
    wav
}

/// One-second 44.1kHz stereo WAV carrying "Test Artist" in LIST/INFO
pub fn tagged_stereo_wav() -> Vec<u8> {
    let samples = sine_samples(440.0, 1.0, 2, 44100);
    wav_bytes(&samples, 2, 44100, Some("Test Artist"))
}

/// Prefix an MP3 stream with an ID3v2.4 tag holding a title frame
pub fn with_id3v2(mp3: &[u8], title: &str) -> Vec<u8> {
    let mut frame = b"TIT2".to_vec();
    let body_len = title.len() as u32 + 1;
    frame.extend_from_slice(&syncsafe(body_len));
    frame.extend_from_slice(&[0, 0, 3]); // flags, UTF-8
    frame.extend_from_slice(title.as_bytes());

    let mut tag = b"ID3\x04\x00\x00".to_vec();
    tag.extend_from_slice(&syncsafe(frame.len() as u32));
    tag.extend_from_slice(&frame);
    tag.extend_from_slice(mp3);
    tag
}

/// Whether `needle` occurs anywhere in `haystack`
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn push_chunk(out: &mut Vec<u8>, id: &[u8; 4], body: &[u8]) {
    out.extend_from_slice(id);
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
}

fn syncsafe(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}
