//! Pipeline Tests
//!
//! End-to-end tests for the anonymization pipeline.

mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pretty_assertions::assert_eq;

use voicemask::anonymize::{audit, ContainerNormalizer, FrameHeader};
use voicemask::engine::{AudioBuffer, AudioFormat, DecoderRegistry};
use voicemask::{AudioProcessor, ProcessorConfig};

use common::{contains, sine_samples, tagged_stereo_wav, wav_bytes, with_id3v2};

fn processor() -> AudioProcessor {
    AudioProcessor::new(ProcessorConfig::default()).unwrap()
}

// === End-to-end ===

#[test]
fn test_tagged_wav_becomes_clean_mono_mp3() {
    let input = tagged_stereo_wav();
    assert!(contains(&input, b"Test Artist"));

    let envelope = processor().process(&input, Some("wav"));
    assert!(envelope.was_anonymized);
    assert_eq!(envelope.extension, "mp3");

    let mp3 = envelope.audio_bytes().unwrap();
    assert!(!contains(&mp3, b"Test Artist"));
    assert!(!mp3.starts_with(b"ID3"));

    let header = FrameHeader::parse(&mp3).expect("output must open with a frame");
    assert_eq!(header.bitrate_kbps, 128);
    assert_eq!(header.sample_rate, 44100);

    let decoded = DecoderRegistry::default()
        .decode(&AudioBuffer::new(mp3, AudioFormat::Mp3))
        .unwrap();
    assert_eq!(decoded.channels(), 1);
    assert_eq!(decoded.sample_rate(), 44100);
    // Encoder delay and final-frame padding add a few frames
    assert!(
        (decoded.duration() - 1.0).abs() < 0.15,
        "decoded duration {}",
        decoded.duration()
    );
}

#[test]
fn test_decoded_mp3_keeps_every_input_sample() {
    let envelope = processor().process(&tagged_stereo_wav(), Some("wav"));
    let decoded = DecoderRegistry::default()
        .decode(&AudioBuffer::new(envelope.audio_bytes().unwrap(), AudioFormat::Mp3))
        .unwrap();

    assert!(
        decoded.num_frames() >= 44100,
        "decoded {} samples from one second of input",
        decoded.num_frames()
    );
}

#[test]
fn test_ten_millisecond_clip_is_anonymized() {
    let samples = sine_samples(440.0, 0.01, 1, 44100);
    let wav = wav_bytes(&samples, 1, 44100, Some("Test Artist"));

    let envelope = processor().process(&wav, Some("wav"));
    assert!(envelope.was_anonymized);
    let mp3 = envelope.audio_bytes().unwrap();
    assert!(!mp3.is_empty());
    assert!(FrameHeader::parse(&mp3).is_some());
    assert!(!contains(&mp3, b"Test Artist"));
}

#[test]
fn test_detected_format_without_hint() {
    let envelope = processor().process(&tagged_stereo_wav(), None);
    assert!(envelope.was_anonymized);
    assert_eq!(envelope.extension, "mp3");
}

#[test]
fn test_output_passes_fingerprint_audit() {
    let envelope = processor().process(&tagged_stereo_wav(), None);
    let report = audit(&envelope.audio_bytes().unwrap());

    assert!(report.is_clean(), "audit found fingerprints:\n{}", report);
    assert_eq!(report.gap_bytes(), 0);
    assert!(report.frames > 30);
}

#[test]
fn test_second_pass_neutralizes_nothing() {
    let processor = processor();
    let first = processor.process(&tagged_stereo_wav(), Some("wav"));
    let mp3 = first.audio_bytes().unwrap();

    let second = processor.process(&mp3, Some("mp3"));
    assert!(second.was_anonymized);
    let report = second.scrub_report.unwrap();
    assert_eq!(report.modifications(), 0);
    assert_eq!(report.text_runs, 0);
    assert_eq!(report.signatures, 0);
}

#[test]
fn test_id3_tagged_mp3_loses_its_tag() {
    let processor = processor();
    let clean = processor
        .try_process(&tagged_stereo_wav(), Some("wav"))
        .unwrap()
        .audio_bytes()
        .unwrap();
    let tagged = with_id3v2(&clean, "Vendor Voice 7");

    let envelope = processor.process(&tagged, None);
    assert!(envelope.was_anonymized);
    let mp3 = envelope.audio_bytes().unwrap();
    assert!(!mp3.starts_with(b"ID3"));
    assert!(!contains(&mp3, b"Vendor Voice"));
    assert!(audit(&mp3).is_clean());
}

// === Canonical PCM ===

#[test]
fn test_pcm_sample_count_tracks_duration() {
    let registry = DecoderRegistry::default();
    let config = ProcessorConfig::default();
    let normalizer = ContainerNormalizer::new(&registry, &config);

    for (rate, channels) in [(44100, 2), (48000, 1), (22050, 2), (16000, 1)] {
        let samples = sine_samples(300.0, 1.5, channels, rate);
        let wav = wav_bytes(&samples, channels, rate, None);

        let pcm = normalizer
            .to_pcm(AudioBuffer::new(wav, AudioFormat::Wav))
            .unwrap();
        let expected = 1.5 * 44100.0;
        assert!(
            (pcm.num_samples() as f64 - expected).abs() <= 1152.0,
            "{} Hz / {} ch gave {} samples",
            rate,
            channels,
            pcm.num_samples()
        );
        assert_eq!(pcm.channels(), 1);
        assert_eq!(pcm.bits_per_sample(), 16);
    }
}

#[test]
fn test_raw_pcm_hint() {
    let samples = sine_samples(200.0, 0.5, 1, 44100);
    let raw: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

    let envelope = processor().process(&raw, Some("pcm"));
    assert!(envelope.was_anonymized);
    assert_eq!(envelope.extension, "mp3");
}

// === Fallback ===

#[test]
fn test_five_random_bytes_pass_through() {
    let input = [0x8Bu8, 0x02, 0xE7, 0x41, 0x19];
    let envelope = processor().process(&input, None);

    assert!(!envelope.was_anonymized);
    assert_eq!(envelope.extension, "mp3");
    assert!(envelope.scrub_report.is_none());
    assert_eq!(STANDARD.decode(&envelope.audio_base64).unwrap(), input.to_vec());
}

#[test]
fn test_truncated_wav_passes_through_with_hint_extension() {
    let wav = tagged_stereo_wav();
    let truncated = &wav[..30];

    let envelope = processor().process(truncated, Some("wav"));
    assert!(!envelope.was_anonymized);
    assert_eq!(envelope.extension, "wav");
    assert_eq!(envelope.audio_bytes().unwrap(), truncated.to_vec());
}

#[test]
fn test_mismatched_hint_falls_back() {
    let envelope = processor().process(&tagged_stereo_wav(), Some("flac"));
    assert!(!envelope.was_anonymized);
    assert_eq!(envelope.extension, "flac");
}

#[test]
fn test_mismatched_hint_recovers_with_autodetect() {
    let config = ProcessorConfig {
        retry_autodetect: true,
        ..Default::default()
    };
    let processor = AudioProcessor::new(config).unwrap();
    let envelope = processor.process(&tagged_stereo_wav(), Some("flac"));
    assert!(envelope.was_anonymized);
    assert_eq!(envelope.extension, "mp3");
}

// === Base64 entry point ===

#[test]
fn test_base64_entry_point() {
    let encoded = STANDARD.encode(tagged_stereo_wav());
    let envelope = processor().process_base64(&encoded, Some("wav"));
    assert!(envelope.was_anonymized);
    assert!(!contains(&envelope.audio_bytes().unwrap(), b"Test Artist"));
}

#[test]
fn test_line_wrapped_base64_is_accepted() {
    let encoded = STANDARD.encode(tagged_stereo_wav());
    let wrapped = encoded
        .as_bytes()
        .chunks(76)
        .map(|line| std::str::from_utf8(line).unwrap())
        .collect::<Vec<_>>()
        .join("\r\n");
    assert!(wrapped.contains("\r\n"));

    let envelope = processor().process_base64(&format!("{}\n", wrapped), Some("wav"));
    assert!(envelope.was_anonymized);
    assert!(!contains(&envelope.audio_bytes().unwrap(), b"Test Artist"));
}

#[test]
fn test_unrecognised_hint_is_kept_on_fallback() {
    let processor = processor();

    let envelope = processor.process(&[0x8Bu8, 0x02, 0xE7, 0x41, 0x19], Some("opus"));
    assert!(!envelope.was_anonymized);
    assert_eq!(envelope.extension, "opus");

    let envelope = processor.process_base64("not base64!", Some("webm"));
    assert!(!envelope.was_anonymized);
    assert_eq!(envelope.extension, "webm");
}

#[test]
fn test_invalid_base64_is_returned_unchanged() {
    let processor = processor();
    let payload = "this is not base64!";

    let envelope = processor.process_base64(payload, None);
    assert!(!envelope.was_anonymized);
    assert_eq!(envelope.clone().into_parts(), (payload.to_string(), "mp3".to_string()));

    let envelope = processor.process_base64(payload, Some("ogg"));
    assert_eq!(envelope.extension, "ogg");
    assert_eq!(envelope.audio_base64, payload);
}

// === Chunking ===

#[test]
fn test_chunk_audio_splits_wav() {
    let samples = sine_samples(250.0, 2.5, 2, 8000);
    let wav = wav_bytes(&samples, 2, 8000, Some("Test Artist"));

    let chunks = processor().chunk_audio(&wav, Some(1000), None);
    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert_eq!(&chunk[0..4], b"RIFF");
        assert!(!contains(chunk, b"Test Artist"));
    }
}

#[test]
fn test_chunk_audio_default_duration() {
    let chunks = processor().chunk_audio(&tagged_stereo_wav(), None, None);
    assert_eq!(chunks.len(), 1);
}

#[test]
fn test_chunk_audio_failure_returns_input() {
    let garbage = vec![7u8; 64];
    assert_eq!(processor().chunk_audio(&garbage, None, None), vec![garbage.clone()]);
}

// === Async ===

#[cfg(feature = "async")]
#[tokio::test]
async fn test_process_async() {
    let processor = std::sync::Arc::new(processor());
    let envelope = processor
        .process_async(tagged_stereo_wav(), Some("wav".to_string()))
        .await;
    assert!(envelope.was_anonymized);
}
