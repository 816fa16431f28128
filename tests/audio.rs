//! Audio pipeline integration tests
//!
//! Exercises the PCM codec and the playback timeline without requiring
//! audio hardware.

use std::io::Cursor;

use phonics_coach::Error;
use phonics_coach::audio::pcm::{
    self, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE, PlaybackChunk,
};
use phonics_coach::audio::playback::Timeline;
use phonics_coach::audio::samples_to_wav;

mod common;

use common::{response_chunk, response_chunk_secs, silence, sine_samples};

/// One PCM16 quantization step
const STEP: f32 = 1.0 / 32768.0;

#[test]
fn test_zero_frame_round_trips_to_zeros() {
    let samples = silence(0.256, CAPTURE_SAMPLE_RATE);
    assert_eq!(samples.len(), 4096);

    let frame = pcm::encode_frame(&samples);
    let bytes = pcm::decode_base64(&frame.data).unwrap();
    let decoded = pcm::bytes_to_samples(&bytes);

    assert_eq!(decoded.len(), 4096);
    assert!(decoded.iter().all(|&s| s == 0.0));
}

#[test]
fn test_codec_round_trip_within_one_step() {
    let samples = sine_samples(440.0, 0.05, 0.8, CAPTURE_SAMPLE_RATE);

    let frame = pcm::encode_frame(&samples);
    let bytes = pcm::decode_base64(&frame.data).unwrap();
    let decoded = pcm::bytes_to_samples(&bytes);

    assert_eq!(decoded.len(), samples.len());
    for (&original, &round_tripped) in samples.iter().zip(&decoded) {
        assert!(
            (original - round_tripped).abs() <= STEP + f32::EPSILON,
            "sample {original} came back as {round_tripped}"
        );
    }
}

#[test]
fn test_encode_clamps_out_of_range_input() {
    let frame = pcm::encode_frame(&[2.0, -2.0, 1.0, -1.0]);
    let bytes = pcm::decode_base64(&frame.data).unwrap();
    let decoded = pcm::bytes_to_samples(&bytes);

    assert_eq!(decoded.len(), 4);
    assert!(decoded.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    // +2.0 clamps to the same code as +1.0
    assert_eq!(decoded[0], decoded[2]);
}

#[test]
fn test_frame_declares_capture_rate() {
    let frame = pcm::encode_frame(&[0.0; 16]);
    assert_eq!(frame.mime_type, "audio/pcm;rate=16000");

    let bytes = pcm::decode_base64(&frame.data).unwrap();
    assert_eq!(bytes.len(), 32);
}

#[test]
fn test_decode_base64_rejects_garbage() {
    assert!(matches!(
        pcm::decode_base64("definitely not base64!!"),
        Err(Error::Decode(_))
    ));
}

#[test]
fn test_decode_chunk_rejects_ragged_payloads() {
    // odd byte count can't be PCM16
    assert!(matches!(
        pcm::decode_chunk(&[0, 0, 0], PLAYBACK_SAMPLE_RATE, 1),
        Err(Error::Decode(_))
    ));
    // six bytes is not a whole number of stereo frames
    assert!(matches!(
        pcm::decode_chunk(&[0; 6], PLAYBACK_SAMPLE_RATE, 2),
        Err(Error::Decode(_))
    ));
    assert!(matches!(
        pcm::decode_chunk(&[0; 4], PLAYBACK_SAMPLE_RATE, 0),
        Err(Error::Decode(_))
    ));
}

#[test]
fn test_decode_chunk_frames_and_duration() {
    let bytes = vec![0u8; 48000];
    let chunk = pcm::decode_chunk(&bytes, PLAYBACK_SAMPLE_RATE, 1).unwrap();
    assert_eq!(chunk.frames(), 24000);
    assert!((chunk.duration() - 1.0).abs() < 1e-9);

    let stereo = pcm::decode_chunk(&bytes, PLAYBACK_SAMPLE_RATE, 2).unwrap();
    assert_eq!(stereo.frames(), 12000);
    assert!((stereo.duration() - 0.5).abs() < 1e-9);
}

#[test]
fn test_timeline_chunks_play_back_to_back() {
    let mut timeline = Timeline::new();

    let first = timeline.enqueue(&response_chunk_secs(1.0));
    let second = timeline.enqueue(&response_chunk_secs(0.5));

    assert_eq!(first, 0);
    assert_eq!(second, 24000);
    assert_eq!(timeline.cursor(), 36000);
    assert_eq!(timeline.pending(), 2);
}

#[test]
fn test_timeline_starts_never_decrease_or_overlap() {
    let mut timeline = Timeline::new();
    let durations = [0.1, 0.5, 0.02, 1.0, 0.25];

    let mut previous_end = 0u64;
    for duration in durations {
        let chunk = response_chunk_secs(duration);
        let frames = chunk.frames() as u64;
        let start = timeline.enqueue(&chunk);
        assert!(start >= previous_end, "chunk started inside its predecessor");
        previous_end = start + frames;
    }
}

#[test]
fn test_timeline_late_chunk_starts_at_now() {
    let mut timeline = Timeline::new();

    timeline.enqueue(&response_chunk_secs(0.25));
    // Render half a second; the chunk ends and the clock moves past it.
    let mut buffer = vec![0.0f32; 12000];
    timeline.fill(&mut buffer, 1);

    assert!(timeline.is_idle());
    let start = timeline.enqueue(&response_chunk_secs(0.25));
    assert_eq!(start, 12000, "late chunk must start at the clock, not the stale cursor");
}

#[test]
fn test_interrupt_clears_pending_and_resets_cursor() {
    let mut timeline = Timeline::new();
    for _ in 0..3 {
        timeline.enqueue(&response_chunk_secs(0.5));
    }
    assert_eq!(timeline.pending(), 3);

    timeline.interrupt();
    assert_eq!(timeline.pending(), 0);
    assert_eq!(timeline.cursor(), timeline.clock());
}

#[test]
fn test_interrupt_on_empty_timeline_is_a_no_op() {
    let mut timeline = Timeline::new();
    timeline.interrupt();
    assert_eq!(timeline.pending(), 0);
    assert_eq!(timeline.cursor(), 0);
}

#[test]
fn test_chunk_after_interruption_starts_at_now() {
    let mut timeline = Timeline::new();
    timeline.enqueue(&response_chunk_secs(1.0));
    timeline.enqueue(&response_chunk_secs(0.5));

    // Quarter second in, the server interrupts its response.
    let mut buffer = vec![0.0f32; 6000];
    timeline.fill(&mut buffer, 1);
    timeline.interrupt();
    assert!(timeline.is_idle());

    let start = timeline.enqueue(&response_chunk_secs(0.5));
    assert_eq!(start, 6000, "resumed audio must not wait out the stale cursor");
}

#[test]
fn test_fill_renders_then_goes_silent_and_retires() {
    let mut timeline = Timeline::new();
    timeline.enqueue(&response_chunk(vec![0.5; 4]));

    let mut buffer = vec![0.0f32; 8];
    timeline.fill(&mut buffer, 1);

    assert_eq!(&buffer[..4], &[0.5; 4]);
    assert_eq!(&buffer[4..], &[0.0; 4]);
    assert!(timeline.is_idle());
    assert_eq!(timeline.clock(), 8);
}

#[test]
fn test_fill_duplicates_mono_across_device_channels() {
    let mut timeline = Timeline::new();
    timeline.enqueue(&response_chunk(vec![0.1, 0.2]));

    let mut buffer = vec![0.0f32; 8];
    timeline.fill(&mut buffer, 2);

    assert_eq!(&buffer[..4], &[0.1, 0.1, 0.2, 0.2]);
    assert_eq!(&buffer[4..], &[0.0; 4]);
}

#[test]
fn test_stereo_chunk_downmixes_for_scheduling() {
    let chunk = PlaybackChunk {
        samples: vec![0.2, 0.4, -0.2, -0.4],
        sample_rate: PLAYBACK_SAMPLE_RATE,
        channels: 2,
    };

    let mut timeline = Timeline::new();
    timeline.enqueue(&chunk);
    assert_eq!(timeline.cursor(), 2, "two stereo frames occupy two timeline frames");

    let mut buffer = vec![0.0f32; 2];
    timeline.fill(&mut buffer, 1);
    assert!((buffer[0] - 0.3).abs() < 1e-6);
    assert!((buffer[1] + 0.3).abs() < 1e-6);
}

#[test]
fn test_enqueue_while_playing_stays_gapless() {
    let mut timeline = Timeline::new();
    timeline.enqueue(&response_chunk_secs(0.5));

    // Partway through the first chunk, the next one arrives.
    let mut buffer = vec![0.0f32; 6000];
    timeline.fill(&mut buffer, 1);
    let start = timeline.enqueue(&response_chunk_secs(0.5));

    assert_eq!(start, 12000, "prompt delivery must butt onto the previous chunk");
}

#[test]
fn test_samples_to_wav_header() {
    let samples = sine_samples(440.0, 0.1, 0.5, CAPTURE_SAMPLE_RATE);
    let wav = samples_to_wav(&samples, CAPTURE_SAMPLE_RATE).unwrap();

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert!(wav.len() > 44);
}

#[test]
fn test_wav_round_trip() {
    let original: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav = samples_to_wav(&original, CAPTURE_SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, CAPTURE_SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original.len());
}
