//! Shared test utilities

use phonics_coach::audio::pcm::{PLAYBACK_SAMPLE_RATE, PlaybackChunk};

/// Generate sine wave audio samples
#[must_use]
pub fn sine_samples(frequency: f32, duration_secs: f32, amplitude: f32, sample_rate: u32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
#[must_use]
pub fn silence(duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

/// Mono chunk at the response sample rate
#[must_use]
pub fn response_chunk(samples: Vec<f32>) -> PlaybackChunk {
    PlaybackChunk {
        samples,
        sample_rate: PLAYBACK_SAMPLE_RATE,
        channels: 1,
    }
}

/// Mono chunk of silence with the given duration at the response rate
#[must_use]
pub fn response_chunk_secs(duration_secs: f32) -> PlaybackChunk {
    response_chunk(silence(duration_secs, PLAYBACK_SAMPLE_RATE))
}
