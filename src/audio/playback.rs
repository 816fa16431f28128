//! Scheduled audio playback
//!
//! Response audio arrives as a stream of short chunks. The [`Timeline`]
//! lines them up on the output device's frame clock so they play
//! back-to-back, and drops everything still pending when the server
//! interrupts its own response. [`PlaybackScheduler`] owns the output
//! device and renders the timeline from its callback.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream};

use crate::audio::pcm::{PLAYBACK_SAMPLE_RATE, PlaybackChunk};
use crate::{Error, Result};

/// A chunk scheduled on the timeline
#[derive(Debug)]
struct Scheduled {
    /// Device frame at which playback starts
    start: u64,
    /// Mono samples to render
    frames: Vec<f32>,
}

impl Scheduled {
    fn end(&self) -> u64 {
        self.start + self.frames.len() as u64
    }
}

/// Time-ordered playback queue over the output device's frame clock.
///
/// Invariants: scheduled start frames are non-decreasing, chunks never
/// overlap, and a chunk enqueued while the cursor is still ahead of the
/// clock begins exactly where its predecessor ends.
#[derive(Debug, Default)]
pub struct Timeline {
    /// Device frames rendered so far ("now")
    clock: u64,
    /// Next free start frame
    cursor: u64,
    /// Scheduled chunks that have not finished
    pending: Vec<Scheduled>,
}

impl Timeline {
    /// Create an empty timeline at frame zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a chunk at the cursor, or immediately if the cursor has
    /// fallen behind the device clock. Returns the assigned start frame.
    ///
    /// Multichannel chunks are downmixed to mono; the renderer fans the
    /// mono signal back out to every device channel.
    pub fn enqueue(&mut self, chunk: &PlaybackChunk) -> u64 {
        let frames = downmix(chunk);
        let start = self.cursor.max(self.clock);
        self.cursor = start + frames.len() as u64;
        self.pending.push(Scheduled { start, frames });
        start
    }

    /// Drop every pending chunk, even mid-playback, and reset the cursor
    /// to now. Audio received afterwards starts immediately.
    pub fn interrupt(&mut self) {
        self.pending.clear();
        self.cursor = self.clock;
    }

    /// Render the next output buffer and advance the clock.
    ///
    /// Scheduled mono samples are written to every device channel; frames
    /// with nothing due render silence. Chunks whose end has passed are
    /// retired from the pending set.
    pub fn fill(&mut self, buffer: &mut [f32], channels: usize) {
        for frame in buffer.chunks_mut(channels) {
            let mut value = 0.0;
            for chunk in &self.pending {
                if self.clock >= chunk.start {
                    #[allow(clippy::cast_possible_truncation)]
                    let offset = (self.clock - chunk.start) as usize;
                    if let Some(&sample) = chunk.frames.get(offset) {
                        value += sample;
                    }
                }
            }
            for out in frame.iter_mut() {
                *out = value;
            }
            self.clock += 1;
        }

        let clock = self.clock;
        self.pending.retain(|chunk| clock < chunk.end());
    }

    /// Number of scheduled-but-unfinished chunks
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is scheduled
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Device frames rendered so far
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Next free start frame
    #[must_use]
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }
}

/// Collapse a chunk to mono frames, averaging interleaved channels
#[allow(clippy::cast_precision_loss)]
fn downmix(chunk: &PlaybackChunk) -> Vec<f32> {
    if chunk.channels <= 1 {
        return chunk.samples.clone();
    }

    let channels = chunk.channels as usize;
    chunk
        .samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Plays scheduled audio on the default output device
pub struct PlaybackScheduler {
    timeline: Arc<Mutex<Timeline>>,
    stream: Option<Stream>,
}

impl PlaybackScheduler {
    /// Open the default output device at the response sample rate and start
    /// rendering the timeline. Mono is preferred, stereo is the fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Permission` if no output device is available or none
    /// supports the response rate
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Permission("no output device available".to_string()))?;

        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Permission(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .or_else(|| {
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Permission("no suitable output config found".to_string()))?;

        let config = supported
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();
        let channels = config.channels as usize;

        let timeline = Arc::new(Mutex::new(Timeline::new()));
        let shared = Arc::clone(&timeline);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut timeline) = shared.lock() {
                        timeline.fill(data, channels);
                    } else {
                        data.fill(0.0);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio playback error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self {
            timeline,
            stream: Some(stream),
        })
    }

    /// Schedule a chunk for gapless playback; returns its start frame
    #[must_use]
    pub fn enqueue(&self, chunk: &PlaybackChunk) -> u64 {
        if chunk.sample_rate != PLAYBACK_SAMPLE_RATE {
            tracing::warn!(
                rate = chunk.sample_rate,
                expected = PLAYBACK_SAMPLE_RATE,
                "chunk rate differs from device rate, playback will drift"
            );
        }
        self.timeline
            .lock()
            .map_or(0, |mut timeline| timeline.enqueue(chunk))
    }

    /// Stop everything scheduled, including mid-playback chunks
    pub fn interrupt(&self) {
        if let Ok(mut timeline) = self.timeline.lock() {
            timeline.interrupt();
        }
    }

    /// True when nothing is scheduled
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timeline.lock().is_ok_and(|timeline| timeline.is_idle())
    }

    /// Play a single clip and wait for it to finish.
    ///
    /// Polls for completion with a timeout slightly past the clip's
    /// duration, then lets the device drain its last buffer.
    pub async fn play_once(&self, chunk: &PlaybackChunk) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let duration_ms = (chunk.duration() * 1000.0) as u64;
        let _ = self.enqueue(chunk);

        let deadline = tokio::time::Instant::now() + Duration::from_millis(duration_ms + 500);
        while !self.is_idle() {
            if tokio::time::Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;

        tracing::debug!(duration_ms, "playback complete");
    }

    /// Interrupt everything and release the output device
    pub fn teardown(&mut self) {
        self.interrupt();
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("playback device released");
        }
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}
