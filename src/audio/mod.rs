//! Audio processing module
//!
//! PCM16 wire framing, microphone capture, and scheduled playback.
//! The live session and one-shot synthesis flows both build on these pieces.

pub mod capture;
pub mod pcm;
pub mod playback;

pub use capture::{CaptureStream, FRAME_SAMPLES, samples_to_wav};
pub use pcm::{CAPTURE_SAMPLE_RATE, EncodedFrame, PLAYBACK_SAMPLE_RATE, PlaybackChunk};
pub use playback::{PlaybackScheduler, Timeline};
