//! PCM16 wire framing
//!
//! The speech APIs exchange audio as base64-encoded little-endian PCM16.
//! This module converts between f32 sample buffers and that framing, and
//! decodes received payloads into playable chunks.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sample rate for microphone capture (16kHz for speech input)
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// Sample rate of synthesized response audio
pub const PLAYBACK_SAMPLE_RATE: u32 = 24_000;

/// A transmittable audio frame: base64 PCM16 plus its declared format.
///
/// Matches the wire `Blob` shape, so it serializes directly into protocol
/// messages. Transient, exists only in transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFrame {
    /// Format tag, e.g. `audio/pcm;rate=16000`
    pub mime_type: String,
    /// Base64-encoded little-endian PCM16 samples
    pub data: String,
}

/// A decoded audio buffer ready for scheduling
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackChunk {
    /// Samples in [-1, 1], channel-interleaved when `channels > 1`
    pub samples: Vec<f32>,
    /// Rate the chunk was synthesized at
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
}

impl PlaybackChunk {
    /// Number of frames (samples per channel)
    #[must_use]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Playback duration in seconds
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Encode f32 samples into a transmittable capture frame.
///
/// Out-of-range samples clamp to the PCM16 range rather than failing.
#[must_use]
pub fn encode_frame(samples: &[f32]) -> EncodedFrame {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let value = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    EncodedFrame {
        mime_type: format!("audio/pcm;rate={CAPTURE_SAMPLE_RATE}"),
        data: BASE64.encode(&bytes),
    }
}

/// Unwrap the base64 framing of a received payload
///
/// # Errors
///
/// Returns `Error::Decode` if the payload is not valid base64
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Unpack little-endian PCM16 bytes into f32 samples
///
/// A trailing odd byte is ignored at this level; `decode_chunk` rejects it.
#[must_use]
pub fn bytes_to_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect()
}

/// Decode raw PCM16 bytes into a playable chunk
///
/// # Errors
///
/// Returns `Error::Decode` if the byte length is not a whole number of
/// `channels`-wide PCM16 frames, or if `channels` is zero
pub fn decode_chunk(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<PlaybackChunk> {
    if channels == 0 {
        return Err(Error::Decode("zero channel count".to_string()));
    }

    let frame_bytes = 2 * channels as usize;
    if bytes.len() % frame_bytes != 0 {
        return Err(Error::Decode(format!(
            "{} bytes is not a whole number of {channels}-channel PCM16 frames",
            bytes.len()
        )));
    }

    Ok(PlaybackChunk {
        samples: bytes_to_samples(bytes),
        sample_rate,
        channels,
    })
}
