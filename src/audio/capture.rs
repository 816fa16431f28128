//! Microphone capture and framing
//!
//! Opens the default input device at 16kHz mono and taps fixed-size frames
//! off the device callback. Each complete frame is PCM16-encoded and handed
//! to the outbound channel without waiting on the network.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use tokio::sync::mpsc;

use crate::audio::pcm::{self, CAPTURE_SAMPLE_RATE, EncodedFrame};
use crate::{Error, Result};

/// Samples per transmitted frame (256ms at 16kHz)
pub const FRAME_SAMPLES: usize = 4096;

/// Captures audio from the default input device
pub struct CaptureStream {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl CaptureStream {
    /// Open the default input device at the capture rate
    ///
    /// # Errors
    ///
    /// Returns `Error::Permission` if no input device is available or none
    /// supports 16kHz mono
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Permission("no microphone available".to_string()))?;

        let supported = device
            .supported_input_configs()
            .map_err(|e| Error::Permission(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(CAPTURE_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(CAPTURE_SAMPLE_RATE)
            })
            .ok_or_else(|| {
                Error::Permission("microphone does not support 16kHz mono".to_string())
            })?;

        let config = supported
            .with_sample_rate(SampleRate(CAPTURE_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = CAPTURE_SAMPLE_RATE,
            channels = config.channels,
            "microphone opened"
        );

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    /// Start capturing, emitting one encoded frame per [`FRAME_SAMPLES`]
    /// samples the device delivers. Frames keep device-delivery order.
    ///
    /// Sends are fire-and-forget: a closed receiver drops the frame instead
    /// of stalling the audio thread.
    ///
    /// # Errors
    ///
    /// Returns `Error::Permission` if the device refuses the stream
    pub fn start(&mut self, tx: mpsc::UnboundedSender<EncodedFrame>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let config = self.config.clone();
        let mut tap: Vec<f32> = Vec::with_capacity(FRAME_SAMPLES);

        let stream = self
            .device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    tap.extend_from_slice(data);
                    while tap.len() >= FRAME_SAMPLES {
                        let frame: Vec<f32> = tap.drain(..FRAME_SAMPLES).collect();
                        let _ = tx.send(pcm::encode_frame(&frame));
                    }
                },
                |err| {
                    tracing::error!(error = %err, "microphone capture error");
                },
                None,
            )
            .map_err(|e| Error::Permission(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("capture started");
        Ok(())
    }

    /// Stop capturing and release the stream; safe to call when not started
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            tracing::debug!("capture stopped");
        }
    }

    /// True while the input stream is open
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for CaptureStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Convert f32 samples to WAV bytes (diagnostics, `test-mic`)
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
