//! Practice session lifecycle
//!
//! One session is one live connection plus the microphone and speaker it
//! feeds. The lifecycle runs Idle -> Connecting -> Open -> Closing -> Idle:
//! a `PracticeSession` value *is* the Open state ([`open`](PracticeSession::open)
//! covers Connecting, [`close`](PracticeSession::close) covers Closing, and
//! Idle is the absence of a value — the coach holds `Option<PracticeSession>`
//! instead of nullable device handles). Errors take the same Closing path a
//! stop does, and every exit releases the devices and the connection.

use tokio::sync::mpsc;

use crate::audio::capture::CaptureStream;
use crate::audio::pcm::{self, EncodedFrame, PLAYBACK_SAMPLE_RATE};
use crate::audio::playback::PlaybackScheduler;
use crate::config::Config;
use crate::deck::PhonicItem;
use crate::live::{LiveConfig, LiveConnection, LiveEvent};
use crate::{Error, Result};

/// One active real-time practice session
pub struct PracticeSession {
    capture: CaptureStream,
    playback: PlaybackScheduler,
    live: LiveConnection,
    frames: mpsc::UnboundedReceiver<EncodedFrame>,
}

impl PracticeSession {
    /// Open a session for one deck item.
    ///
    /// Checks the credential, then acquires the output device, the
    /// microphone, and the live connection, in that order. The connection
    /// must be established before any frame is sent, so capture starts
    /// last. A failure at any step releases whatever was already held
    /// (device streams release on drop).
    ///
    /// # Errors
    ///
    /// `Error::Config` without a credential, `Error::Permission` if a
    /// device is unavailable, `Error::Connection` if the remote session
    /// cannot be established
    pub async fn open(config: &Config, item: &PhonicItem) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        tracing::debug!(letter = %item.letter, "session connecting");

        let playback = PlaybackScheduler::new()?;
        let mut capture = CaptureStream::new()?;

        let live = LiveConnection::connect(&LiveConfig {
            api_key,
            model: config.live_model.clone(),
            voice: config.live_voice.clone(),
            system_instruction: system_instruction(item),
        })
        .await?;

        let (frames_tx, frames) = mpsc::unbounded_channel();
        capture.start(frames_tx)?;

        tracing::info!(letter = %item.letter, "session open");
        Ok(Self {
            capture,
            playback,
            live,
            frames,
        })
    }

    /// True while the microphone is feeding the session
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.capture.is_capturing()
    }

    /// Pump capture frames out and server events in until the server ends
    /// the conversation or the stop signal fires.
    ///
    /// Frames are forwarded fire-and-forget in captured order; response
    /// audio is decoded and lined up for gapless playback against the
    /// output device's clock; an interruption drops everything scheduled.
    ///
    /// # Errors
    ///
    /// `Error::Connection` on a transport fault, `Error::Decode` on a
    /// malformed audio payload. The caller closes the session either way.
    pub async fn run(&mut self, stop: &mut mpsc::Receiver<()>) -> Result<()> {
        let input = self.live.input_sender();

        loop {
            tokio::select! {
                _ = stop.recv() => {
                    tracing::debug!("stop requested");
                    break;
                }
                Some(frame) = self.frames.recv() => {
                    input.send_realtime(frame);
                }
                event = self.live.next_event() => match event {
                    Some(LiveEvent::Audio(data)) => schedule_audio(&self.playback, &data)?,
                    Some(LiveEvent::Interrupted) => {
                        tracing::debug!("response interrupted");
                        self.playback.interrupt();
                    }
                    Some(LiveEvent::TurnComplete) => {
                        tracing::trace!("turn complete");
                    }
                    Some(LiveEvent::Closed) | None => {
                        tracing::debug!("server closed the session");
                        break;
                    }
                    Some(LiveEvent::Error(message)) => {
                        return Err(Error::Connection(message));
                    }
                },
            }
        }

        Ok(())
    }

    /// Tear everything down: stop capture, close the connection, release
    /// the output device.
    ///
    /// Best-effort and terminal — in-flight sends are not retracted, and
    /// replies arriving after this point go nowhere.
    pub fn close(mut self) {
        self.capture.stop();
        self.live.close();
        self.playback.teardown();
        tracing::info!("session closed");
    }
}

/// Decode one response payload and schedule it
fn schedule_audio(playback: &PlaybackScheduler, data: &str) -> Result<()> {
    let bytes = pcm::decode_base64(data)?;
    let chunk = pcm::decode_chunk(&bytes, PLAYBACK_SAMPLE_RATE, 1)?;
    let start = playback.enqueue(&chunk);
    tracing::trace!(frames = chunk.frames(), start, "scheduled response audio");
    Ok(())
}

/// The mascot persona prompt for one deck item
fn system_instruction(item: &PhonicItem) -> String {
    format!(
        "You are Sparky, a friendly preschool teacher dog. A child is learning \
         phonics. The current letter is '{letter}' which makes the sound \
         '{sound}'. Listen to the child and give very enthusiastic, simple \
         feedback. If they are close, cheer! If they are quiet, encourage \
         them. Use simple words like 'Yay!', 'Great job!', 'Try again buddy!'. \
         Keep responses under 5-8 words.",
        letter = item.letter,
        sound = item.sound,
    )
}
