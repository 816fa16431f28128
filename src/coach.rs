//! The coach: presentation-facing surface
//!
//! What the (external) presentation layer calls: hear-sound, practice
//! start/stop, deck navigation, and the observable status it renders.
//! Every taxonomy error is absorbed here into a status message and a safe
//! return to idle — nothing below this line reaches the caller as an error,
//! and nothing retries on its own; the child taps the button again.

use tokio::sync::mpsc;

use crate::audio::pcm::{self, PLAYBACK_SAMPLE_RATE};
use crate::audio::playback::PlaybackScheduler;
use crate::config::Config;
use crate::deck::{DECK, PhonicItem};
use crate::session::PracticeSession;
use crate::synthesis::Synthesizer;
use crate::{Error, Result};

const GREETING: &str = "Hi! I'm Sparky. Let's learn sounds together!";
const FINISHED: &str = "Good job! You did great! Want to try another letter?";

/// Observable coach state for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachStatus {
    /// A practice session is open
    pub is_practicing: bool,
    /// The microphone is live
    pub is_listening: bool,
    /// What the mascot is currently saying
    pub message: String,
}

/// One deck cursor plus at most one open practice session
pub struct PhonicsCoach {
    config: Config,
    index: usize,
    session: Option<PracticeSession>,
    message: String,
}

impl PhonicsCoach {
    /// Create an idle coach on the first card
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: 0,
            session: None,
            message: GREETING.to_string(),
        }
    }

    /// Item currently on the card
    #[must_use]
    pub fn current(&self) -> &'static PhonicItem {
        &DECK[self.index]
    }

    /// Observable state snapshot
    #[must_use]
    pub fn status(&self) -> CoachStatus {
        CoachStatus {
            is_practicing: self.session.is_some(),
            is_listening: self
                .session
                .as_ref()
                .is_some_and(PracticeSession::is_listening),
            message: self.message.clone(),
        }
    }

    /// Speak the current letter's pronunciation once.
    ///
    /// Failures become status messages; the card stays usable.
    pub async fn hear_sound(&mut self) {
        let item = self.current();
        match self.hear_sound_inner(item).await {
            Ok(()) => {
                self.message = format!("Listen carefully to the sound of {}!", item.letter);
            }
            Err(e) => {
                tracing::error!(error = %e, letter = %item.letter, "hear-sound failed");
                self.message = status_message(&e);
            }
        }
    }

    async fn hear_sound_inner(&self, item: &PhonicItem) -> Result<()> {
        let api_key = self.config.require_api_key()?.to_string();

        let synthesizer = Synthesizer::new(
            api_key,
            self.config.tts_model.clone(),
            self.config.tts_voice.clone(),
        );
        let clip = synthesizer
            .synthesize(&Synthesizer::pronunciation_prompt(item))
            .await?;
        let chunk = pcm::decode_chunk(&clip, PLAYBACK_SAMPLE_RATE, 1)?;

        // A fresh output handle per clip, released when the clip ends.
        let mut playback = PlaybackScheduler::new()?;
        playback.play_once(&chunk).await;
        playback.teardown();
        Ok(())
    }

    /// Open a practice session for the current letter.
    ///
    /// Any session already open is fully torn down first, so the
    /// microphone and output device are never held twice. Returns whether
    /// the session reached open.
    pub async fn start_practice(&mut self) -> bool {
        self.stop_session();

        let item = self.current();
        match PracticeSession::open(&self.config, item).await {
            Ok(session) => {
                self.session = Some(session);
                self.message = format!(
                    "Sparky is listening! Say '{}' like in '{}'...",
                    item.sound, item.word
                );
                true
            }
            Err(e) => {
                tracing::error!(error = %e, letter = %item.letter, "practice failed to open");
                self.message = status_message(&e);
                false
            }
        }
    }

    /// Drive the open session until the server ends it or `stop` fires,
    /// then tear it down. No-op when idle.
    pub async fn run_practice(&mut self, stop: &mut mpsc::Receiver<()>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Err(e) = session.run(stop).await {
            tracing::error!(error = %e, "practice session error");
            self.stop_session();
            self.message = status_message(&e);
            return;
        }
        self.stop_practice();
    }

    /// Stop practicing. Safe to call when idle: no state changes, no
    /// double release.
    pub fn stop_practice(&mut self) {
        if self.stop_session() {
            self.message = FINISHED.to_string();
        }
    }

    /// Move to the next letter, stopping any active practice first
    pub fn next_letter(&mut self) {
        self.stop_practice();
        self.index = (self.index + 1) % DECK.len();
    }

    /// Move to the previous letter, stopping any active practice first
    pub fn prev_letter(&mut self) {
        self.stop_practice();
        self.index = (self.index + DECK.len() - 1) % DECK.len();
    }

    /// Jump to a deck position, stopping any active practice first.
    /// Out-of-range positions are ignored.
    pub fn select(&mut self, index: usize) {
        if index < DECK.len() {
            self.stop_practice();
            self.index = index;
        }
    }

    /// Tear down the session if one is open; true if one was
    fn stop_session(&mut self) -> bool {
        if let Some(session) = self.session.take() {
            session.close();
            true
        } else {
            false
        }
    }
}

/// The line the mascot shows for a failure
#[must_use]
pub fn status_message(error: &Error) -> String {
    match error {
        Error::Permission(_) | Error::Audio(_) => {
            "Oops! My ears are sleepy. Please check your mic!".to_string()
        }
        Error::ModelUnavailable(_) => {
            "I couldn't find my voice model. Please try selecting your API key again!".to_string()
        }
        Error::Config(_) => {
            "Sparky needs an API key first. Set GEMINI_API_KEY and try again!".to_string()
        }
        Error::Connection(_) => "Oops! Sparky lost the connection. Let's try again!".to_string(),
        _ => "Oh no! Sparky's voice is missing. Let's try again!".to_string(),
    }
}
