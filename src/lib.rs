//! Phonics Coach - real-time voice practice core for young readers
//!
//! This library provides the audio core behind a children's phonics tutor:
//! - PCM16 wire framing for microphone and response audio
//! - gapless playback scheduling with server-driven interruption
//! - microphone capture with fixed-size framing
//! - the live streaming session lifecycle
//! - one-shot pronunciation synthesis
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               Presentation (external)                │
//! │   hear_sound │ start/stop practice │ status          │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  PhonicsCoach                        │
//! │   Deck  │  PracticeSession  │  Synthesizer          │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │  Capture ── PCM codec ── Live socket ── Timeline    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod audio;
pub mod coach;
pub mod config;
pub mod deck;
pub mod error;
pub mod live;
pub mod session;
pub mod synthesis;

pub use coach::{CoachStatus, PhonicsCoach};
pub use config::Config;
pub use error::{Error, Result};
