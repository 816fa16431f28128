//! Configuration management
//!
//! Layered: built-in defaults, then the optional TOML file, then the
//! environment/flag overrides the binary applies on top.

pub mod file;

use crate::{Error, Result};

/// Default live conversation model
pub const DEFAULT_LIVE_MODEL: &str = "gemini-2.5-flash-native-audio-preview-12-2025";

/// Default one-shot TTS model
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default voice for live feedback
pub const DEFAULT_LIVE_VOICE: &str = "Zephyr";

/// Default voice for pronunciation clips
pub const DEFAULT_TTS_VOICE: &str = "Kore";

/// Coach configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential; every request path refuses to run without one
    pub api_key: Option<String>,

    /// Live conversation model id
    pub live_model: String,

    /// One-shot TTS model id
    pub tts_model: String,

    /// Prebuilt voice for live feedback
    pub live_voice: String,

    /// Prebuilt voice for pronunciation clips
    pub tts_voice: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            live_model: DEFAULT_LIVE_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            live_voice: DEFAULT_LIVE_VOICE.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the config file
    #[must_use]
    pub fn load() -> Self {
        let overlay = file::load_config_file();
        let mut config = Self::default();

        if let Some(key) = overlay.api_key {
            config.api_key = Some(key);
        }
        if let Some(model) = overlay.models.live {
            config.live_model = model;
        }
        if let Some(model) = overlay.models.tts {
            config.tts_model = model;
        }
        if let Some(voice) = overlay.voices.live {
            config.live_voice = voice;
        }
        if let Some(voice) = overlay.voices.tts {
            config.tts_voice = voice;
        }

        config
    }

    /// The selected credential
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no key has been selected — callers
    /// surface the pick-a-key message rather than retrying
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("no API key selected".to_string()))
    }
}
