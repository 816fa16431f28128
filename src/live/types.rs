//! Wire types for the live streaming protocol
//!
//! Serde mappings for the subset of the `BidiGenerateContent` WebSocket
//! protocol the session consumes: client setup and realtime input, server
//! content carrying inline audio, interruption, and turn boundaries. The
//! one-shot synthesis request reuses the shared content types.

use serde::{Deserialize, Serialize};

use crate::audio::pcm::EncodedFrame;

/// First client message on a new connection
#[derive(Debug, Serialize)]
pub struct SetupMessage {
    pub setup: Setup,
}

/// Session parameters sent before any audio flows
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    /// Fully-qualified model name, e.g. `models/...`
    pub model: String,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

/// Response modality and voice selection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

impl GenerationConfig {
    /// Audio-only response with the given prebuilt voice
    #[must_use]
    pub fn audio_with_voice(voice: &str) -> Self {
        Self {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.to_string(),
                    },
                },
            }),
        }
    }
}

/// A list of content parts (prompt text or inline audio)
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    /// Single text part
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

/// One content part
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<EncodedFrame>,
}

/// Streaming microphone frames
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInputMessage {
    pub realtime_input: RealtimeInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInput {
    pub media_chunks: Vec<EncodedFrame>,
}

impl RealtimeInputMessage {
    /// Wrap one capture frame for transmission
    #[must_use]
    pub fn chunk(frame: EncodedFrame) -> Self {
        Self {
            realtime_input: RealtimeInput {
                media_chunks: vec![frame],
            },
        }
    }
}

/// Any message the server may send
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerMessage {
    pub setup_complete: Option<SetupComplete>,
    pub server_content: Option<ServerContent>,
}

/// Setup acknowledgement; the connection is open once this arrives
#[derive(Debug, Default, Deserialize)]
pub struct SetupComplete {}

/// Model output plus stream control flags
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerContent {
    pub model_turn: Option<Content>,
    pub interrupted: Option<bool>,
    pub turn_complete: Option<bool>,
}

impl ServerContent {
    /// Inline audio payload, if this message carries one
    #[must_use]
    pub fn audio_data(&self) -> Option<&str> {
        self.model_turn
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref().map(|blob| blob.data.as_str()))
    }
}
