//! One-shot pronunciation synthesis
//!
//! The hear-sound flow: a single non-streaming `generateContent` request
//! with an AUDIO response modality, decoded and played immediately. There
//! is no stream to coordinate with, so no scheduler queue is involved.

use serde::{Deserialize, Serialize};

use crate::deck::PhonicItem;
use crate::live::types::{Content, GenerationConfig};
use crate::{Error, Result, audio::pcm};

/// Host serving the one-shot models API
const SYNTH_HOST: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fetches single synthesized clips
pub struct Synthesizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// First inline audio payload in the response, if any
    fn audio_payload(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref().map(|blob| blob.data.as_str()))
    }
}

impl Synthesizer {
    /// Create a synthesizer for the given credential, model, and voice
    #[must_use]
    pub fn new(api_key: String, model: String, voice: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            voice,
        }
    }

    /// The pronunciation prompt for one deck item
    #[must_use]
    pub fn pronunciation_prompt(item: &PhonicItem) -> String {
        format!(
            "The child is learning the letter {letter}. Say the phonic sound for \
             {letter} clearly. For example, '{sound}'. Then say the word '{word}'. \
             Keep it short and sweet for a toddler.",
            letter = item.letter,
            sound = item.sound,
            word = item.word,
        )
    }

    /// Fetch a single synthesized clip for the prompt.
    ///
    /// Returns raw PCM16 bytes at the response rate.
    ///
    /// # Errors
    ///
    /// `Error::ModelUnavailable` if the voice model is not provisioned for
    /// the credential (the caller should prompt re-selection),
    /// `Error::Synthesis` if the request fails or the response carries no
    /// audio payload
    pub async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>> {
        let request = GenerateRequest {
            contents: vec![Content::text(prompt)],
            generation_config: GenerationConfig::audio_with_voice(&self.voice),
        };

        let url = format!("{SYNTH_HOST}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND
                || body.contains("Requested entity was not found")
            {
                return Err(Error::ModelUnavailable(format!(
                    "voice model rejected {status}: {body}"
                )));
            }
            return Err(Error::Synthesis(format!("synthesis failed {status}: {body}")));
        }

        let reply: GenerateResponse = response.json().await?;
        let Some(data) = reply.audio_payload() else {
            return Err(Error::Synthesis("no audio payload in response".to_string()));
        };

        pcm::decode_base64(data)
    }
}
