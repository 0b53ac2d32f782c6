//! Hosted text-to-speech over an OpenAI-compatible `audio/speech` endpoint.

use super::{SynthesizedAudio, TextToSpeech};
use crate::config::SpeechSettings;
use crate::error::{EkkoError, Result};
use crate::openai::HostedApi;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Speech synthesizer using the configured hosted voice.
pub struct HostedSynthesizer {
    api: HostedApi,
    model: String,
    voice: String,
    response_format: String,
}

impl HostedSynthesizer {
    pub fn new(api: HostedApi, model: &str, voice: &str, response_format: &str) -> Self {
        Self {
            api,
            model: model.to_string(),
            voice: voice.to_string(),
            response_format: response_format.to_lowercase(),
        }
    }

    /// Build from speech settings.
    pub fn from_settings(api: HostedApi, settings: &SpeechSettings) -> Self {
        Self::new(
            api,
            &settings.tts_model,
            &settings.voice,
            &settings.response_format,
        )
    }

    fn request<'a>(&'a self, text: &'a str) -> SpeechRequest<'a> {
        SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: &self.response_format,
        }
    }
}

#[async_trait]
impl TextToSpeech for HostedSynthesizer {
    #[instrument(skip(self, text), fields(chars = text.len(), voice = %self.voice))]
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio> {
        if text.trim().is_empty() {
            return Err(EkkoError::InvalidArgument(
                "nothing to synthesize".to_string(),
            ));
        }

        let response = self
            .api
            .http()
            .post(self.api.endpoint("audio/speech"))
            .bearer_auth(self.api.api_key())
            .json(&self.request(text))
            .send()
            .await
            .map_err(|e| EkkoError::ModelUnavailable(format!("speech service unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EkkoError::ModelUnavailable(format!(
                "speech synthesis failed ({}): {}",
                status, body
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            EkkoError::ModelUnavailable(format!("speech service response interrupted: {}", e))
        })?;
        debug!("Synthesized {} bytes of {}", bytes.len(), self.response_format);

        Ok(SynthesizedAudio {
            bytes: bytes.to_vec(),
            format: self.response_format.clone(),
        })
    }
}
