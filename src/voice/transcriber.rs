//! Hosted speech-to-text over an OpenAI-compatible transcription endpoint.

use super::SpeechToText;
use crate::config::SpeechSettings;
use crate::error::{EkkoError, Result};
use crate::openai::HostedApi;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// Whisper-style transcriber.
pub struct HostedTranscriber {
    api: HostedApi,
    model: String,
    language: Option<String>,
}

impl HostedTranscriber {
    pub fn new(api: HostedApi, model: &str) -> Self {
        Self {
            api,
            model: model.to_string(),
            language: None,
        }
    }

    /// Build from speech settings.
    pub fn from_settings(api: HostedApi, settings: &SpeechSettings) -> Self {
        Self::new(api, &settings.stt_model).with_language(settings.language.clone())
    }

    /// Hint the spoken language (ISO-639-1).
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.trim().is_empty());
        self
    }
}

#[async_trait]
impl SpeechToText for HostedTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let file_bytes = tokio::fs::read(audio_path).await?;
        if file_bytes.is_empty() {
            return Err(EkkoError::UnrecognizedAudio("recording is empty".to_string()));
        }

        debug!("Transcribing {} bytes of audio", file_bytes.len());

        let mut request_builder = CreateTranscriptionRequestArgs::default();
        request_builder
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("question.wav")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json);

        if let Some(lang) = &self.language {
            request_builder.language(lang);
        }

        let request = request_builder
            .build()
            .map_err(|e| EkkoError::InvalidArgument(format!("Failed to build request: {}", e)))?;

        let response = self
            .api
            .client()
            .audio()
            .transcribe(request)
            .await
            .map_err(classify_error)?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(EkkoError::UnrecognizedAudio(
                "no speech detected in recording".to_string(),
            ));
        }

        debug!("Transcribed {} characters", text.len());
        Ok(text)
    }
}

/// Split service failures from recordings the service could not use.
///
/// Only an invalid-request error that points at the uploaded file counts
/// against the audio; auth, quota, model and server errors mean the
/// backend is unusable.
fn classify_error(error: OpenAIError) -> EkkoError {
    match error {
        OpenAIError::ApiError(api) if rejects_audio(&api) => {
            EkkoError::UnrecognizedAudio(format!("transcription failed: {}", api.message))
        }
        OpenAIError::ApiError(api) => {
            EkkoError::ModelUnavailable(format!("transcription service error: {}", api.message))
        }
        OpenAIError::Reqwest(e) => {
            EkkoError::ModelUnavailable(format!("transcription service unreachable: {}", e))
        }
        other => EkkoError::ModelUnavailable(format!("transcription service error: {}", other)),
    }
}

fn rejects_audio(api: &ApiError) -> bool {
    if api.r#type.as_deref() != Some("invalid_request_error") {
        return false;
    }
    if api.param.as_deref() == Some("file") {
        return true;
    }
    let mentions_audio = |s: &str| {
        let s = s.to_lowercase();
        ["audio", "file", "media"].iter().any(|w| s.contains(w))
    };
    mentions_audio(&api.message) || api.code.as_deref().is_some_and(mentions_audio)
}
