//! Voice input and output.
//!
//! Speech-to-text turns a recorded question into a query string; text-to-speech
//! renders the answer as audio. Both are hosted services behind narrow traits.

mod synthesizer;
mod temp;
mod transcriber;

pub use synthesizer::HostedSynthesizer;
pub use temp::TempAudioFile;
pub use transcriber::HostedTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for speech-to-text services.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a recorded audio file.
    ///
    /// Fails with `UnrecognizedAudio` when no usable transcript comes back.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// Trait for text-to-speech services.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Render text as playable audio.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio>;
}

/// Audio produced by a text-to-speech service.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    /// Encoded audio.
    pub bytes: Vec<u8>,
    /// Container format, e.g. `wav` or `mp3`.
    pub format: String,
}

impl SynthesizedAudio {
    /// Write the audio to `path`, creating parent directories.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }

    /// File extension matching the format.
    pub fn extension(&self) -> &str {
        &self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replies").join("answer.wav");

        let audio = SynthesizedAudio {
            bytes: b"RIFF....WAVE".to_vec(),
            format: "wav".to_string(),
        };
        audio.save(&path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVE");
        assert_eq!(audio.extension(), "wav");
    }
}
