//! Unreal Speech provider (speech only).

use super::{file_stem, SpeechSynthesizer};
use crate::config::SpeechSettings;
use crate::error::{ChalktalkError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Unreal Speech streaming endpoint; returns MP3 bytes directly.
pub const UNREAL_STREAM_URL: &str = "https://api.v8.unrealspeech.com/stream";

/// Unreal Speech TTS client.
pub struct UnrealSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    bitrate: String,
}

impl UnrealSpeech {
    pub fn new(api_key: String, settings: &SpeechSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ChalktalkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            voice: settings.unreal_voice.clone(),
            bitrate: settings.unreal_bitrate.clone(),
        })
    }

    fn build_body(&self, text: &str) -> serde_json::Value {
        json!({
            "Text": text,
            "VoiceId": self.voice,
            "Bitrate": self.bitrate,
            "Speed": "0",
            "Pitch": "1",
            "Codec": "libmp3lame",
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for UnrealSpeech {
    #[instrument(skip(self, text, audio_dir), fields(voice = %self.voice))]
    async fn synthesize_speech(&self, text: &str, audio_dir: &Path) -> Result<PathBuf> {
        let response = self
            .client
            .post(UNREAL_STREAM_URL)
            .bearer_auth(&self.api_key)
            .json(&self.build_body(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChalktalkError::Speech(format!("Unreal Speech error ({}): {}", status, body)));
        }

        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(audio_dir).await?;
        let path = audio_dir.join(format!("{}_{}.mp3", file_stem(text), uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    async fn synthesize_avatar(&self, _text: &str, _video_dir: &Path) -> Result<PathBuf> {
        Err(ChalktalkError::Avatar(
            "Unreal Speech does not support avatar video; use the azure provider".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "unreal"
    }
}
