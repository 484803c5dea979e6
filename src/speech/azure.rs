//! Azure Speech Service provider.
//!
//! Speech uses the synchronous REST endpoint with an SSML body. Avatar video
//! uses the batch synthesis API: submit a job, poll its status, download
//! the result.

use super::{escape_ssml, file_stem, SpeechSynthesizer};
use crate::config::{AvatarSettings, SpeechSettings};
use crate::error::{ChalktalkError, Result};
use crate::workspace::short_id;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Azure neural TTS and talking-avatar client.
pub struct AzureSpeech {
    client: reqwest::Client,
    subscription_key: String,
    speech: SpeechSettings,
    avatar: AvatarSettings,
}

/// Status document of an avatar batch synthesis job.
#[derive(Debug, Deserialize)]
struct AvatarJob {
    status: String,
    #[serde(default)]
    outputs: Option<AvatarOutputs>,
}

#[derive(Debug, Deserialize)]
struct AvatarOutputs {
    result: Option<String>,
}

impl AzureSpeech {
    pub fn new(subscription_key: String, speech: SpeechSettings, avatar: AvatarSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(speech.user_agent.clone())
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| ChalktalkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            subscription_key,
            speech,
            avatar,
        })
    }

    fn tts_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.speech.region
        )
    }

    fn avatar_job_url(&self, job_id: &str) -> String {
        format!(
            "https://{}.api.cognitive.microsoft.com/avatar/batchsyntheses/{}?api-version={}",
            self.speech.region, job_id, self.avatar.api_version
        )
    }

    /// SSML document for a single line of narration.
    pub fn build_ssml(&self, text: &str) -> String {
        format!(
            r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="http://www.w3.org/2001/mstts" xml:lang="en-US"><voice name="{}">{}</voice></speak>"#,
            self.speech.voice,
            escape_ssml(text)
        )
    }

    /// JSON body of an avatar batch synthesis job.
    pub fn build_avatar_payload(&self, text: &str) -> serde_json::Value {
        json!({
            "inputKind": "PlainText",
            "inputs": [{ "content": text }],
            "synthesisConfig": { "voice": self.speech.voice },
            "avatarConfig": {
                "talkingAvatarCharacter": self.avatar.character,
                "talkingAvatarStyle": self.avatar.style,
                "videoFormat": "Mp4",
                "videoCodec": self.avatar.video_codec,
                "bitrateKbps": self.avatar.bitrate_kbps,
                "backgroundColor": self.avatar.background_color,
            }
        })
    }

    /// Poll a submitted job until it succeeds, returning the video URL.
    async fn wait_for_avatar(&self, job_id: &str) -> Result<String> {
        let interval = Duration::from_secs(self.avatar.poll_interval_seconds.max(1));
        let deadline = Instant::now() + Duration::from_secs(self.avatar.poll_timeout_seconds);

        loop {
            tokio::time::sleep(interval).await;

            let response = self
                .client
                .get(self.avatar_job_url(job_id))
                .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(ChalktalkError::Avatar(format!(
                    "Status check for {} failed ({}): {}",
                    job_id, status, body
                )));
            }

            let job: AvatarJob = response.json().await?;
            match job.status.as_str() {
                "Succeeded" => {
                    return job
                        .outputs
                        .and_then(|o| o.result)
                        .ok_or_else(|| {
                            ChalktalkError::Avatar(format!("Job {} succeeded without a result URL", job_id))
                        });
                }
                "Failed" => {
                    return Err(ChalktalkError::Avatar(format!("Synthesis failed for job {}", job_id)));
                }
                other => debug!("Job {} status: {}", job_id, other),
            }

            if Instant::now() >= deadline {
                return Err(ChalktalkError::Avatar(format!(
                    "Job {} still running after {}s",
                    job_id, self.avatar.poll_timeout_seconds
                )));
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeech {
    #[instrument(skip(self, text, audio_dir), fields(chars = text.len()))]
    async fn synthesize_speech(&self, text: &str, audio_dir: &Path) -> Result<PathBuf> {
        let response = self
            .client
            .post(self.tts_url())
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", &self.speech.output_format)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .body(self.build_ssml(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChalktalkError::Speech(format!("Azure TTS error ({}): {}", status, body)));
        }

        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(audio_dir).await?;
        let path = audio_dir.join(format!("{}_{}.mp3", file_stem(text), uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    #[instrument(skip(self, text, video_dir))]
    async fn synthesize_avatar(&self, text: &str, video_dir: &Path) -> Result<PathBuf> {
        let job_id = format!("job-{}-{}", chrono::Local::now().format("%Y%m%d%H%M%S"), short_id());

        let response = self
            .client
            .put(self.avatar_job_url(&job_id))
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .json(&self.build_avatar_payload(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChalktalkError::Avatar(format!(
                "Job submission failed ({}): {}",
                status, body
            )));
        }

        info!("Submitted avatar job {}", job_id);
        let video_url = self.wait_for_avatar(&job_id).await?;
        info!("Avatar job {} ready", job_id);

        let video = self.client.get(&video_url).send().await?.error_for_status()?;
        let bytes = video.bytes().await?;

        tokio::fs::create_dir_all(video_dir).await?;
        let path = video_dir.join(format!("{}.mp4", job_id));
        tokio::fs::write(&path, &bytes).await?;

        Ok(path)
    }

    fn name(&self) -> &str {
        "azure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speech() -> AzureSpeech {
        AzureSpeech::new(
            "test-key".to_string(),
            SpeechSettings::default(),
            AvatarSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let azure = speech();
        assert_eq!(
            azure.tts_url(),
            "https://westus2.tts.speech.microsoft.com/cognitiveservices/v1"
        );
        assert_eq!(
            azure.avatar_job_url("job-1"),
            "https://westus2.api.cognitive.microsoft.com/avatar/batchsyntheses/job-1?api-version=2024-08-01"
        );
    }

    #[test]
    fn test_ssml_escapes_text() {
        let ssml = speech().build_ssml("Tom & Jerry <3");
        assert!(ssml.contains(r#"<voice name="en-US-AndrewMultilingualNeural">Tom &amp; Jerry &lt;3</voice>"#));
        assert!(ssml.starts_with("<speak version=\"1.0\""));
    }

    #[test]
    fn test_avatar_payload() {
        let payload = speech().build_avatar_payload("Welcome");
        assert_eq!(payload["inputKind"], "PlainText");
        assert_eq!(payload["inputs"][0]["content"], "Welcome");
        assert_eq!(payload["avatarConfig"]["talkingAvatarCharacter"], "harry");
        assert_eq!(payload["avatarConfig"]["bitrateKbps"], 900);
        assert_eq!(payload["avatarConfig"]["backgroundColor"], "#191919FF");
    }

    #[test]
    fn test_job_status_parsing() {
        let done: AvatarJob = serde_json::from_str(
            r#"{"id": "job-1", "status": "Succeeded", "outputs": {"result": "https://x/video.mp4"}}"#,
        )
        .unwrap();
        assert_eq!(done.status, "Succeeded");
        assert_eq!(done.outputs.unwrap().result.unwrap(), "https://x/video.mp4");

        let running: AvatarJob = serde_json::from_str(r#"{"status": "Running"}"#).unwrap();
        assert!(running.outputs.is_none());
    }
}
