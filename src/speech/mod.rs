//! Speech and avatar synthesis.
//!
//! This module defines the synthesizer seam and provides:
//! - Azure Speech Service (neural TTS and batch talking-avatar video)
//! - Unreal Speech (TTS only)

mod azure;
mod unreal;

pub use azure::AzureSpeech;
pub use unreal::UnrealSpeech;

use crate::config::{Settings, SpeechProvider};
use crate::error::{ChalktalkError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::warn;

/// Trait for turning narration scripts into media files.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize narrated audio into `audio_dir`, returning the MP3 path.
    async fn synthesize_speech(&self, text: &str, audio_dir: &Path) -> Result<PathBuf>;

    /// Synthesize a talking-avatar video into `video_dir`, returning the MP4 path.
    async fn synthesize_avatar(&self, text: &str, video_dir: &Path) -> Result<PathBuf>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Invalid regex"));

/// Readable file name prefix derived from the first words of a script.
pub fn file_stem(text: &str) -> String {
    let cleaned = NON_WORD.replace_all(text, "");
    let stem: String = cleaned
        .chars()
        .take(20)
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    if stem.is_empty() {
        "speech".to_string()
    } else {
        stem
    }
}

/// Build the configured synthesizer, reading its key from the environment.
pub fn create_synthesizer(settings: &Settings) -> Result<Arc<dyn SpeechSynthesizer>> {
    let provider = &settings.speech.provider;
    let key = std::env::var(provider.api_key_var()).unwrap_or_default();
    if key.is_empty() {
        return Err(ChalktalkError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            provider.api_key_var(),
            provider.api_key_var()
        )));
    }

    let synth: Arc<dyn SpeechSynthesizer> = match provider {
        SpeechProvider::Azure => Arc::new(AzureSpeech::new(
            key,
            settings.speech.clone(),
            settings.avatar.clone(),
        )?),
        SpeechProvider::Unreal => Arc::new(UnrealSpeech::new(key, &settings.speech)?),
    };

    Ok(synth)
}

/// Voice a batch of lines concurrently.
///
/// The result is aligned with `lines`: empty lines and failed requests
/// yield `None`.
pub async fn fetch_voiceover(
    synth: &dyn SpeechSynthesizer,
    lines: &[String],
    audio_dir: &Path,
    max_workers: usize,
) -> Result<Vec<Option<PathBuf>>> {
    tokio::fs::create_dir_all(audio_dir).await?;

    let mut paths = vec![None; lines.len()];

    let mut results = stream::iter(lines.iter().enumerate())
        .map(|(idx, line)| async move {
            if line.trim().is_empty() {
                return (idx, None);
            }
            match synth.synthesize_speech(line, audio_dir).await {
                Ok(path) => (idx, Some(path)),
                Err(e) => {
                    warn!("Line {} failed: {}", idx, e);
                    (idx, None)
                }
            }
        })
        .buffer_unordered(max_workers.max(1));

    while let Some((idx, path)) = results.next().await {
        paths[idx] = path;
    }

    Ok(paths)
}

/// Escape text for inclusion in SSML.
pub(crate) fn escape_ssml(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process synthesizer for tests.

    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes small placeholder files and fails on scripts it is told to.
    #[derive(Default)]
    pub struct FakeSynth {
        pub fail_on: HashSet<String>,
        pub calls: AtomicUsize,
    }

    impl FakeSynth {
        pub fn failing_on(scripts: &[&str]) -> Self {
            Self {
                fail_on: scripts.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn write(&self, text: &str, dir: &Path, ext: &str) -> Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(text) {
                return Err(ChalktalkError::Speech(format!("refused: {}", text)));
            }
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}_{}.{}", file_stem(text), crate::workspace::short_id(), ext));
            std::fs::write(&path, text.as_bytes())?;
            Ok(path)
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSynth {
        async fn synthesize_speech(&self, text: &str, audio_dir: &Path) -> Result<PathBuf> {
            self.write(text, audio_dir, "mp3")
        }

        async fn synthesize_avatar(&self, text: &str, video_dir: &Path) -> Result<PathBuf> {
            self.write(text, video_dir, "mp4")
        }

        fn name(&self) -> &str {
            "fake"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeSynth;
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Hello, world! This is a long line"), "Hello_world_This_is_");
        assert_eq!(file_stem("?!"), "speech");
    }

    #[test]
    fn test_escape_ssml() {
        assert_eq!(escape_ssml("a < b & c"), "a &lt; b &amp; c");
    }

    #[tokio::test]
    async fn test_fetch_voiceover_keeps_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let synth = FakeSynth::failing_on(&["bad line"]);
        let lines = vec![
            "first line".to_string(),
            "".to_string(),
            "bad line".to_string(),
            "last line".to_string(),
        ];

        let paths = fetch_voiceover(&synth, &lines, dir.path(), 2).await.unwrap();

        assert_eq!(paths.len(), 4);
        assert!(paths[0].as_ref().unwrap().exists());
        assert!(paths[1].is_none());
        assert!(paths[2].is_none());
        assert!(paths[3].as_ref().unwrap().exists());
        // Empty lines never reach the provider
        assert_eq!(synth.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_voiceover_creates_audio_dir() {
        let dir = tempfile::tempdir().unwrap();
        let audio_dir = dir.path().join("media").join("audio");
        let synth = FakeSynth::default();

        let paths = fetch_voiceover(&synth, &["  ".to_string()], &audio_dir, 1).await.unwrap();

        assert_eq!(paths, vec![None]);
        assert!(audio_dir.is_dir());
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_create_synthesizer_requires_key() {
        let mut settings = Settings::default();
        settings.speech.provider = SpeechProvider::Unreal;
        // Only meaningful when the variable is absent in the test environment
        if std::env::var("UNREAL_SPEECH_API_KEY").is_err() {
            let err = create_synthesizer(&settings).err().unwrap();
            assert!(matches!(err, ChalktalkError::Config(_)));
        }
    }
}
