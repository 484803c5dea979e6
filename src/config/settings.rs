//! Configuration settings for Chalktalk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub render: RenderSettings,
    pub speech: SpeechSettings,
    pub avatar: AvatarSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root directory under which each presentation gets its own folder.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "presentations".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Slide drafting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat completion model.
    pub model: String,
    /// Default number of slides to request.
    pub num_slides: u32,
    /// Characters of the prompt used as title when none is given.
    pub title_max_chars: usize,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            num_slides: 5,
            title_max_chars: 50,
            timeout_seconds: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Document renderer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Quarto executable.
    pub quarto_bin: String,
    /// reveal.js theme written into the front matter.
    pub theme: String,
    /// Title written into the front matter.
    pub document_title: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            quarto_bin: "quarto".to_string(),
            theme: "moon".to_string(),
            document_title: "chalktalk Demo".to_string(),
        }
    }
}

/// Speech provider type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    /// Azure Speech Service (speech and avatar video).
    #[default]
    Azure,
    /// Unreal Speech (speech only).
    Unreal,
}

impl std::str::FromStr for SpeechProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "azure" | "microsoft" => Ok(SpeechProvider::Azure),
            "unreal" | "unrealspeech" => Ok(SpeechProvider::Unreal),
            _ => Err(format!("Unknown speech provider: {}", s)),
        }
    }
}

impl std::fmt::Display for SpeechProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechProvider::Azure => write!(f, "azure"),
            SpeechProvider::Unreal => write!(f, "unreal"),
        }
    }
}

impl SpeechProvider {
    /// Environment variable holding the provider's key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            SpeechProvider::Azure => "AZURE_SPEECH_KEY",
            SpeechProvider::Unreal => "UNREAL_SPEECH_API_KEY",
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Speech provider (azure, unreal).
    pub provider: SpeechProvider,
    /// Azure region, e.g. "westus2".
    pub region: String,
    /// Azure neural voice name.
    pub voice: String,
    /// Azure audio output format header value.
    pub output_format: String,
    /// Maximum concurrent synthesis requests.
    pub max_workers: usize,
    /// User-Agent sent to the speech service.
    pub user_agent: String,
    /// Unreal Speech voice id.
    pub unreal_voice: String,
    /// Unreal Speech MP3 bitrate.
    pub unreal_bitrate: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::Azure,
            region: "westus2".to_string(),
            voice: "en-US-AndrewMultilingualNeural".to_string(),
            output_format: "audio-16khz-32kbitrate-mono-mp3".to_string(),
            max_workers: 20,
            user_agent: "chalktalk".to_string(),
            unreal_voice: "Sierra".to_string(),
            unreal_bitrate: "192k".to_string(),
        }
    }
}

/// Talking-avatar video settings (Azure batch synthesis).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub character: String,
    pub style: String,
    pub video_codec: String,
    pub bitrate_kbps: u32,
    pub background_color: String,
    /// Seconds between job status checks.
    pub poll_interval_seconds: u64,
    /// Give up on a job after this many seconds.
    pub poll_timeout_seconds: u64,
    pub api_version: String,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            character: "harry".to_string(),
            style: "business".to_string(),
            video_codec: "h264".to_string(),
            bitrate_kbps: 900,
            background_color: "#191919FF".to_string(),
            poll_interval_seconds: 1,
            poll_timeout_seconds: 900,
            api_version: "2024-08-01".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ChalktalkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chalktalk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded presentation output directory.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}
