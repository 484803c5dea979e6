//! Media kinds and duration probing.

use crate::error::{ChalktalkError, Result};
use std::path::Path;
use tokio::process::Command;

/// Kind of media attached to a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Narrated audio (`data-tts`).
    Tts,
    /// Talking-avatar video (`data-ttv`).
    Ttv,
}

impl MediaKind {
    /// Short name, also used as id prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Tts => "tts",
            MediaKind::Ttv => "ttv",
        }
    }

    /// Attribute carrying the narration script.
    pub fn script_attr(&self) -> &'static str {
        match self {
            MediaKind::Tts => "data-tts",
            MediaKind::Ttv => "data-ttv",
        }
    }

    /// Attribute carrying the fragment's unique id.
    pub fn id_attr(&self) -> &'static str {
        match self {
            MediaKind::Tts => "data-tts-id",
            MediaKind::Ttv => "data-ttv-id",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaKind::Tts => "audio/mpeg",
            MediaKind::Ttv => "video/mp4",
        }
    }

    /// Subdirectory of the media directory.
    pub fn subdir(&self) -> &'static str {
        match self {
            MediaKind::Tts => "audio",
            MediaKind::Ttv => "video",
        }
    }

    /// Opening tag of the media element, without its children.
    pub fn open_tag(&self) -> &'static str {
        match self {
            MediaKind::Tts => "<audio data-autoplay>",
            MediaKind::Ttv => "<video data-autoplay playsinline>",
        }
    }

    pub fn close_tag(&self) -> &'static str {
        match self {
            MediaKind::Tts => "</audio>",
            MediaKind::Ttv => "</video>",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queries the duration of an audio or video file in seconds using ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChalktalkError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(ChalktalkError::Media(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(ChalktalkError::Media(format!(
            "ffprobe returned error for {}",
            path.display()
        )));
    }

    parse_ffprobe_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Extracts `format.duration` from ffprobe JSON output.
fn parse_ffprobe_duration(json_str: &str) -> Result<f64> {
    let parsed: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|_| ChalktalkError::Media("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ChalktalkError::Media("Could not determine media duration".into()))
}

/// Seconds to whole milliseconds, truncating.
pub fn duration_ms(seconds: f64) -> u64 {
    (seconds * 1000.0) as u64
}
