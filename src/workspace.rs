//! Per-presentation directories.
//!
//! Each run gets `<root>/<safe_title>_<timestamp>_<id>/` with its own
//! `media/audio` and `media/video` folders, so runs never share files.

use crate::error::Result;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Invalid regex"));
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").expect("Invalid regex"));

/// Turn a title into a filesystem-friendly slug.
pub fn sanitize_title(title: &str) -> String {
    let cleaned = NON_WORD.replace_all(title, "");
    let lowered = cleaned.trim().to_lowercase();
    let slug = SEPARATORS.replace_all(&lowered, "_").into_owned();

    if slug.is_empty() {
        "presentation".to_string()
    } else {
        slug
    }
}

/// Short random hex id used in directory and job names.
pub fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Directory layout of a single presentation.
#[derive(Debug, Clone)]
pub struct PresentationDir {
    base_dir: PathBuf,
}

impl PresentationDir {
    /// Create a fresh, uniquely named presentation directory under `root`.
    pub fn create(root: &Path, title: &str) -> Result<Self> {
        let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let dir_name = format!("{}_{}_{}", sanitize_title(title), timestamp, short_id());

        let dir = Self {
            base_dir: root.join(dir_name),
        };

        std::fs::create_dir_all(dir.audio_dir())?;
        std::fs::create_dir_all(dir.video_dir())?;

        debug!("Created presentation directory {}", dir.base_dir.display());
        Ok(dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn media_dir(&self) -> PathBuf {
        self.base_dir.join("media")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.media_dir().join("audio")
    }

    pub fn video_dir(&self) -> PathBuf {
        self.media_dir().join("video")
    }

    /// Path of the markdown source, `<name>.qmd`.
    pub fn qmd_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.qmd", name))
    }

    /// Path of the renderer output, `<name>.html`.
    pub fn html_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.html", name))
    }

    /// Path of the voiced output, `<name>_final.html`.
    pub fn final_html_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}_final.html", name))
    }
}

/// Path of a media file as referenced from a page in `html_dir`.
///
/// Uses `/` separators. Media outside `html_dir` keeps its absolute path.
pub fn relative_media_path(media: &Path, html_dir: &Path) -> String {
    match media.strip_prefix(html_dir) {
        Ok(rel) => rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => media.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(
            sanitize_title("Personal Identity Problems (ethics)"),
            "personal_identity_problems_ethics"
        );
        assert_eq!(sanitize_title("  Rust -- Ownership!  "), "rust_ownership");
        assert_eq!(sanitize_title("???"), "presentation");
    }

    #[test]
    fn test_short_id() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_create_layout() {
        let root = tempfile::tempdir().unwrap();
        let dir = PresentationDir::create(root.path(), "Intro to Python").unwrap();

        assert!(dir.audio_dir().is_dir());
        assert!(dir.video_dir().is_dir());

        let name = dir.base_dir().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("intro_to_python_"));
        assert_eq!(dir.final_html_path("deck"), dir.base_dir().join("deck_final.html"));
    }

    #[test]
    fn test_two_dirs_with_same_title_differ() {
        let root = tempfile::tempdir().unwrap();
        let a = PresentationDir::create(root.path(), "Same").unwrap();
        let b = PresentationDir::create(root.path(), "Same").unwrap();
        assert_ne!(a.base_dir(), b.base_dir());
    }

    #[test]
    fn test_relative_media_path() {
        let html_dir = Path::new("/tmp/deck");
        let media = Path::new("/tmp/deck/media/audio/hello_1234.mp3");
        assert_eq!(relative_media_path(media, html_dir), "media/audio/hello_1234.mp3");

        let outside = Path::new("/var/media/x.mp3");
        assert_eq!(relative_media_path(outside, html_dir), "/var/media/x.mp3");
    }
}
