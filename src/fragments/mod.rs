//! Narration fragments.
//!
//! A fragment is a `div.fragment` carrying its narration script in a
//! `data-tts` (audio) or `data-ttv` (avatar video) attribute. The pipeline:
//!
//! 1. [`extract_media_fragments`] tags every fragment with a unique id
//! 2. [`process_fragments`] voices them concurrently
//! 3. [`insert_media_elements`] splices timed media back in by id
//! 4. [`modify_html_for_autoslide_and_controls`] adds auto-advance and player controls

mod controls;
mod extract;
mod insert;
mod process;

pub use controls::modify_html_for_autoslide_and_controls;
pub use extract::extract_media_fragments;
pub use insert::{apply_media_elements, insert_media_elements, TimedMedia};
pub use process::process_fragments;

use crate::media::MediaKind;
use std::path::PathBuf;

/// A fragment found in the rendered HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Narration script (entity-decoded).
    pub script: String,
    /// Unique id written to the `data-<kind>-id` attribute.
    pub id: String,
    pub kind: MediaKind,
}

/// A fragment whose media file has been produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFragment {
    pub absolute_path: PathBuf,
    /// Path as referenced from the HTML page.
    pub relative_path: String,
    pub id: String,
    pub kind: MediaKind,
}

type HandlerError = Box<dyn std::error::Error + Send + Sync>;
