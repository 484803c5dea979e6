//! Splicing timed media back into the HTML.

use super::{HandlerError, ProcessedFragment};
use crate::error::Result;
use crate::media::{duration_ms, probe_duration, MediaKind};
use futures::future::join_all;
use lol_html::html_content::{ContentType, Element};
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::{info, warn};

/// A media file ready to be attached to the fragment with the given id.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedMedia {
    pub kind: MediaKind,
    pub src: String,
    pub duration_ms: u64,
}

impl TimedMedia {
    /// The `<audio>`/`<video>` element for this media.
    pub fn element_html(&self) -> String {
        format!(
            r#"{}<source src="{}" type="{}">{}"#,
            self.kind.open_tag(),
            html_escape::encode_double_quoted_attribute(&self.src),
            self.kind.mime_type(),
            self.kind.close_tag()
        )
    }
}

/// Measure each processed fragment's media and insert it into the HTML.
///
/// Fragments whose file is missing or cannot be probed are skipped.
pub async fn insert_media_elements(html: &str, processed: &[ProcessedFragment]) -> Result<String> {
    let probes = join_all(processed.iter().map(|p| async move {
        if !p.absolute_path.is_file() {
            warn!("Media file not found: {}", p.absolute_path.display());
            return None;
        }
        match probe_duration(&p.absolute_path).await {
            Ok(seconds) => Some((
                p.id.clone(),
                TimedMedia {
                    kind: p.kind,
                    src: p.relative_path.clone(),
                    duration_ms: duration_ms(seconds),
                },
            )),
            Err(e) => {
                warn!("Error getting {} duration for {}: {}", p.kind, p.id, e);
                None
            }
        }
    }))
    .await;

    let media: HashMap<String, TimedMedia> = probes.into_iter().flatten().collect();
    apply_media_elements(html, media)
}

/// Attach media to fragments by id.
///
/// Sets `data-autoslide` to the media duration and appends the media
/// element. Each id receives at most one element.
pub fn apply_media_elements(html: &str, media: HashMap<String, TimedMedia>) -> Result<String> {
    let media = RefCell::new(media);
    let inserted = Cell::new(0usize);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("div[data-tts-id]", |el| {
                    attach(el, MediaKind::Tts, &media, &inserted)
                }),
                element!("div[data-ttv-id]", |el| {
                    attach(el, MediaKind::Ttv, &media, &inserted)
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )?;

    let leftover = media.into_inner();
    for id in leftover.keys() {
        warn!("No fragment found for id {}", id);
    }
    info!("Inserted {} media elements", inserted.get());

    Ok(output)
}

fn attach(
    el: &mut Element<'_, '_>,
    kind: MediaKind,
    media: &RefCell<HashMap<String, TimedMedia>>,
    inserted: &Cell<usize>,
) -> std::result::Result<(), HandlerError> {
    let Some(id) = el.get_attribute(kind.id_attr()) else {
        return Ok(());
    };

    let mut media = media.borrow_mut();
    if !media.get(&id).is_some_and(|m| m.kind == kind) {
        return Ok(());
    }
    let Some(timed) = media.remove(&id) else {
        return Ok(());
    };

    el.set_attribute("data-autoslide", &timed.duration_ms.to_string())?;
    el.append(&timed.element_html(), ContentType::Html);
    inserted.set(inserted.get() + 1);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn timed(kind: MediaKind, src: &str, ms: u64) -> TimedMedia {
        TimedMedia {
            kind,
            src: src.to_string(),
            duration_ms: ms,
        }
    }

    #[test]
    fn test_element_html() {
        assert_eq!(
            timed(MediaKind::Tts, "media/audio/a.mp3", 1).element_html(),
            r#"<audio data-autoplay><source src="media/audio/a.mp3" type="audio/mpeg"></audio>"#
        );
        assert_eq!(
            timed(MediaKind::Ttv, "media/video/job.mp4", 1).element_html(),
            r#"<video data-autoplay playsinline><source src="media/video/job.mp4" type="video/mp4"></video>"#
        );
    }

    #[test]
    fn test_apply_by_id() {
        let html = r#"<section><div class="fragment" data-tts="a" data-tts-id="tts_0_x"><p>A</p></div><div class="fragment" data-tts="b" data-tts-id="tts_1_y"><p>B</p></div></section>"#;

        let mut media = HashMap::new();
        media.insert("tts_1_y".to_string(), timed(MediaKind::Tts, "media/audio/b.mp3", 2350));

        let out = apply_media_elements(html, media).unwrap();

        assert!(out.contains(
            r#"data-tts-id="tts_1_y" data-autoslide="2350"><p>B</p><audio data-autoplay><source src="media/audio/b.mp3" type="audio/mpeg"></audio></div>"#
        ));
        // The unmatched fragment is untouched
        assert!(out.contains(r#"data-tts-id="tts_0_x"><p>A</p></div>"#));
    }

    #[test]
    fn test_at_most_one_media_per_id() {
        let html = r#"<div data-tts-id="dup"></div><div data-tts-id="dup"></div>"#;
        let mut media = HashMap::new();
        media.insert("dup".to_string(), timed(MediaKind::Tts, "a.mp3", 10));

        let out = apply_media_elements(html, media).unwrap();
        assert_eq!(out.matches("<audio").count(), 1);
    }

    #[test]
    fn test_kind_must_match() {
        let html = r#"<div data-tts-id="tts_0_x"></div>"#;
        let mut media = HashMap::new();
        media.insert("tts_0_x".to_string(), timed(MediaKind::Ttv, "v.mp4", 10));

        let out = apply_media_elements(html, media).unwrap();
        assert_eq!(out, html);
    }

    #[tokio::test]
    async fn test_missing_file_is_skipped() {
        let html = r#"<div data-tts-id="tts_0_x"></div>"#;
        let processed = vec![ProcessedFragment {
            absolute_path: PathBuf::from("/nonexistent/a.mp3"),
            relative_path: "media/audio/a.mp3".to_string(),
            id: "tts_0_x".to_string(),
            kind: MediaKind::Tts,
        }];

        let out = insert_media_elements(html, &processed).await.unwrap();
        assert_eq!(out, html);
    }
}
