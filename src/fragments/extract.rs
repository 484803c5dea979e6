//! Fragment discovery and tagging.

use super::{Fragment, HandlerError};
use crate::error::Result;
use crate::media::MediaKind;
use crate::workspace::short_id;
use lol_html::html_content::Element;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::cell::{Cell, RefCell};
use tracing::debug;

/// Find every narrated fragment and tag it with a unique id.
///
/// Ids look like `tts_<n>_<hex>` / `ttv_<n>_<hex>`, where `n` counts
/// fragments of that kind in document order. Returns the fragments and the
/// rewritten HTML.
pub fn extract_media_fragments(html: &str) -> Result<(Vec<Fragment>, String)> {
    let fragments = RefCell::new(Vec::new());
    let tts_count = Cell::new(0usize);
    let ttv_count = Cell::new(0usize);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("div.fragment[data-tts]", |el| {
                    tag_fragment(el, MediaKind::Tts, &tts_count, &fragments)
                }),
                element!("div.fragment[data-ttv]", |el| {
                    tag_fragment(el, MediaKind::Ttv, &ttv_count, &fragments)
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )?;

    let fragments = fragments.into_inner();
    debug!(
        "Found {} fragments ({} tts, {} ttv)",
        fragments.len(),
        tts_count.get(),
        ttv_count.get()
    );

    Ok((fragments, output))
}

fn tag_fragment(
    el: &mut Element<'_, '_>,
    kind: MediaKind,
    counter: &Cell<usize>,
    fragments: &RefCell<Vec<Fragment>>,
) -> std::result::Result<(), HandlerError> {
    let raw = el.get_attribute(kind.script_attr()).unwrap_or_default();
    let script = html_escape::decode_html_entities(&raw).trim().to_string();

    let idx = counter.get();
    counter.set(idx + 1);

    let id = format!("{}_{}_{}", kind.as_str(), idx, short_id());
    el.set_attribute(kind.id_attr(), &id)?;

    fragments.borrow_mut().push(Fragment { script, id, kind });
    Ok(())
}
