//! Auto-advance and playback controls.

use crate::error::Result;
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, text, RewriteStrSettings};
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::sync::LazyLock;

const START_BUTTON: &str = include_str!("../../assets/start_button.html");
const START_SCRIPT: &str = include_str!("../../assets/start.js");
const PLAYBACK_SCRIPT: &str = include_str!("../../assets/playback.js");
const CONTROLS: &str = include_str!("../../assets/controls.html");

/// Autoslide of the empty fragment leading every slide after the first.
const LEAD_FRAGMENT_AUTOSLIDE_MS: u32 = 10;
/// Global and per-slide autoslide once the deck is running.
const AUTOSLIDE_MS: u32 = 100;

static AUTOSLIDE_SETTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"autoSlide:\s*\d+").expect("Invalid regex"));

/// Patch rendered slides so they advance on their own and gain player controls.
///
/// The first slide waits (`data-autoslide="0"`) behind a start button; every
/// later slide opens with a short empty fragment and advances automatically.
/// Speed and volume controls are appended to the body.
pub fn modify_html_for_autoslide_and_controls(html: &str) -> Result<String> {
    let section_index = Cell::new(0usize);
    let script_buffer = RefCell::new(String::new());
    let reveal_patched = Cell::new(false);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("section", |el| {
                    let idx = section_index.get();
                    section_index.set(idx + 1);

                    if idx == 0 {
                        el.set_attribute("data-autoslide", "0")?;
                        el.append(START_BUTTON, ContentType::Html);
                    } else {
                        el.set_attribute("data-autoslide", &AUTOSLIDE_MS.to_string())?;
                        el.prepend(
                            &format!(
                                r#"<div class="fragment" data-autoslide="{}"></div>"#,
                                LEAD_FRAGMENT_AUTOSLIDE_MS
                            ),
                            ContentType::Html,
                        );
                    }
                    Ok(())
                }),
                text!("script", |chunk| {
                    if reveal_patched.get() {
                        return Ok(());
                    }

                    let mut buffer = script_buffer.borrow_mut();
                    buffer.push_str(chunk.as_str());
                    if !chunk.last_in_text_node() {
                        chunk.remove();
                        return Ok(());
                    }

                    let script = std::mem::take(&mut *buffer);
                    let script = if script.contains("Reveal.initialize") {
                        reveal_patched.set(true);
                        set_global_autoslide(&script)
                    } else {
                        script
                    };
                    chunk.replace(&script, ContentType::Html);
                    Ok(())
                }),
                element!("body", |el| {
                    el.append(&body_extras(), ContentType::Html);
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::new()
        },
    )?;

    Ok(output)
}

/// Force the global `autoSlide` option in a `Reveal.initialize` call.
fn set_global_autoslide(script: &str) -> String {
    let value = format!("autoSlide: {}", AUTOSLIDE_MS);
    if AUTOSLIDE_SETTING.is_match(script) {
        AUTOSLIDE_SETTING.replace_all(script, value.as_str()).into_owned()
    } else {
        script.replacen(
            "Reveal.initialize({",
            &format!("Reveal.initialize({{\n    {},\n", value),
            1,
        )
    }
}

fn body_extras() -> String {
    format!(
        "<script>\n{}</script>\n<script>\n{}</script>\n{}",
        START_SCRIPT, PLAYBACK_SCRIPT, CONTROLS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head></head><body>
<div class="reveal"><div class="slides">
<section id="title-slide"><h1>Deck</h1></section>
<section id="one"><h2>One</h2></section>
<section id="two"><h2>Two</h2></section>
</div></div>
<script src="reveal.js"></script>
<script>
  Reveal.initialize({
    controls: true,
    autoSlide: 5000,
  });
</script>
</body></html>"#;

    #[test]
    fn test_sections() {
        let out = modify_html_for_autoslide_and_controls(PAGE).unwrap();

        assert!(out.contains(r#"<section id="title-slide" data-autoslide="0"><h1>Deck</h1>"#));
        assert!(out.contains(
            r#"<section id="one" data-autoslide="100"><div class="fragment" data-autoslide="10"></div><h2>One</h2>"#
        ));
        assert!(out.contains(
            r#"<section id="two" data-autoslide="100"><div class="fragment" data-autoslide="10"></div><h2>Two</h2>"#
        ));
    }

    #[test]
    fn test_start_button_only_on_first_slide() {
        let out = modify_html_for_autoslide_and_controls(PAGE).unwrap();

        assert_eq!(out.matches(r#"id="startPresentationButton""#).count(), 1);
        let button = out.find("startPresentationButton").unwrap();
        let second = out.find(r#"<section id="one""#).unwrap();
        assert!(button < second);
    }

    #[test]
    fn test_reveal_autoslide_replaced() {
        let out = modify_html_for_autoslide_and_controls(PAGE).unwrap();
        assert!(out.contains("autoSlide: 100,"));
        assert!(!out.contains("autoSlide: 5000"));
    }

    #[test]
    fn test_reveal_autoslide_inserted() {
        let script = "Reveal.initialize({\n    controls: true,\n});";
        let patched = set_global_autoslide(script);
        assert_eq!(
            patched,
            "Reveal.initialize({\n    autoSlide: 100,\n\n    controls: true,\n});"
        );
    }

    #[test]
    fn test_body_controls_appended() {
        let out = modify_html_for_autoslide_and_controls(PAGE).unwrap();

        let speed = out.find(r#"id="speedButton""#).unwrap();
        let volume = out.find(r#"id="volumeSlider""#).unwrap();
        let body_end = out.find("</body>").unwrap();
        assert!(speed < volume && volume < body_end);
        assert!(out.contains("playbackRates"));
        assert!(out.contains("Reveal.next()"));
    }

    #[test]
    fn test_only_first_reveal_script_patched() {
        let html = "<body><script>Reveal.initialize({ autoSlide: 1 });</script>\
                    <script>Reveal.initialize({ autoSlide: 2 });</script></body>";
        let out = modify_html_for_autoslide_and_controls(html).unwrap();
        assert!(out.contains("autoSlide: 100 }"));
        assert!(out.contains("autoSlide: 2 }"));
    }
}
