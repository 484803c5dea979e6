//! Slide content drafting.
//!
//! Turns a topic into Quarto reveal.js markdown where every bullet or code
//! block sits in its own fragment carrying a narration script.

mod openai;

pub use openai::OpenAIDrafter;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for drafting slide markdown from a topic.
#[async_trait]
pub trait SlideDrafter: Send + Sync {
    /// Draft the slide body (no front matter).
    async fn draft(&self, topic: &str, title: &str, num_slides: u32) -> Result<String>;
}

/// Wrap a drafted body in the reveal.js front matter.
pub fn format_presentation_for_qmd(body: &str, document_title: &str, theme: &str) -> String {
    let mut qmd = format!(
        "---\ntitle: \"{}\"\nformat: \n    revealjs:\n        theme: {}\n---\n\n",
        document_title.replace('"', "\\\""),
        theme
    );
    qmd.push_str(body);
    qmd
}

/// Remove a surrounding markdown code fence from a model answer.
///
/// Models occasionally wrap the whole deck in ```markdown despite being told
/// not to. Inner fences are left alone.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") || !trimmed.ends_with("```") || trimmed.len() < 6 {
        return text;
    }

    let Some(first_newline) = trimmed.find('\n') else {
        return text;
    };
    let lang = trimmed[3..first_newline].trim();
    if !matches!(lang, "" | "markdown" | "md" | "qmd") {
        return text;
    }
    let inner = &trimmed[first_newline + 1..trimmed.len() - 3];
    inner.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_matter() {
        let qmd = format_presentation_for_qmd("## Slide", "chalktalk Demo", "moon");
        assert!(qmd.starts_with("---\ntitle: \"chalktalk Demo\"\n"));
        assert!(qmd.contains("revealjs:\n        theme: moon\n---\n\n## Slide"));
    }

    #[test]
    fn test_front_matter_escapes_quotes() {
        let qmd = format_presentation_for_qmd("", "The \"Best\" Deck", "night");
        assert!(qmd.contains("title: \"The \\\"Best\\\" Deck\""));
    }

    #[test]
    fn test_strip_code_fence() {
        let wrapped = "```markdown\n## Slide\n\n```python\nx = 1\n```\n```";
        assert_eq!(strip_code_fence(wrapped), "## Slide\n\n```python\nx = 1\n```");
    }

    #[test]
    fn test_strip_code_fence_leaves_plain_text() {
        let plain = "## Slide\n\n- point";
        assert_eq!(strip_code_fence(plain), plain);

        let code_only = "```python\nx = 1\n```";
        assert_eq!(strip_code_fence(code_only), code_only);
    }
}
