//! Pipeline orchestrator for Chalktalk.
//!
//! Coordinates the entire process from prompt to narrated slide deck.

use crate::config::{Prompts, Settings};
use crate::error::{ChalktalkError, Result};
use crate::fragments::{
    extract_media_fragments, insert_media_elements, modify_html_for_autoslide_and_controls,
    process_fragments,
};
use crate::render::render_qmd;
use crate::slides::{format_presentation_for_qmd, OpenAIDrafter, SlideDrafter};
use crate::speech::{create_synthesizer, SpeechSynthesizer};
use crate::workspace::PresentationDir;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the Chalktalk pipeline.
pub struct Orchestrator {
    settings: Settings,
    drafter: Arc<dyn SlideDrafter>,
    /// None for draft-only use.
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
}

impl Orchestrator {
    /// Create a new orchestrator from settings and environment keys.
    pub fn new(settings: Settings) -> Result<Self> {
        let drafter = build_drafter(&settings)?;

        let synthesizer = create_synthesizer(&settings)?;
        info!("Using {} speech", synthesizer.name());

        Ok(Self {
            settings,
            drafter,
            synthesizer: Some(synthesizer),
        })
    }

    /// Create an orchestrator that can only draft slides.
    ///
    /// No speech key is required; voicing fails with a configuration error.
    pub fn for_drafting(settings: Settings) -> Result<Self> {
        let drafter = build_drafter(&settings)?;

        Ok(Self {
            settings,
            drafter,
            synthesizer: None,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        drafter: Arc<dyn SlideDrafter>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            settings,
            drafter,
            synthesizer: Some(synthesizer),
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Draft slides and wrap them in reveal.js front matter.
    #[instrument(skip(self))]
    pub async fn generate_qmd(&self, topic: &str, title: &str, num_slides: u32) -> Result<String> {
        if topic.trim().is_empty() {
            return Err(ChalktalkError::InvalidInput("Prompt is empty".to_string()));
        }
        if num_slides == 0 {
            return Err(ChalktalkError::InvalidInput("Slide count must be at least 1".to_string()));
        }

        let body = self.drafter.draft(topic, title, num_slides).await?;

        Ok(format_presentation_for_qmd(
            &body,
            &self.settings.render.document_title,
            &self.settings.render.theme,
        ))
    }

    /// Voice a rendered page: extract, synthesize, insert, add controls.
    #[instrument(skip(self, html))]
    pub async fn voice_html(&self, html: &str, media_dir: &Path, html_dir: &Path) -> Result<VoiceOutcome> {
        let synthesizer = self.synthesizer.as_deref().ok_or_else(|| {
            ChalktalkError::Config("No speech provider configured".to_string())
        })?;

        let (fragments, tagged) = extract_media_fragments(html)?;
        info!("Found {} narrated fragments", fragments.len());

        let processed = process_fragments(
            &fragments,
            synthesizer,
            media_dir,
            html_dir,
            self.settings.speech.max_workers,
        )
        .await;

        let with_media = insert_media_elements(&tagged, &processed).await?;
        let html = modify_html_for_autoslide_and_controls(&with_media)?;

        Ok(VoiceOutcome {
            html,
            fragments_found: fragments.len(),
            fragments_voiced: processed.len(),
        })
    }

    /// Render markdown into a fresh presentation directory and voice it.
    #[instrument(skip(self, qmd_content))]
    pub async fn render_presentation(
        &self,
        qmd_content: &str,
        title: &str,
        name: &str,
    ) -> Result<PresentationResult> {
        let dir = PresentationDir::create(&self.settings.output_dir(), title)?;

        let qmd_path = dir.qmd_path(name);
        tokio::fs::write(&qmd_path, qmd_content).await?;

        info!("Rendering {}", qmd_path.display());
        let html_path = render_qmd(&self.settings.render.quarto_bin, &qmd_path).await?;
        let html = tokio::fs::read_to_string(&html_path).await?;

        let outcome = self.voice_html(&html, &dir.media_dir(), dir.base_dir()).await?;

        let final_html = dir.final_html_path(name);
        tokio::fs::write(&final_html, &outcome.html).await?;
        info!("Wrote {}", final_html.display());

        Ok(PresentationResult {
            base_dir: dir.base_dir().to_path_buf(),
            final_html,
            fragments_found: outcome.fragments_found,
            fragments_voiced: outcome.fragments_voiced,
        })
    }

    /// Complete workflow: prompt to narrated deck.
    ///
    /// Without a title, the first `llm.title_max_chars` characters of the
    /// prompt are used.
    #[instrument(skip(self))]
    pub async fn create_from_prompt(
        &self,
        prompt: &str,
        title: Option<&str>,
        name: &str,
        num_slides: u32,
    ) -> Result<PresentationResult> {
        let title = match title {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => default_title(prompt, self.settings.llm.title_max_chars),
        };

        let qmd = self.generate_qmd(prompt, &title, num_slides).await?;
        self.render_presentation(&qmd, &title, name).await
    }
}

fn build_drafter(settings: &Settings) -> Result<Arc<dyn SlideDrafter>> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    Ok(Arc::new(OpenAIDrafter::new(
        &settings.llm.model,
        prompts,
        Duration::from_secs(settings.llm.timeout_seconds),
    )?))
}

/// Title derived from the first characters of a prompt.
pub fn default_title(prompt: &str, max_chars: usize) -> String {
    prompt.trim().chars().take(max_chars).collect::<String>().trim_end().to_string()
}

/// Result of voicing a page.
#[derive(Debug)]
pub struct VoiceOutcome {
    /// Final HTML with media and controls.
    pub html: String,
    pub fragments_found: usize,
    pub fragments_voiced: usize,
}

/// Result of producing a presentation.
#[derive(Debug)]
pub struct PresentationResult {
    /// Presentation directory.
    pub base_dir: PathBuf,
    /// The voiced `<name>_final.html`.
    pub final_html: PathBuf,
    pub fragments_found: usize,
    pub fragments_voiced: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::testing::FakeSynth;
    use async_trait::async_trait;

    struct CannedDrafter;

    #[async_trait]
    impl SlideDrafter for CannedDrafter {
        async fn draft(&self, topic: &str, _title: &str, num_slides: u32) -> Result<String> {
            Ok(format!("## {topic}\n\n{num_slides} slides"))
        }
    }

    fn orchestrator(synth: FakeSynth) -> Orchestrator {
        Orchestrator::with_components(Settings::default(), Arc::new(CannedDrafter), Arc::new(synth))
    }

    #[test]
    fn test_default_title() {
        assert_eq!(default_title("  Personal identity  ", 50), "Personal identity");
        assert_eq!(default_title("abcdef", 3), "abc");
        assert_eq!(default_title("héllo wörld", 4), "héll");
    }

    #[tokio::test]
    async fn test_generate_qmd() {
        let qmd = orchestrator(FakeSynth::default())
            .generate_qmd("Loops", "Loops", 3)
            .await
            .unwrap();

        assert!(qmd.starts_with("---\ntitle: \"chalktalk Demo\""));
        assert!(qmd.contains("theme: moon"));
        assert!(qmd.ends_with("## Loops\n\n3 slides"));
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_input() {
        let orch = orchestrator(FakeSynth::default());
        assert!(matches!(
            orch.generate_qmd("  ", "t", 3).await,
            Err(ChalktalkError::InvalidInput(_))
        ));
        assert!(matches!(
            orch.generate_qmd("x", "t", 0).await,
            Err(ChalktalkError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_voice_html_without_fragments_adds_controls() {
        let dir = tempfile::tempdir().unwrap();
        let html = "<body><section><h1>Only</h1></section></body>";

        let outcome = orchestrator(FakeSynth::default())
            .voice_html(html, &dir.path().join("media"), dir.path())
            .await
            .unwrap();

        assert_eq!(outcome.fragments_found, 0);
        assert_eq!(outcome.fragments_voiced, 0);
        assert!(outcome.html.contains(r#"data-autoslide="0""#));
        assert!(outcome.html.contains("speedButton"));
    }

    #[tokio::test]
    async fn test_drafting_only_cannot_voice() {
        let dir = tempfile::tempdir().unwrap();
        let orch = Orchestrator::for_drafting(Settings::default()).unwrap();

        let err = orch
            .voice_html("<section></section>", dir.path(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ChalktalkError::Config(_)));
    }

    #[tokio::test]
    async fn test_voice_html_counts_fragments() {
        let dir = tempfile::tempdir().unwrap();
        let html = r#"<body><section>
<div class="fragment" data-tts="works"></div>
<div class="fragment" data-tts="fails"></div>
</section></body>"#;

        let outcome = orchestrator(FakeSynth::failing_on(&["fails"]))
            .voice_html(html, &dir.path().join("media"), dir.path())
            .await
            .unwrap();

        assert_eq!(outcome.fragments_found, 2);
        assert_eq!(outcome.fragments_voiced, 1);
        assert_eq!(outcome.html.matches("data-tts-id=").count(), 2);
    }
}
