//! Create command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the whole workflow: draft, render and voice.
pub async fn run_create(
    prompt: &str,
    title: Option<String>,
    name: &str,
    slides: Option<u32>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Create, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'chalktalk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let num_slides = slides.unwrap_or(settings.llm.num_slides);
    let orchestrator = Orchestrator::new(settings)?;

    Output::info(&format!("Creating a {}-slide presentation", num_slides));

    match orchestrator
        .create_from_prompt(prompt, title.as_deref(), name, num_slides)
        .await
    {
        Ok(result) => {
            Output::success(&format!("Presentation ready: {}", result.final_html.display()));
            Output::kv("Directory", &result.base_dir.display().to_string());
            Output::voice_summary(result.fragments_found, result.fragments_voiced);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to create presentation: {}", e));
            Err(e.into())
        }
    }
}
