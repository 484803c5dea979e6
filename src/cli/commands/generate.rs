//! Generate command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{default_title, Orchestrator};
use anyhow::Result;

/// Run the generate command.
pub async fn run_generate(
    prompt: &str,
    title: Option<String>,
    slides: Option<u32>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'chalktalk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let title = title.unwrap_or_else(|| default_title(prompt, settings.llm.title_max_chars));
    let num_slides = slides.unwrap_or(settings.llm.num_slides);

    let orchestrator = Orchestrator::for_drafting(settings)?;

    let spinner = Output::spinner(&format!("Drafting {} slides...", num_slides));
    let result = orchestrator.generate_qmd(prompt, &title, num_slides).await;
    spinner.finish_and_clear();

    let qmd = match result {
        Ok(qmd) => qmd,
        Err(e) => {
            Output::error(&format!("Failed to draft slides: {}", e));
            return Err(e.into());
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &qmd)?;
            Output::success(&format!("Wrote {}", path));
        }
        None => println!("{}", qmd),
    }

    Ok(())
}
