//! Render command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Run the render command on an existing `.qmd` file.
pub async fn run_render(input: &str, name: &str, title: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Render, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'chalktalk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let path = Path::new(input);
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            Output::error(&format!("Could not read {}: {}", input, e));
            return Err(e.into());
        }
    };

    let title = title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string())
    });

    Output::info(&format!("Rendering: {}", input));

    let orchestrator = Orchestrator::new(settings)?;

    match orchestrator.render_presentation(&content, &title, name).await {
        Ok(result) => {
            Output::success(&format!("Presentation ready: {}", result.final_html.display()));
            Output::voice_summary(result.fragments_found, result.fragments_voiced);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to render: {}", e));
            Err(e.into())
        }
    }
}
