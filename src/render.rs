//! Quarto rendering.
//!
//! Markdown to reveal.js HTML is delegated to `quarto render`.

use crate::error::{ChalktalkError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

/// Render a `.qmd` file and return the path of the produced `.html`.
#[instrument(skip(quarto_bin), fields(qmd = %qmd_path.display()))]
pub async fn render_qmd(quarto_bin: &str, qmd_path: &Path) -> Result<PathBuf> {
    if !qmd_path.is_file() {
        return Err(ChalktalkError::InvalidInput(format!(
            "Markdown file not found: {}",
            qmd_path.display()
        )));
    }

    info!("Rendering with {}", quarto_bin);

    let result = Command::new(quarto_bin)
        .arg("render")
        .arg(qmd_path)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChalktalkError::ToolNotFound(quarto_bin.to_string()));
        }
        Err(e) => {
            return Err(ChalktalkError::Render(format!("{quarto_bin} execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ChalktalkError::ToolFailed(format!("{quarto_bin} render failed: {stderr}")));
    }

    let html_path = qmd_path.with_extension("html");
    if !html_path.is_file() {
        return Err(ChalktalkError::Render(format!(
            "Expected output not found: {}",
            html_path.display()
        )));
    }

    Ok(html_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_input() {
        let err = render_qmd("quarto", Path::new("/nonexistent/deck.qmd"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChalktalkError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let qmd = dir.path().join("deck.qmd");
        std::fs::write(&qmd, "## Slide").unwrap();

        let err = render_qmd("chalktalk-no-such-renderer", &qmd).await.unwrap_err();
        assert!(matches!(err, ChalktalkError::ToolNotFound(_)));
    }
}
