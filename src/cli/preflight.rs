//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and keys are available before starting
//! operations that would otherwise fail midway, after tokens were spent.

use crate::config::Settings;
use crate::error::{ChalktalkError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Drafting needs the OpenAI key.
    Generate,
    /// Rendering needs the renderer, ffprobe and the speech key.
    Render,
    /// Both of the above.
    Create,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Generate => {
            check_env_key("OPENAI_API_KEY")?;
        }
        Operation::Render => {
            check_render(settings)?;
        }
        Operation::Create => {
            check_env_key("OPENAI_API_KEY")?;
            check_render(settings)?;
        }
    }
    Ok(())
}

fn check_render(settings: &Settings) -> Result<()> {
    check_env_key(settings.speech.provider.api_key_var())?;
    check_tool(&settings.render.quarto_bin, "--version")?;
    check_tool("ffprobe", "-version")?;
    Ok(())
}

/// Check that an environment variable holds a non-empty key.
fn check_env_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(ChalktalkError::Config(format!(
            "{var} is empty. Set it with: export {var}='...'"
        ))),
        Err(_) => Err(ChalktalkError::Config(format!(
            "{var} not set. Set it with: export {var}='...'"
        ))),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str, version_arg: &str) -> Result<()> {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(ChalktalkError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ChalktalkError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(ChalktalkError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
