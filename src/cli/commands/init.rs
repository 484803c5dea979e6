//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};
use std::process::Command;

/// Simple check result for init command.
struct CheckIssue {
    name: String,
    hint: String,
}

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Chalktalk Setup");
    println!();
    println!("Welcome to Chalktalk! Let's make sure everything is configured correctly.\n");

    // Step 1: Check prerequisites
    println!("{}", style("Step 1: Checking prerequisites").bold().cyan());
    println!();

    let tool_issues = check_prerequisites(settings);

    if !tool_issues.is_empty() {
        Output::warning("Some tools are missing. Please install them:");
        println!();
        for issue in &tool_issues {
            println!("  {} {} - not found", style("✗").red(), style(&issue.name).bold());
            println!("    {} {}", style("→").dim(), style(&issue.hint).dim());
        }
        println!();

        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Install the missing tools and run 'chalktalk init' again.");
            return Ok(());
        }
    } else {
        Output::success("All required tools are installed!");
    }

    println!();

    // Step 2: Check API keys
    println!("{}", style("Step 2: Checking API configuration").bold().cyan());
    println!();

    let missing_keys = missing_keys(settings);

    if !missing_keys.is_empty() {
        for var in &missing_keys {
            Output::warning(&format!("{} environment variable is not set.", var));
        }
        println!();
        println!("  Chalktalk drafts slides with OpenAI and voices them with {}.", settings.speech.provider);
        println!("  Set the keys in your shell configuration (~/.bashrc, ~/.zshrc, etc.):");
        for var in &missing_keys {
            println!("  {}", style(format!("export {}='...'", var)).green());
        }
        println!();

        if !prompt_continue("Continue without API keys?")? {
            println!();
            Output::info("Setup cancelled. Set your API keys and run 'chalktalk init' again.");
            return Ok(());
        }
    } else {
        Output::success("API keys are configured!");
    }

    println!();

    // Step 3: Create directories
    println!("{}", style("Step 3: Setting up directories").bold().cyan());
    println!();

    let output_dir = settings.output_dir();
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
        Output::success(&format!("Created output directory: {}", output_dir.display()));
    } else {
        Output::info(&format!("Output directory exists: {}", output_dir.display()));
    }

    println!();

    // Step 4: Create config file
    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("chalktalk config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check system status", style("chalktalk doctor").cyan());
    println!("  {} Build your first narrated deck", style("chalktalk create \"<topic>\"").cyan());
    println!("  {} Use the web form", style("chalktalk serve").cyan());
    println!();
    println!("For more help: {}", style("chalktalk --help").cyan());

    Ok(())
}

/// Check prerequisites and return any issues.
fn check_prerequisites(settings: &Settings) -> Vec<CheckIssue> {
    let tools = [
        ("quarto", settings.render.quarto_bin.as_str(), "--version"),
        ("ffprobe", "ffprobe", "-version"),
    ];

    tools
        .iter()
        .filter(|(_, program, arg)| Command::new(program).arg(arg).output().is_err())
        .map(|(name, _, _)| CheckIssue {
            name: name.to_string(),
            hint: install_hint(name).to_string(),
        })
        .collect()
}

/// Environment variables the configured providers need but are not set.
fn missing_keys(settings: &Settings) -> Vec<&'static str> {
    ["OPENAI_API_KEY", settings.speech.provider.api_key_var()]
        .into_iter()
        .filter(|var| std::env::var(var).map(|v| v.is_empty()).unwrap_or(true))
        .collect()
}

/// Get platform-specific install hint.
fn install_hint(tool: &str) -> &'static str {
    match tool {
        "quarto" => {
            if cfg!(target_os = "macos") {
                "Install with: brew install --cask quarto"
            } else {
                "Install from: https://quarto.org/docs/get-started/"
            }
        }
        "ffprobe" => {
            if cfg!(target_os = "macos") {
                "Install with: brew install ffmpeg"
            } else if cfg!(target_os = "linux") {
                "Install with: sudo apt install ffmpeg"
            } else {
                "Install from: https://ffmpeg.org/download.html"
            }
        }
        _ => "Check the documentation for installation instructions",
    }
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_hint_quarto() {
        assert!(install_hint("quarto").contains("quarto"));
    }

    #[test]
    fn test_install_hint_ffprobe() {
        assert!(install_hint("ffprobe").contains("ffmpeg"));
    }

    #[test]
    fn test_missing_renderer_reported() {
        let mut settings = Settings::default();
        settings.render.quarto_bin = "chalktalk-no-such-renderer".to_string();

        let issues = check_prerequisites(&settings);
        assert!(issues.iter().any(|i| i.name == "quarto"));
    }
}
