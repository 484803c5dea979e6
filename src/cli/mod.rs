//! CLI module for Chalktalk.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Chalktalk - narrated slide decks from a prompt
///
/// Drafts reveal.js slides with an LLM, renders them with Quarto and voices
/// every fragment with a cloud speech service.
#[derive(Parser, Debug)]
#[command(name = "chalktalk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Chalktalk and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Draft slide markdown (.qmd) from a prompt
    Generate {
        /// What the presentation should teach
        prompt: String,

        /// Presentation title (defaults to the start of the prompt)
        #[arg(short, long)]
        title: Option<String>,

        /// Number of slides
        #[arg(short = 'n', long)]
        slides: Option<u32>,

        /// Write the markdown to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Render an existing .qmd and voice every fragment
    Render {
        /// Path to the .qmd file
        input: String,

        /// Base name of the generated files
        #[arg(long, default_value = "presentation")]
        name: String,

        /// Title used for the presentation directory (defaults to the file stem)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Run the whole workflow: draft, render and voice
    Create {
        /// What the presentation should teach
        prompt: String,

        /// Presentation title (defaults to the start of the prompt)
        #[arg(short, long)]
        title: Option<String>,

        /// Base name of the generated files
        #[arg(long, default_value = "presentation")]
        name: String,

        /// Number of slides
        #[arg(short = 'n', long)]
        slides: Option<u32>,
    },

    /// Start the web form
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
