//! Chalktalk - narrated slide decks from a prompt
//!
//! A CLI tool and small web form that turns a topic into a reveal.js
//! presentation whose fragments are read aloud.
//!
//! # Overview
//!
//! Chalktalk allows you to:
//! - Draft Quarto slide markdown with an LLM
//! - Render it to reveal.js HTML with `quarto render`
//! - Voice every `data-tts` fragment (and `data-ttv` avatar fragment) with a
//!   cloud speech service
//! - Play the deck hands-free with auto-advance, speed and volume controls
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `slides` - LLM slide drafting
//! - `render` - Quarto subprocess
//! - `speech` - Speech and avatar synthesis
//! - `media` - Media kinds and duration probing
//! - `fragments` - HTML fragment extraction and rewriting
//! - `workspace` - Per-presentation directories
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use chalktalk::config::Settings;
//! use chalktalk::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator
//!         .create_from_prompt("How DNS resolution works", None, "presentation", 5)
//!         .await?;
//!     println!("Open {}", result.final_html.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fragments;
pub mod media;
pub mod openai;
pub mod orchestrator;
pub mod render;
pub mod slides;
pub mod speech;
pub mod workspace;

pub use error::{ChalktalkError, Result};
