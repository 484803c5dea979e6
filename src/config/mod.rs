//! Configuration module for Chalktalk.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, SlidePrompts};
pub use settings::{
    AvatarSettings, GeneralSettings, LlmSettings, PromptSettings, RenderSettings, Settings,
    SpeechProvider, SpeechSettings,
};
