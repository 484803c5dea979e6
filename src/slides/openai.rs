//! OpenAI chat-completion slide drafter.

use super::{strip_code_fence, SlideDrafter};
use crate::config::Prompts;
use crate::error::{ChalktalkError, Result};
use crate::openai::create_client_with_timeout;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Drafts slides with a single user message to the chat completion API.
pub struct OpenAIDrafter {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl OpenAIDrafter {
    /// Create a drafter for the given model and prompts.
    pub fn new(model: &str, prompts: Prompts, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
            prompts,
        })
    }

    /// Render the user prompt for a topic.
    pub fn build_prompt(&self, topic: &str, title: &str, num_slides: u32) -> String {
        let mut vars = HashMap::new();
        vars.insert("topic".to_string(), topic.to_string());
        vars.insert("title".to_string(), title.to_string());
        vars.insert("num_slides".to_string(), num_slides.to_string());
        vars.insert("demo".to_string(), self.prompts.slides.demo.clone());

        self.prompts.render_with_custom(&self.prompts.slides.user, &vars)
    }
}

#[async_trait]
impl SlideDrafter for OpenAIDrafter {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn draft(&self, topic: &str, title: &str, num_slides: u32) -> Result<String> {
        info!("Drafting {} slides", num_slides);

        let prompt = self.build_prompt(topic, title, num_slides);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| ChalktalkError::Generation(e.to_string()))?
                .into()])
            .build()
            .map_err(|e| ChalktalkError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            ChalktalkError::OpenAI(format!("Failed to generate slides: {}", e))
        })?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ChalktalkError::Generation("Empty response from LLM".to_string()))?;

        debug!("Received {} characters of slide content", content.len());

        Ok(strip_code_fence(content).to_string())
    }
}
