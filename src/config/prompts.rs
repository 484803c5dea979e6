//! Prompt templates for Chalktalk.
//!
//! Prompts can be customized by placing a `slides.toml` (and optionally a
//! `demo.qmd` example deck) in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub slides: SlidePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for drafting slide content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidePrompts {
    pub user: String,
    /// Example deck shown to the model as the target format.
    pub demo: String,
}

impl Default for SlidePrompts {
    fn default() -> Self {
        Self {
            user: r#"Please create a presentation titled "{{title}}" on the topic described below: "{{topic}}". It should consist of {{num_slides}} slides.

Each slide should have a title and content formatted as per the following chalktalk demo:

{{demo}}

Important:
- Note how each bullet point is nested inside its own fragment with its own tts-script.
- When discussing code concepts, include actual code blocks. Each code block is its own fragment with its own tts-script.
- In summary, you have short bullet points or code blocks wrapped in fragments with tts-scripts.

Please provide the output directly in the required format, without any additional explanations or JSON formatting."#
                .to_string(),

            demo: r#"## What Is a Variable?

::: {.fragment data-tts="A variable is a name that refers to a value stored in memory."}
- A name bound to a value
:::

::: {.fragment data-tts="You create one with a simple assignment, like this."}
```python
greeting = "hello"
```
:::

::: {.fragment data-tts="Variables can be reassigned later, even to a different type."}
- Names can be rebound
:::

## Why Types Matter

::: {.fragment data-tts="Every value has a type, and the type decides which operations make sense."}
- Types define valid operations
:::

::: {.fragment data-ttv="Let me show you what happens when you mix a string and a number."}
```python
"age: " + 42  # TypeError
```
:::"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let slides_path = custom_path.join("slides.toml");
            if slides_path.exists() {
                let content = std::fs::read_to_string(&slides_path)?;
                prompts.slides = toml::from_str(&content)?;
            }

            // A plain .qmd is easier to maintain than a TOML string
            let demo_path = custom_path.join("demo.qmd");
            if demo_path.exists() {
                prompts.slides.demo = std::fs::read_to_string(&demo_path)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.slides.user.contains("{{topic}}"));
        assert!(prompts.slides.demo.contains("data-tts"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_call_variables_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("audience".to_string(), "beginners".to_string());
        custom.insert("title".to_string(), "from config".to_string());

        let prompts = Prompts {
            variables: custom,
            ..Default::default()
        };

        let mut vars = HashMap::new();
        vars.insert("title".to_string(), "Loops".to_string());

        let out = prompts.render_with_custom("{{title}} for {{audience}}", &vars);
        assert_eq!(out, "Loops for beginners");
    }

    #[test]
    fn test_load_custom_demo() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("demo.qmd"), "## Custom demo").unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.slides.demo, "## Custom demo");
        assert!(prompts.slides.user.contains("{{demo}}"));
    }
}
