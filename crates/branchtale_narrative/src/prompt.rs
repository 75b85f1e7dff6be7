//! Prompt assembly for story generation.

use branchtale_core::{GenerateRequest, Message};
use branchtale_error::{StoryError, StoryErrorKind};
use derive_builder::Builder;
use derive_getters::Getters;

/// Default model used for generation.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = r#"You write choose-your-own-adventure stories.
Produce one complete branching story for the theme the user gives you.

The story needs:
1. A short, evocative title.
2. A root node describing the opening situation, with 2 or 3 options.
3. Options that each lead to a new node with its own options, until an ending.
4. A mix of good and bad endings, with at least one winning ending.

Structure rules:
- Every node that is not an ending has 2 or 3 options.
- Ending nodes have no options.
- The story is 3 to 4 levels deep, counting the root.
- Vary the path lengths so some branches end sooner than others.

Reply with a single JSON object and nothing else, shaped like this:
{
  "title": "Story Title",
  "rootNode": {
    "content": "The opening situation.",
    "isEnding": false,
    "isWinningEnding": false,
    "options": [
      {
        "text": "Option 1 text",
        "nextNode": {
          "content": "What happens after option 1.",
          "isEnding": true,
          "isWinningEnding": true,
          "options": []
        }
      }
    ]
  }
}

Write out every node in full; do not abbreviate or elide branches."#;

/// Builds the generation request for a theme.
///
/// # Examples
///
/// ```
/// use branchtale_core::Role;
/// use branchtale_narrative::StoryPrompt;
///
/// let request = StoryPrompt::default().render("haunted lighthouse").unwrap();
/// assert_eq!(request.messages()[0].role, Role::System);
/// assert_eq!(
///     request.messages()[1].content,
///     "Create a story with the theme: haunted lighthouse"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Builder)]
#[builder(setter(into))]
pub struct StoryPrompt {
    /// Model to request; `None` defers to the driver's default
    #[builder(default = "Some(DEFAULT_MODEL.to_string())")]
    model: Option<String>,
    /// Sampling temperature
    #[builder(default = "Some(DEFAULT_TEMPERATURE)")]
    temperature: Option<f32>,
    /// Completion token cap
    #[builder(default)]
    max_tokens: Option<u32>,
}

impl Default for StoryPrompt {
    fn default() -> Self {
        Self {
            model: Some(DEFAULT_MODEL.to_string()),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
        }
    }
}

impl StoryPrompt {
    /// Create a builder.
    pub fn builder() -> StoryPromptBuilder {
        StoryPromptBuilder::default()
    }

    /// The system instructions sent with every request.
    pub fn system_prompt() -> &'static str {
        SYSTEM_PROMPT
    }

    /// Render the request for `theme`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a blank theme.
    pub fn render(&self, theme: &str) -> Result<GenerateRequest, StoryError> {
        let theme = theme.trim();
        if theme.is_empty() {
            return Err(StoryError::new(StoryErrorKind::InvalidInput(
                "theme must not be empty".to_string(),
            )));
        }

        GenerateRequest::builder()
            .messages(vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(format!("Create a story with the theme: {}", theme)),
            ])
            .model(self.model.clone())
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| {
                StoryError::new(StoryErrorKind::InvalidInput(format!(
                    "Failed to build request: {}",
                    e
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = StoryPrompt::default().render("pirates").unwrap();
        assert_eq!(request.model().as_deref(), Some(DEFAULT_MODEL));
        assert_eq!(*request.temperature(), Some(DEFAULT_TEMPERATURE));
        assert_eq!(request.messages().len(), 2);
    }

    #[test]
    fn test_builder_overrides() {
        let prompt = StoryPrompt::builder()
            .model(Some("gpt-4o".to_string()))
            .max_tokens(Some(4096))
            .build()
            .unwrap();
        assert_eq!(*prompt.temperature(), Some(DEFAULT_TEMPERATURE));
        let request = prompt.render("space").unwrap();
        assert_eq!(request.model().as_deref(), Some("gpt-4o"));
        assert_eq!(*request.max_tokens(), Some(4096));
    }

    #[test]
    fn test_theme_is_trimmed() {
        let request = StoryPrompt::default().render("  desert  ").unwrap();
        assert_eq!(request.messages()[1].content, "Create a story with the theme: desert");
    }

    #[test]
    fn test_blank_theme_is_rejected() {
        assert!(StoryPrompt::default().render("   ").is_err());
    }

    #[test]
    fn test_system_prompt_describes_schema() {
        for field in ["rootNode", "isEnding", "isWinningEnding", "nextNode"] {
            assert!(StoryPrompt::system_prompt().contains(field), "{}", field);
        }
    }
}
