//! Turns raw model output into a validated story.

use crate::{extract_json, parse_json};
use branchtale_core::{StoryLlmResponse, TreeLimits, ValidatedStory};
use branchtale_error::StoryError;
use tracing::instrument;

/// Parse and validate the raw text returned by the model.
///
/// The JSON document is located (fenced block or first balanced object),
/// deserialized into the nested story schema, and checked against `limits`.
///
/// # Errors
///
/// Every failure is a [`branchtale_error::StoryErrorKind::Validation`] error.
///
/// # Examples
///
/// ```
/// use branchtale_core::TreeLimits;
/// use branchtale_narrative::parse_story_response;
///
/// let raw = r#"Here you go:
/// {"title": "Fog", "rootNode": {"content": "Fog everywhere.", "isEnding": true, "isWinningEnding": false}}"#;
///
/// let story = parse_story_response(raw, &TreeLimits::default()).unwrap();
/// assert_eq!(story.title(), "Fog");
/// assert_eq!(*story.node_count(), 1);
/// ```
#[instrument(skip(raw, limits), fields(raw_len = raw.len()))]
pub fn parse_story_response(raw: &str, limits: &TreeLimits) -> Result<ValidatedStory, StoryError> {
    let json = extract_json(raw)?;
    let response: StoryLlmResponse = parse_json(&json)?;
    let story = ValidatedStory::validate(response, limits)?;

    tracing::debug!(
        title = %story.title(),
        nodes = story.node_count(),
        depth = story.depth(),
        "Parsed story response"
    );

    Ok(story)
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchtale_error::StoryErrorKind;

    const FENCED: &str = r#"Certainly! Here is your adventure.

```json
{
  "title": "The Clockwork Forest",
  "rootNode": {
    "content": "Gears tick in the trees.",
    "isEnding": false,
    "isWinningEnding": false,
    "options": [
      {"text": "Follow the ticking", "nextNode": {"content": "You find the heart of the forest.", "isEnding": true, "isWinningEnding": true, "options": []}},
      {"text": "Cover your ears", "nextNode": {"content": "You wander forever.", "isEnding": true, "isWinningEnding": false, "options": []}}
    ]
  }
}
```
"#;

    fn kind(err: StoryError) -> StoryErrorKind {
        err.kind
    }

    #[test]
    fn test_fenced_response() {
        let story = parse_story_response(FENCED, &TreeLimits::default()).unwrap();
        assert_eq!(story.title(), "The Clockwork Forest");
        assert_eq!(*story.node_count(), 3);
        assert_eq!(story.root().options[0].text, "Follow the ticking");
    }

    #[test]
    fn test_malformed_json_is_validation_error() {
        let raw = r#"{"title": "Broken", "rootNode": {"content": "x", "isEnding": false,, }}"#;
        let err = parse_story_response(raw, &TreeLimits::default()).unwrap_err();
        assert!(matches!(kind(err), StoryErrorKind::Validation(_)));
    }

    #[test]
    fn test_missing_root_is_validation_error() {
        let err = parse_story_response(r#"{"title": "No root"}"#, &TreeLimits::default())
            .unwrap_err();
        match kind(err) {
            StoryErrorKind::Validation(msg) => assert!(msg.contains("rootNode"), "{}", msg),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_prose_only_is_validation_error() {
        let err = parse_story_response("I cannot write that story.", &TreeLimits::default())
            .unwrap_err();
        assert!(matches!(kind(err), StoryErrorKind::Validation(_)));
    }

    #[test]
    fn test_branching_limit_is_applied() {
        let limits = TreeLimits {
            max_depth: 6,
            max_branching: 1,
        };
        assert!(parse_story_response(FENCED, &limits).is_err());
    }
}
