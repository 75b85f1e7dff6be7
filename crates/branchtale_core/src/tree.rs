//! Validated story trees and tree-building results.

use crate::{StoryLlmResponse, StoryNodeLlm, MAX_OPTIONS_PER_NODE};
use branchtale_error::StoryError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Structural bounds enforced on model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLimits {
    /// Maximum depth, counting the root as depth 1
    pub max_depth: usize,
    /// Maximum options per non-ending node, capped at [`MAX_OPTIONS_PER_NODE`]
    pub max_branching: usize,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_branching: MAX_OPTIONS_PER_NODE,
        }
    }
}

impl TreeLimits {
    fn branching(&self) -> usize {
        self.max_branching.clamp(1, MAX_OPTIONS_PER_NODE)
    }
}

/// Model output that passed schema and shape validation.
///
/// Only [`ValidatedStory::validate`] constructs this type, so anything holding
/// one can build a tree without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ValidatedStory {
    /// Story title, trimmed
    title: String,
    /// Root of the nested structure
    root: StoryNodeLlm,
    /// Number of nodes the tree will materialize
    node_count: usize,
    /// Depth of the tree
    depth: usize,
}

impl ValidatedStory {
    /// Validate a parsed model response against `limits`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending path, e.g.
    /// `rootNode.options[1].nextNode: missing nextNode on non-ending node`.
    pub fn validate(response: StoryLlmResponse, limits: &TreeLimits) -> Result<Self, StoryError> {
        let title = response.title.trim().to_string();
        if title.is_empty() {
            return Err(StoryError::validation("title is empty"));
        }

        validate_node(&response.root_node, "rootNode", 1, limits)?;

        Ok(Self {
            title,
            node_count: response.root_node.subtree_size(),
            depth: response.root_node.depth(),
            root: response.root_node,
        })
    }
}

fn validate_node(
    node: &StoryNodeLlm,
    path: &str,
    depth: usize,
    limits: &TreeLimits,
) -> Result<(), StoryError> {
    if depth > limits.max_depth {
        return Err(StoryError::validation(format!(
            "{}: depth {} exceeds maximum of {}",
            path, depth, limits.max_depth
        )));
    }
    if node.content.trim().is_empty() {
        return Err(StoryError::validation(format!("{}: content is empty", path)));
    }

    if node.is_ending {
        if !node.options.is_empty() {
            return Err(StoryError::validation(format!(
                "{}: ending node has {} options",
                path,
                node.options.len()
            )));
        }
        return Ok(());
    }

    if node.is_winning_ending {
        return Err(StoryError::validation(format!(
            "{}: isWinningEnding set on non-ending node",
            path
        )));
    }

    let max = limits.branching();
    if node.options.is_empty() || node.options.len() > max {
        return Err(StoryError::validation(format!(
            "{}: non-ending node has {} options, expected 1 to {}",
            path,
            node.options.len(),
            max
        )));
    }

    for (i, option) in node.options.iter().enumerate() {
        let option_path = format!("{}.options[{}]", path, i);
        if option.text.trim().is_empty() {
            return Err(StoryError::validation(format!(
                "{}: option text is empty",
                option_path
            )));
        }
        let child = option.next_node.as_deref().ok_or_else(|| {
            StoryError::validation(format!(
                "{}: missing nextNode on non-ending node",
                option_path
            ))
        })?;
        validate_node(child, &format!("{}.nextNode", option_path), depth + 1, limits)?;
    }

    Ok(())
}

/// What a tree build materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TreeSummary {
    /// Identifier of the root node
    root_id: i32,
    /// Nodes created
    node_count: usize,
    /// Ending nodes created
    ending_count: usize,
    /// Winning ending nodes created
    winning_count: usize,
    /// Deepest level reached, root = 1
    max_depth: usize,
}

impl TreeSummary {
    /// Create a summary.
    pub fn new(
        root_id: i32,
        node_count: usize,
        ending_count: usize,
        winning_count: usize,
        max_depth: usize,
    ) -> Self {
        Self {
            root_id,
            node_count,
            ending_count,
            winning_count,
            max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchtale_error::StoryErrorKind;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<ValidatedStory, StoryError> {
        let response: StoryLlmResponse = serde_json::from_value(value).unwrap();
        ValidatedStory::validate(response, &TreeLimits::default())
    }

    fn ending(content: &str, winning: bool) -> serde_json::Value {
        json!({"content": content, "isEnding": true, "isWinningEnding": winning, "options": []})
    }

    #[test]
    fn test_valid_tree() {
        let story = parse(json!({
            "title": "  Sunken City  ",
            "rootNode": {
                "content": "You dive.",
                "isEnding": false,
                "isWinningEnding": false,
                "options": [
                    {"text": "Swim down", "nextNode": ending("Treasure!", true)},
                    {"text": "Surface", "nextNode": ending("You give up.", false)}
                ]
            }
        }))
        .unwrap();
        assert_eq!(story.title(), "Sunken City");
        assert_eq!(*story.node_count(), 3);
        assert_eq!(*story.depth(), 2);
    }

    #[test]
    fn test_missing_next_node_is_rejected() {
        let err = parse(json!({
            "title": "t",
            "rootNode": {
                "content": "c",
                "isEnding": false,
                "options": [{"text": "go"}]
            }
        }))
        .unwrap_err();
        match err.kind {
            StoryErrorKind::Validation(msg) => {
                assert!(msg.starts_with("rootNode.options[0]"), "{}", msg);
                assert!(msg.contains("nextNode"));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_too_many_options_is_rejected() {
        let options: Vec<_> = (0..4)
            .map(|i| json!({"text": format!("o{}", i), "nextNode": ending("end", false)}))
            .collect();
        let result = parse(json!({
            "title": "t",
            "rootNode": {"content": "c", "isEnding": false, "options": options}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_ending_leaf_is_rejected() {
        let result = parse(json!({
            "title": "t",
            "rootNode": {"content": "c", "isEnding": false, "options": []}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_ending_with_options_is_rejected() {
        let result = parse(json!({
            "title": "t",
            "rootNode": {
                "content": "c",
                "isEnding": true,
                "options": [{"text": "o", "nextNode": ending("e", false)}]
            }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_depth_guard() {
        let mut node = ending("bottom", true);
        for level in 0..6 {
            node = json!({
                "content": format!("level {}", level),
                "isEnding": false,
                "options": [{"text": "deeper", "nextNode": node}]
            });
        }
        // 7 levels against a limit of 6
        let err = parse(json!({"title": "deep", "rootNode": node})).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let result = parse(json!({"title": "   ", "rootNode": ending("e", false)}));
        assert!(result.is_err());
    }

    #[test]
    fn test_branching_is_capped() {
        let limits = TreeLimits {
            max_depth: 4,
            max_branching: 10,
        };
        assert_eq!(limits.branching(), MAX_OPTIONS_PER_NODE);
    }
}
