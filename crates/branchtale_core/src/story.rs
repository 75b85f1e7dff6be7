//! Persisted story records.

use branchtale_error::{StoryError, StoryErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on options per non-ending node.
pub const MAX_OPTIONS_PER_NODE: usize = 3;

/// A generated adventure. Owns its nodes through `StoryNode::story_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Store-assigned identifier
    pub id: i32,
    /// Title chosen by the model
    pub title: String,
    /// Session that requested the story
    pub session_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A labeled transition from one node to another node of the same story.
///
/// # Examples
///
/// ```
/// use branchtale_core::StoryOption;
///
/// let option = StoryOption::new("Open the mysterious door", 5);
/// let json = serde_json::to_string(&option).unwrap();
/// assert_eq!(json, r#"{"text":"Open the mysterious door","node_id":5}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryOption {
    /// Choice shown to the reader
    pub text: String,
    /// Node the choice leads to
    pub node_id: i32,
}

impl StoryOption {
    /// Create a new option.
    pub fn new(text: impl Into<String>, node_id: i32) -> Self {
        Self {
            text: text.into(),
            node_id,
        }
    }
}

/// One narrative segment of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNode {
    /// Store-assigned identifier
    pub id: i32,
    /// Owning story
    pub story_id: i32,
    /// Narrative text
    pub content: String,
    /// Entry point of the story
    pub is_root: bool,
    /// Ending nodes have no options
    pub is_ending: bool,
    /// Ending flagged as a successful outcome
    pub is_winning_ending: bool,
    /// Choices in presentation order
    pub options: Vec<StoryOption>,
}

impl StoryNode {
    /// Check the per-node shape invariant.
    ///
    /// Endings carry no options, other nodes carry one to three, and only
    /// endings may be winning endings.
    pub fn check_shape(&self) -> Result<(), StoryError> {
        if self.is_ending {
            if !self.options.is_empty() {
                return Err(integrity(format!(
                    "ending node {} has {} options",
                    self.id,
                    self.options.len()
                )));
            }
        } else {
            if self.is_winning_ending {
                return Err(integrity(format!(
                    "node {} is a winning ending but not an ending",
                    self.id
                )));
            }
            if self.options.is_empty() || self.options.len() > MAX_OPTIONS_PER_NODE {
                return Err(integrity(format!(
                    "node {} has {} options, expected 1 to {}",
                    self.id,
                    self.options.len(),
                    MAX_OPTIONS_PER_NODE
                )));
            }
        }
        Ok(())
    }
}

#[track_caller]
fn integrity(message: String) -> StoryError {
    StoryError::new(StoryErrorKind::Integrity(message))
}

/// Node data handed to a store before it has an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStoryNode {
    /// Owning story
    pub story_id: i32,
    /// Narrative text
    pub content: String,
    /// Entry point of the story
    pub is_root: bool,
    /// Ending nodes have no options
    pub is_ending: bool,
    /// Ending flagged as a successful outcome
    pub is_winning_ending: bool,
}

impl NewStoryNode {
    /// Attach a store-assigned id, with an empty option list.
    pub fn with_id(self, id: i32) -> StoryNode {
        StoryNode {
            id,
            story_id: self.story_id,
            content: self.content,
            is_root: self.is_root,
            is_ending: self.is_ending,
            is_winning_ending: self.is_winning_ending,
            options: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(is_ending: bool, is_winning_ending: bool, options: usize) -> StoryNode {
        StoryNode {
            id: 1,
            story_id: 1,
            content: "A fork in the road".to_string(),
            is_root: false,
            is_ending,
            is_winning_ending,
            options: (0..options)
                .map(|i| StoryOption::new(format!("Path {}", i), i as i32 + 2))
                .collect(),
        }
    }

    #[test]
    fn test_ending_without_options_is_valid() {
        assert!(node(true, true, 0).check_shape().is_ok());
    }

    #[test]
    fn test_ending_with_options_is_rejected() {
        assert!(node(true, false, 1).check_shape().is_err());
    }

    #[test]
    fn test_branching_bounds() {
        assert!(node(false, false, 0).check_shape().is_err());
        assert!(node(false, false, 1).check_shape().is_ok());
        assert!(node(false, false, 3).check_shape().is_ok());
        assert!(node(false, false, 4).check_shape().is_err());
    }

    #[test]
    fn test_winning_flag_requires_ending() {
        let err = node(false, true, 2).check_shape().unwrap_err();
        match err.kind {
            StoryErrorKind::Integrity(msg) => assert!(msg.contains("winning"), "{}", msg),
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
