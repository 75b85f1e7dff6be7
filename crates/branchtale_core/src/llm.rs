//! Nested story structure the language model is asked to produce.
//!
//! Field names follow the camelCase JSON the prompt requests:
//!
//! ```json
//! {
//!   "title": "Story Title",
//!   "rootNode": {
//!     "content": "The starting situation.",
//!     "isEnding": false,
//!     "isWinningEnding": false,
//!     "options": [
//!       { "text": "Option 1", "nextNode": { "content": "...", "isEnding": true, "isWinningEnding": true } }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryLlmResponse {
    /// Story title
    pub title: String,
    /// Entry node of the story
    pub root_node: StoryNodeLlm,
}

/// One node of the model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNodeLlm {
    /// Narrative text
    pub content: String,
    /// Whether the story ends here
    pub is_ending: bool,
    /// Whether this ending is a success
    #[serde(default)]
    pub is_winning_ending: bool,
    /// Choices leading to child nodes
    #[serde(default)]
    pub options: Vec<StoryOptionLlm>,
}

/// One choice of the model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryOptionLlm {
    /// Choice text
    pub text: String,
    /// Node reached by this choice; required unless the parent is an ending
    #[serde(default)]
    pub next_node: Option<Box<StoryNodeLlm>>,
}

impl StoryNodeLlm {
    /// Number of nodes in this subtree, counting this one.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .options
            .iter()
            .filter_map(|o| o.next_node.as_deref())
            .map(StoryNodeLlm::subtree_size)
            .sum::<usize>()
    }

    /// Depth of this subtree, where a lone node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .options
            .iter()
            .filter_map(|o| o.next_node.as_deref())
            .map(StoryNodeLlm::depth)
            .max()
            .unwrap_or(0)
    }
}
