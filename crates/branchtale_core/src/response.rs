//! Read views returned to callers.

use crate::{JobStatus, Story, StoryJob, StoryNode, StoryOption};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Full representation of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteStoryNodeResponse {
    /// Node identifier
    pub id: i32,
    /// Narrative text
    pub content: String,
    /// Entry point of the story
    pub is_root: bool,
    /// Whether the story ends here
    pub is_ending: bool,
    /// Whether this ending is a success
    pub is_winning_ending: bool,
    /// Choices in presentation order
    pub options: Vec<StoryOption>,
}

impl From<StoryNode> for CompleteStoryNodeResponse {
    fn from(node: StoryNode) -> Self {
        Self {
            id: node.id,
            content: node.content,
            is_root: node.is_root,
            is_ending: node.is_ending,
            is_winning_ending: node.is_winning_ending,
            options: node.options,
        }
    }
}

/// A story with its root and every node, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteStoryResponse {
    /// Story identifier
    pub id: i32,
    /// Story title
    pub title: String,
    /// Session that requested the story
    pub session_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Entry node
    pub root_node: CompleteStoryNodeResponse,
    /// Every node of the story
    pub all_nodes: BTreeMap<i32, CompleteStoryNodeResponse>,
}

impl CompleteStoryResponse {
    /// Create a response from a story and its indexed nodes.
    pub fn new(
        story: Story,
        root_node: CompleteStoryNodeResponse,
        all_nodes: BTreeMap<i32, CompleteStoryNodeResponse>,
    ) -> Self {
        Self {
            id: story.id,
            title: story.title,
            session_id: story.session_id,
            created_at: story.created_at,
            root_node,
            all_nodes,
        }
    }

    /// Options whose target is not a node of this story, as `(node id, target id)`.
    pub fn dangling_options(&self) -> Vec<(i32, i32)> {
        self.all_nodes
            .values()
            .flat_map(|node| {
                node.options
                    .iter()
                    .filter(|option| !self.all_nodes.contains_key(&option.node_id))
                    .map(move |option| (node.id, option.node_id))
            })
            .collect()
    }

    /// Identifiers reachable from the root by following options.
    pub fn reachable_ids(&self) -> BTreeSet<i32> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![self.root_node.id];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(node) = self.all_nodes.get(&id) {
                stack.extend(node.options.iter().map(|o| o.node_id));
            }
        }
        seen
    }

    /// Number of ending nodes.
    pub fn ending_count(&self) -> usize {
        self.all_nodes.values().filter(|n| n.is_ending).count()
    }

    /// Number of winning ending nodes.
    pub fn winning_count(&self) -> usize {
        self.all_nodes.values().filter(|n| n.is_winning_ending).count()
    }
}

/// Job status as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryJobResponse {
    /// Job identifier
    pub job_id: String,
    /// Current state
    pub status: JobStatus,
    /// Generated story, once completed
    pub story_id: Option<i32>,
    /// Failure text, once failed
    pub error: Option<String>,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Time the job reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&StoryJob> for StoryJobResponse {
    fn from(job: &StoryJob) -> Self {
        Self {
            job_id: job.job_id().clone(),
            status: *job.status(),
            story_id: *job.story_id(),
            error: job.error().clone(),
            created_at: *job.created_at(),
            completed_at: *job.completed_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i32, is_root: bool, targets: &[i32]) -> CompleteStoryNodeResponse {
        CompleteStoryNodeResponse {
            id,
            content: format!("node {}", id),
            is_root,
            is_ending: targets.is_empty(),
            is_winning_ending: false,
            options: targets
                .iter()
                .map(|t| StoryOption::new(format!("to {}", t), *t))
                .collect(),
        }
    }

    fn response(nodes: Vec<CompleteStoryNodeResponse>) -> CompleteStoryResponse {
        let all: BTreeMap<_, _> = nodes.into_iter().map(|n| (n.id, n)).collect();
        let root = all.values().find(|n| n.is_root).cloned().unwrap();
        CompleteStoryResponse::new(
            Story {
                id: 1,
                title: "t".to_string(),
                session_id: None,
                created_at: Utc::now(),
            },
            root,
            all,
        )
    }

    #[test]
    fn test_reachable_and_dangling() {
        let story = response(vec![node(1, true, &[2, 3]), node(2, false, &[]), node(3, false, &[9])]);
        assert_eq!(story.dangling_options(), vec![(3, 9)]);
        let reachable = story.reachable_ids();
        assert!(reachable.contains(&1) && reachable.contains(&2) && reachable.contains(&3));
    }

    #[test]
    fn test_all_nodes_serializes_with_string_keys() {
        let story = response(vec![node(1, true, &[2]), node(2, false, &[])]);
        let value = serde_json::to_value(&story).unwrap();
        assert!(value["all_nodes"]["1"].is_object());
        assert_eq!(value["root_node"]["is_root"], true);
    }
}
