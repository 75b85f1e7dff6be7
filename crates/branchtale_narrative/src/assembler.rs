//! Reconstructs a stored story for presentation.

use branchtale_core::{CompleteStoryNodeResponse, CompleteStoryResponse, Story, StoryNode};
use branchtale_error::{StoryError, StoryErrorKind};
use std::collections::BTreeMap;

/// Build the complete view of a story from its metadata and flat node list.
///
/// Nodes are indexed by id and the unique root is located. Nodes are not
/// checked for reachability; an orphan still appears in `all_nodes`.
///
/// # Errors
///
/// - [`StoryErrorKind::RootNotFound`] if no node is marked as root.
/// - [`StoryErrorKind::Integrity`] if several nodes are marked as root, a node
///   belongs to another story, or two nodes share an id.
pub fn assemble_story(
    story: Story,
    nodes: Vec<StoryNode>,
) -> Result<CompleteStoryResponse, StoryError> {
    let mut all_nodes = BTreeMap::new();
    let mut root_id = None;

    for node in nodes {
        if node.story_id != story.id {
            return Err(StoryError::new(StoryErrorKind::Integrity(format!(
                "node {} belongs to story {}, not {}",
                node.id, node.story_id, story.id
            ))));
        }
        if node.is_root {
            if let Some(existing) = root_id {
                return Err(StoryError::new(StoryErrorKind::Integrity(format!(
                    "story {} has several roots: {} and {}",
                    story.id, existing, node.id
                ))));
            }
            root_id = Some(node.id);
        }
        let id = node.id;
        if all_nodes
            .insert(id, CompleteStoryNodeResponse::from(node))
            .is_some()
        {
            return Err(StoryError::new(StoryErrorKind::Integrity(format!(
                "story {} has duplicate node id {}",
                story.id, id
            ))));
        }
    }

    let root_node = root_id
        .and_then(|id| all_nodes.get(&id).cloned())
        .ok_or_else(|| StoryError::new(StoryErrorKind::RootNotFound(story.id)))?;

    Ok(CompleteStoryResponse::new(story, root_node, all_nodes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchtale_core::StoryOption;
    use chrono::Utc;

    fn story() -> Story {
        Story {
            id: 4,
            title: "Sunken Bell".to_string(),
            session_id: Some("s".to_string()),
            created_at: Utc::now(),
        }
    }

    fn node(id: i32, is_root: bool, options: Vec<StoryOption>) -> StoryNode {
        StoryNode {
            id,
            story_id: 4,
            content: format!("node {}", id),
            is_root,
            is_ending: options.is_empty(),
            is_winning_ending: false,
            options,
        }
    }

    #[test]
    fn test_assembles_root_and_index() {
        let nodes = vec![
            node(11, true, vec![StoryOption::new("Ring it", 12)]),
            node(12, false, vec![]),
        ];
        let complete = assemble_story(story(), nodes).unwrap();

        assert_eq!(complete.id, 4);
        assert_eq!(complete.title, "Sunken Bell");
        assert_eq!(complete.root_node.id, 11);
        assert!(complete.root_node.is_root);
        assert_eq!(complete.all_nodes.len(), 2);
        assert_eq!(complete.all_nodes[&11], complete.root_node);
    }

    #[test]
    fn test_no_root() {
        let err = assemble_story(story(), vec![node(1, false, vec![])]).unwrap_err();
        assert_eq!(err.kind, StoryErrorKind::RootNotFound(4));
    }

    #[test]
    fn test_empty_story_has_no_root() {
        let err = assemble_story(story(), vec![]).unwrap_err();
        assert_eq!(err.kind, StoryErrorKind::RootNotFound(4));
    }

    #[test]
    fn test_two_roots() {
        let err = assemble_story(story(), vec![node(1, true, vec![]), node(2, true, vec![])])
            .unwrap_err();
        assert!(matches!(err.kind, StoryErrorKind::Integrity(_)));
    }

    #[test]
    fn test_foreign_node() {
        let mut stray = node(9, false, vec![]);
        stray.story_id = 5;
        let err = assemble_story(story(), vec![node(1, true, vec![]), stray]).unwrap_err();
        assert!(matches!(err.kind, StoryErrorKind::Integrity(_)));
    }
}
