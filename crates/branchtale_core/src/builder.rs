//! Materializes a validated story into persisted nodes.

use crate::{NewStoryNode, StoryNodeLlm, StoryOption, TreeSummary, ValidatedStory};

/// Target of a tree build.
///
/// A sink assigns an identifier to each inserted node immediately, which is
/// what lets a parent record its children's ids in its option list.
pub trait NodeSink {
    /// Error raised by the underlying store.
    type Error;

    /// Insert a node with an empty option list and return its id.
    fn insert_node(&mut self, node: NewStoryNode) -> Result<i32, Self::Error>;

    /// Replace the option list of an inserted node.
    fn set_options(&mut self, node_id: i32, options: Vec<StoryOption>) -> Result<(), Self::Error>;
}

#[derive(Default)]
struct BuildStats {
    nodes: usize,
    endings: usize,
    winning: usize,
    max_depth: usize,
}

/// Create one node per element of `story`, depth-first, root first.
///
/// Each child is materialized before its parent's option list is written, and
/// options keep the order the model gave them. Ending nodes keep an empty
/// option list. The first sink error aborts the build; undoing partial work is
/// the caller's transaction's job.
pub fn build_tree<S>(
    sink: &mut S,
    story_id: i32,
    story: &ValidatedStory,
) -> Result<TreeSummary, S::Error>
where
    S: NodeSink + ?Sized,
{
    let mut stats = BuildStats::default();
    let root_id = materialize(sink, story_id, story.root(), true, 1, &mut stats)?;
    Ok(TreeSummary::new(
        root_id,
        stats.nodes,
        stats.endings,
        stats.winning,
        stats.max_depth,
    ))
}

fn materialize<S>(
    sink: &mut S,
    story_id: i32,
    node: &StoryNodeLlm,
    is_root: bool,
    depth: usize,
    stats: &mut BuildStats,
) -> Result<i32, S::Error>
where
    S: NodeSink + ?Sized,
{
    let id = sink.insert_node(NewStoryNode {
        story_id,
        content: node.content.clone(),
        is_root,
        is_ending: node.is_ending,
        is_winning_ending: node.is_winning_ending,
    })?;

    stats.nodes += 1;
    stats.max_depth = stats.max_depth.max(depth);

    if node.is_ending {
        stats.endings += 1;
        if node.is_winning_ending {
            stats.winning += 1;
        }
        return Ok(id);
    }

    let mut options = Vec::with_capacity(node.options.len());
    for option in &node.options {
        // Validation guarantees every option of a non-ending node has a child
        if let Some(child) = option.next_node.as_deref() {
            let child_id = materialize(sink, story_id, child, false, depth + 1, stats)?;
            options.push(StoryOption::new(option.text.clone(), child_id));
        }
    }
    sink.set_options(id, options)?;

    Ok(id)
}
