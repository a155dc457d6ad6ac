//! Debug pretty-printer for a node tree. No stability contract on the exact
//! output format; this exists for diagnostics only.

use std::fmt::Write as _;

use itertools::Itertools;
use scene_common::tag::Root;

use crate::graph::SceneGraph;
use crate::node_id::NodeId;

/// Returns a depth-first summary of the subtree rooted at `node`, collapsing
/// runs of identical immediate subtrees with a `[count]` prefix.
///
/// Ported from the source engine's `node_tree_summary`; the label for each
/// node is supplied by the caller since Rust nodes carry no runtime type
/// name by default.
#[must_use]
pub fn node_tree_summary(graph: &SceneGraph, node: NodeId, label: impl Fn(NodeId) -> String) -> String {
    summarize(graph, node, &label, "    ", "")
}

fn summarize(
    graph: &SceneGraph,
    node: NodeId,
    label: &impl Fn(NodeId) -> String,
    indent: &str,
    prefix: &str,
) -> String {
    let mut tree_string = format!("{prefix}{}", label(node));

    let child_prefix = format!("{prefix}{indent}");
    let subtrees = graph
        .children_by_tag_iter(node, Root::tag())
        .map(|child| summarize(graph, child, label, indent, &child_prefix))
        .counts();

    for (subtree_string, count) in subtrees
        .into_iter()
        .sorted_by(|(_, a), (_, b)| b.cmp(a))
    {
        let indent_length = child_prefix.len();
        let (head, tail) = subtree_string.split_at(indent_length);
        let _ = write!(tree_string, "\n{head}[{count}] {tail}");
    }

    tree_string
}
