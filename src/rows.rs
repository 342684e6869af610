//! Flattened rows for presenting a type tree

use crate::state::{CheckState, CheckedMap, ExpandedMap, state_of};
use crate::tree::{TreeNode, TypeTree};

/// One visible row of the tree, in render order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Node key, to hand back to the session callbacks
    pub key: String,
    /// Display label
    pub label: String,
    /// Nesting depth, roots are 0
    pub depth: usize,
    /// Whether the row is a directory
    pub is_dir: bool,
    /// Checkbox state
    pub state: CheckState,
    /// Expansion flag, `None` for leaves
    pub expanded: Option<bool>,
}

/// Walk the tree in render order, skipping children of collapsed directories
pub fn visible_rows(tree: &TypeTree, checked: &CheckedMap, expanded: &ExpandedMap) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for node in tree.roots() {
        push_rows(node, 0, checked, expanded, &mut rows);
    }
    rows
}

fn push_rows(
    node: &TreeNode,
    depth: usize,
    checked: &CheckedMap,
    expanded: &ExpandedMap,
    rows: &mut Vec<TreeRow>,
) {
    let is_open = node.is_dir().then(|| expanded.is_expanded(node.key()));
    rows.push(TreeRow {
        key: node.key().to_string(),
        label: node.label().to_string(),
        depth,
        is_dir: node.is_dir(),
        state: state_of(node, checked),
        expanded: is_open,
    });
    if is_open == Some(true) {
        for child in node.children() {
            push_rows(child, depth + 1, checked, expanded, rows);
        }
    }
}
