//! Checkbox and expansion state of a type tree
//!
//! Only leaves have a stored checked value. A directory's checkbox is always
//! derived from its children by [`state_of`], so it can never disagree with
//! them. Expansion is tracked separately and never affects visibility.

use crate::tree::{TreeNode, TypeTree};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display state of a tri-state checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// Every leaf below is visible
    Checked,
    /// Every leaf below is hidden, or there are no leaves
    Unchecked,
    /// Leaves below are a mix of visible and hidden
    Indeterminate,
}

impl CheckState {
    /// Whether a checkbox in this state renders as ticked
    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }
}

/// Checked value per leaf key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckedMap {
    entries: HashMap<String, bool>,
}

impl CheckedMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Give every leaf of `tree` the same checked value
    pub fn initialized(tree: &TypeTree, value: bool) -> Self {
        let entries = tree
            .leaves()
            .into_iter()
            .map(|leaf| (leaf.key.clone(), value))
            .collect();
        Self { entries }
    }

    /// Checked value of a leaf; missing keys read as unchecked
    pub fn get(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Whether the map holds an entry for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set the checked value of a leaf
    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.entries.insert(key.into(), value);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expansion flag per directory key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedMap {
    default: bool,
    entries: HashMap<String, bool>,
}

impl ExpandedMap {
    /// Create an empty map whose missing keys read as `default`
    pub fn new(default: bool) -> Self {
        Self {
            default,
            entries: HashMap::new(),
        }
    }

    /// Give every directory of `tree` the value `default`
    pub fn initialized(tree: &TypeTree, default: bool) -> Self {
        let entries = tree
            .roots()
            .iter()
            .filter(|node| node.is_dir())
            .map(|node| (node.key().to_string(), default))
            .collect();
        Self { default, entries }
    }

    /// Whether the directory with this key shows its children
    pub fn is_expanded(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(self.default)
    }

    /// Value used for keys that have no entry
    pub fn default_value(&self) -> bool {
        self.default
    }

    /// Set the expansion flag of a directory
    pub fn set(&mut self, key: impl Into<String>, expanded: bool) {
        self.entries.insert(key.into(), expanded);
    }
}

impl Default for ExpandedMap {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Evaluate the checkbox state of a node
///
/// A leaf is checked when its entry is true. A directory without children
/// is unchecked. Otherwise a directory is checked or unchecked when all of
/// its children agree, and indeterminate as soon as they do not.
pub fn state_of(node: &TreeNode, checked: &CheckedMap) -> CheckState {
    let children = match node {
        TreeNode::Leaf(leaf) => {
            return if checked.get(&leaf.key) {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            };
        }
        TreeNode::Directory(dir) => dir.children(),
    };

    let mut has_checked = false;
    let mut has_unchecked = false;
    for child in children {
        match state_of(child, checked) {
            CheckState::Indeterminate => return CheckState::Indeterminate,
            CheckState::Checked => has_checked = true,
            CheckState::Unchecked => has_unchecked = true,
        }
        if has_checked && has_unchecked {
            return CheckState::Indeterminate;
        }
    }

    if has_checked {
        CheckState::Checked
    } else {
        CheckState::Unchecked
    }
}

/// Outcome of toggling a node's checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// Checked map with the whole subtree set to the new value
    pub checked: CheckedMap,
    /// Entity ids whose visibility has to change, in tree order
    pub affected_ids: Vec<String>,
}

/// Set a node and everything below it to `value`
///
/// The returned ids are exactly the node's own `object_ids`, so the caller
/// can apply the change with a single bulk visibility call.
pub fn toggle(node: &TreeNode, value: bool, checked: &CheckedMap) -> Toggle {
    let mut next = checked.clone();
    let mut leaves = Vec::new();
    node.collect_leaves(&mut leaves);
    for leaf in leaves {
        next.set(leaf.key.as_str(), value);
    }
    Toggle {
        checked: next,
        affected_ids: node.object_ids().to_vec(),
    }
}

/// Flip the expansion flag of `key`
///
/// A key without an entry starts from the map's default.
pub fn toggle_expand(key: &str, expanded: &ExpandedMap) -> ExpandedMap {
    let mut next = expanded.clone();
    next.set(key, !expanded.is_expanded(key));
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DirectoryNode, LeafNode};

    fn wall() -> TreeNode {
        let mut dir = DirectoryNode::new("Wall");
        dir.push_leaf(LeafNode::new("a", "W1"));
        dir.push_leaf(LeafNode::new("b", "W2"));
        TreeNode::Directory(dir)
    }

    #[test]
    fn test_leaf_state() {
        let leaf = TreeNode::Leaf(LeafNode::new("a", "W1"));
        let mut checked = CheckedMap::new();
        assert_eq!(state_of(&leaf, &checked), CheckState::Unchecked);
        checked.set("obj:a", true);
        assert_eq!(state_of(&leaf, &checked), CheckState::Checked);
    }

    #[test]
    fn test_empty_directory_is_unchecked() {
        let dir = TreeNode::Directory(DirectoryNode::new("Empty"));
        assert_eq!(state_of(&dir, &CheckedMap::new()), CheckState::Unchecked);
    }

    #[test]
    fn test_mixed_directory_is_indeterminate() {
        let mut checked = CheckedMap::new();
        checked.set("obj:a", true);
        checked.set("obj:b", false);
        assert_eq!(state_of(&wall(), &checked), CheckState::Indeterminate);
    }

    #[test]
    fn test_nested_indeterminate_propagates() {
        let mut outer = DirectoryNode::new("Outer");
        outer.push_child(wall());
        let outer = TreeNode::Directory(outer);

        let mut checked = CheckedMap::new();
        checked.set("obj:a", true);
        assert_eq!(state_of(&outer, &checked), CheckState::Indeterminate);
    }

    #[test]
    fn test_toggle_directory() {
        let mut checked = CheckedMap::new();
        checked.set("obj:a", true);
        checked.set("obj:b", true);

        let result = toggle(&wall(), false, &checked);
        assert!(!result.checked.get("obj:a"));
        assert!(!result.checked.get("obj:b"));
        assert_eq!(result.affected_ids, vec!["a", "b"]);
        // input untouched
        assert!(checked.get("obj:a"));
    }

    #[test]
    fn test_toggle_expand_uses_default() {
        let expanded = ExpandedMap::new(true);
        let next = toggle_expand("type:Wall", &expanded);
        assert!(!next.is_expanded("type:Wall"));
        assert!(toggle_expand("type:Wall", &next).is_expanded("type:Wall"));

        let collapsed = ExpandedMap::new(false);
        assert!(toggle_expand("type:Door", &collapsed).is_expanded("type:Door"));
    }

    #[test]
    fn test_checked_map_serializes_flat() {
        let mut checked = CheckedMap::new();
        checked.set("obj:a", true);
        let json = serde_json::to_string(&checked).unwrap();
        assert_eq!(json, r#"{"obj:a":true}"#);
        let back: CheckedMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, checked);
    }
}
