//! Type tree: directories per entity type, one leaf per entity
//!
//! The tree is two levels deep. Every directory groups the entities that
//! share a type and keeps the ids of all its leaves in child order, so a
//! whole type can be shown or hidden with one call.

use crate::config::{LeafOrder, TreeConfig, UntypedPolicy};
use crate::metadata::MetadataSet;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Key prefix of directory nodes
pub const DIRECTORY_KEY_PREFIX: &str = "type:";

/// Key prefix of leaf nodes
pub const LEAF_KEY_PREFIX: &str = "obj:";

/// Key of the directory holding entities of `object_type`
pub fn directory_key(object_type: &str) -> String {
    format!("{}{}", DIRECTORY_KEY_PREFIX, object_type)
}

/// Key of the leaf for entity `id`
pub fn leaf_key(id: &str) -> String {
    format!("{}{}", LEAF_KEY_PREFIX, id)
}

/// A leaf node: one model entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    /// `obj:` + entity id
    pub key: String,
    /// Entity name, or its id when unnamed
    pub label: String,
    /// The entity id
    pub object_id: String,
}

impl LeafNode {
    /// Create a leaf for an entity
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let object_id = id.into();
        Self {
            key: leaf_key(&object_id),
            label: label.into(),
            object_id,
        }
    }

    /// The single entity id as a slice
    pub fn object_ids(&self) -> &[String] {
        std::slice::from_ref(&self.object_id)
    }
}

/// A directory node: one entity type
///
/// The fields are private so `object_ids` always equals the concatenation of
/// the children's ids. Children are added with [`push_leaf`] or
/// [`push_child`].
///
/// [`push_leaf`]: DirectoryNode::push_leaf
/// [`push_child`]: DirectoryNode::push_child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    key: String,
    label: String,
    object_ids: Vec<String>,
    children: Vec<TreeNode>,
}

impl DirectoryNode {
    /// Create an empty directory for a type
    pub fn new(object_type: impl Into<String>) -> Self {
        let label = object_type.into();
        Self {
            key: directory_key(&label),
            label,
            object_ids: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `type:` + type name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Type name
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Ids of every leaf below, in child order
    pub fn object_ids(&self) -> &[String] {
        &self.object_ids
    }

    /// Child nodes
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Append a leaf and its id
    pub fn push_leaf(&mut self, leaf: LeafNode) {
        self.object_ids.push(leaf.object_id.clone());
        self.children.push(TreeNode::Leaf(leaf));
    }

    /// Append any node, leaf or nested directory, with every id below it
    pub fn push_child(&mut self, child: TreeNode) {
        self.object_ids.extend(child.object_ids().iter().cloned());
        self.children.push(child);
    }

    fn sort_children(&mut self) {
        self.children
            .sort_by(|a, b| compare_labels(a.label(), b.label()));
        self.object_ids = self
            .children
            .iter()
            .flat_map(|child| child.object_ids().iter().cloned())
            .collect();
    }
}

/// A node of the type tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// A type grouping leaves
    Directory(DirectoryNode),
    /// A single entity
    Leaf(LeafNode),
}

impl TreeNode {
    /// Unique node key
    pub fn key(&self) -> &str {
        match self {
            TreeNode::Directory(dir) => &dir.key,
            TreeNode::Leaf(leaf) => &leaf.key,
        }
    }

    /// Display label
    pub fn label(&self) -> &str {
        match self {
            TreeNode::Directory(dir) => &dir.label,
            TreeNode::Leaf(leaf) => &leaf.label,
        }
    }

    /// Entity ids covered by this node
    pub fn object_ids(&self) -> &[String] {
        match self {
            TreeNode::Directory(dir) => &dir.object_ids,
            TreeNode::Leaf(leaf) => leaf.object_ids(),
        }
    }

    /// Child nodes; empty for leaves
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Directory(dir) => &dir.children,
            TreeNode::Leaf(_) => &[],
        }
    }

    /// Whether this is a directory
    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory(_))
    }

    /// The leaf, if this node is one
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            TreeNode::Leaf(leaf) => Some(leaf),
            TreeNode::Directory(_) => None,
        }
    }

    /// The directory, if this node is one
    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            TreeNode::Directory(dir) => Some(dir),
            TreeNode::Leaf(_) => None,
        }
    }

    /// Push every leaf at or below this node onto `out`, in tree order
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafNode>) {
        match self {
            TreeNode::Leaf(leaf) => out.push(leaf),
            TreeNode::Directory(dir) => {
                for child in &dir.children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// An immutable type tree with key lookup
#[derive(Debug, Clone, Default)]
pub struct TypeTree {
    roots: Vec<TreeNode>,
    // key -> child indices from the roots down
    index: HashMap<String, Vec<usize>>,
}

impl TypeTree {
    /// Wrap already ordered root nodes
    pub fn from_roots(roots: Vec<TreeNode>) -> Self {
        let mut index = HashMap::new();
        let mut path = Vec::new();
        for (i, node) in roots.iter().enumerate() {
            path.push(i);
            index_node(node, &mut path, &mut index);
            path.pop();
        }
        Self { roots, index }
    }

    /// Root nodes, sorted by label
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Find a node by key
    pub fn find(&self, key: &str) -> Option<&TreeNode> {
        let path = self.index.get(key)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for &i in rest {
            node = node.children().get(i)?;
        }
        Some(node)
    }

    /// Whether a node with this key exists
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Every leaf in tree order
    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut out = Vec::new();
        for node in &self.roots {
            node.collect_leaves(&mut out);
        }
        out
    }

    /// Every entity id in tree order
    pub fn all_object_ids(&self) -> Vec<String> {
        self.roots
            .iter()
            .flat_map(|node| node.object_ids().iter().cloned())
            .collect()
    }

    /// Number of root directories
    pub fn directory_count(&self) -> usize {
        self.roots.iter().filter(|node| node.is_dir()).count()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.roots.iter().map(count_leaves).sum()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn count_leaves(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf(_) => 1,
        TreeNode::Directory(dir) => dir.children.iter().map(count_leaves).sum(),
    }
}

fn index_node(node: &TreeNode, path: &mut Vec<usize>, index: &mut HashMap<String, Vec<usize>>) {
    index.insert(node.key().to_string(), path.clone());
    for (i, child) in node.children().iter().enumerate() {
        path.push(i);
        index_node(child, path, index);
        path.pop();
    }
}

/// Compare two labels for display ordering
///
/// Labels are compared case-insensitively first. Labels that differ only
/// in case put the lowercase form first.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Group entity records into a type tree
///
/// Directories are created in first-seen order and then sorted by label.
/// Leaves keep first-seen order unless [`LeafOrder::Label`] is configured.
/// Records without a type follow the configured [`UntypedPolicy`].
///
/// # Example
///
/// ```
/// use ifc_typetree::{build_tree, MetadataSet, ObjectRecord, TreeConfig};
///
/// let metadata = MetadataSet::from_records(vec![
///     ObjectRecord::new("a", "Wall", "W1"),
///     ObjectRecord::new("b", "Wall", "W2"),
///     ObjectRecord::new("c", "Door", "D1"),
/// ]);
/// let tree = build_tree(&metadata, &TreeConfig::default());
///
/// let labels: Vec<&str> = tree.roots().iter().map(|n| n.label()).collect();
/// assert_eq!(labels, vec!["Door", "Wall"]);
/// ```
pub fn build_tree(metadata: &MetadataSet, config: &TreeConfig) -> TypeTree {
    let mut directories: Vec<DirectoryNode> = Vec::new();
    let mut by_type: HashMap<&str, usize> = HashMap::new();

    for record in metadata.iter() {
        let type_name = if record.has_type() {
            record.object_type.as_str()
        } else {
            match config.untyped() {
                UntypedPolicy::Skip => {
                    debug!("record {} has no type, leaving it out of the tree", record.id);
                    continue;
                }
                UntypedPolicy::Uncategorized(label) => label.as_str(),
            }
        };

        let slot = *by_type.entry(type_name).or_insert_with(|| {
            directories.push(DirectoryNode::new(type_name));
            directories.len() - 1
        });
        directories[slot].push_leaf(LeafNode::new(record.id.as_str(), record.label()));
    }

    if config.leaf_order() == LeafOrder::Label {
        for dir in &mut directories {
            dir.sort_children();
        }
    }
    directories.sort_by(|a, b| compare_labels(&a.label, &b.label));

    let tree = TypeTree::from_roots(directories.into_iter().map(TreeNode::Directory).collect());
    info!(
        "built type tree: {} types, {} objects",
        tree.directory_count(),
        tree.leaf_count()
    );
    tree
}
