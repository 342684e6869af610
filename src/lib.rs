//! # ifc-typetree
//!
//! A type tree with tri-state visibility checkboxes for BIM/IFC model viewers.
//!
//! When a model finishes loading, its entity metadata is grouped by type into
//! a two-level tree: one directory per type, one leaf per entity. Leaves
//! carry a checked flag that mirrors the entity's visibility. Directories
//! show checked, unchecked or indeterminate depending on their leaves.
//! Toggling any node hides or shows its whole subtree with a single call
//! into the viewer.
//!
//! The 3D engine and the model loader are not part of this crate. A host
//! implements [`Viewer`] for its engine and feeds [`MetadataSet`]s in from
//! its loader.
//!
//! ## Features
//!
//! - Pure functions for building the tree, evaluating checkbox state and
//!   propagating toggles, usable without any viewer
//! - Metamodel JSON loading with validation at the boundary
//! - A view-scoped [`TypeTreeSession`] that owns the viewer, applies only the
//!   latest load and destroys the viewer on drop
//!
//! ## Example
//!
//! ```
//! use ifc_typetree::{
//!     build_tree, state_of, toggle, CheckState, CheckedMap, MetadataSet, ObjectRecord,
//!     TreeConfig,
//! };
//!
//! let metadata = MetadataSet::from_records(vec![
//!     ObjectRecord::new("a", "Wall", "W1"),
//!     ObjectRecord::new("b", "Wall", "W2"),
//!     ObjectRecord::new("c", "Door", "D1"),
//! ]);
//! let tree = build_tree(&metadata, &TreeConfig::default());
//! let checked = CheckedMap::initialized(&tree, true);
//!
//! let wall = tree.find("type:Wall").unwrap();
//! assert_eq!(state_of(wall, &checked), CheckState::Checked);
//!
//! let leaf_a = tree.find("obj:a").unwrap();
//! let result = toggle(leaf_a, false, &checked);
//! assert_eq!(result.affected_ids, vec!["a"]);
//! assert_eq!(state_of(wall, &result.checked), CheckState::Indeterminate);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod metadata;
pub mod rows;
pub mod session;
pub mod state;
pub mod tree;
pub mod viewer;

pub use config::{LeafOrder, TreeConfig, UntypedPolicy};
pub use error::{Error, Result};
pub use metadata::{
    MetaObject, MetadataSet, ObjectRecord, Property, PropertyRow, PropertySet, property_rows,
};
pub use rows::{TreeRow, visible_rows};
pub use session::{LoadTicket, TypeTreeSession};
pub use state::{CheckState, CheckedMap, ExpandedMap, Toggle, state_of, toggle, toggle_expand};
pub use tree::{
    DirectoryNode, LeafNode, TreeNode, TypeTree, build_tree, compare_labels, directory_key,
    leaf_key,
};
pub use viewer::{Aabb, FlyTarget, HighlightTracker, Viewer, focus_object, select_leaf};
