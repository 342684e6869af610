//! Configuration for building and initializing a type tree

/// How leaves are ordered inside a type directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeafOrder {
    /// Keep leaves in the order their records were first seen
    #[default]
    Insertion,
    /// Sort leaves by label, the same way directories are sorted
    Label,
}

/// What to do with records that carry no type
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UntypedPolicy {
    /// Leave them out of the tree
    #[default]
    Skip,
    /// Collect them under a directory with the given label
    Uncategorized(String),
}

/// Type tree configuration
///
/// # Example
///
/// ```
/// use ifc_typetree::{LeafOrder, TreeConfig, UntypedPolicy};
///
/// let config = TreeConfig::new()
///     .with_default_expanded(false)
///     .with_leaf_order(LeafOrder::Label)
///     .with_untyped(UntypedPolicy::Uncategorized("Uncategorized".to_string()));
///
/// assert!(!config.default_expanded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    default_expanded: bool,
    leaf_order: LeafOrder,
    untyped: UntypedPolicy,
    initial_visibility: bool,
    fly_to_model_on_load: bool,
}

impl TreeConfig {
    /// Create the default configuration
    ///
    /// Directories start expanded, every leaf starts checked, leaves keep
    /// insertion order and untyped records are skipped.
    pub fn new() -> Self {
        Self {
            default_expanded: true,
            leaf_order: LeafOrder::Insertion,
            untyped: UntypedPolicy::Skip,
            initial_visibility: true,
            fly_to_model_on_load: true,
        }
    }

    /// Set the expansion state directories start in after a load
    pub fn with_default_expanded(mut self, expanded: bool) -> Self {
        self.default_expanded = expanded;
        self
    }

    /// Set how leaves are ordered inside a directory
    pub fn with_leaf_order(mut self, order: LeafOrder) -> Self {
        self.leaf_order = order;
        self
    }

    /// Set what happens to records without a type
    pub fn with_untyped(mut self, policy: UntypedPolicy) -> Self {
        self.untyped = policy;
        self
    }

    /// Set the checked value every leaf gets after a load
    pub fn with_initial_visibility(mut self, visible: bool) -> Self {
        self.initial_visibility = visible;
        self
    }

    /// Set whether the camera frames the whole model once it is loaded
    pub fn with_fly_to_model_on_load(mut self, fly: bool) -> Self {
        self.fly_to_model_on_load = fly;
        self
    }

    /// Expansion state of directories after a load
    pub fn default_expanded(&self) -> bool {
        self.default_expanded
    }

    /// Leaf ordering inside directories
    pub fn leaf_order(&self) -> LeafOrder {
        self.leaf_order
    }

    /// Policy for records without a type
    pub fn untyped(&self) -> &UntypedPolicy {
        &self.untyped
    }

    /// Checked value of every leaf after a load
    pub fn initial_visibility(&self) -> bool {
        self.initial_visibility
    }

    /// Whether the camera frames the model after a load
    pub fn fly_to_model_on_load(&self) -> bool {
        self.fly_to_model_on_load
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
