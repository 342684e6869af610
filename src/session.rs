//! A view-scoped type tree session
//!
//! [`TypeTreeSession`] owns the viewer handle together with the tree and
//! both state maps built for the current model. The presentation layer
//! forwards its events to the `on_*` callbacks and reads back [`rows`].
//!
//! Each load is a cycle: [`begin_load`] drops the previous tree and hands out
//! a [`LoadTicket`], and only the completion carrying the latest ticket is
//! applied. Dropping the session destroys the viewer.
//!
//! [`rows`]: TypeTreeSession::rows
//! [`begin_load`]: TypeTreeSession::begin_load

use crate::config::TreeConfig;
use crate::error::{Error, Result};
use crate::metadata::MetadataSet;
use crate::rows::{TreeRow, visible_rows};
use crate::state::{CheckState, CheckedMap, ExpandedMap, Toggle, state_of, toggle, toggle_expand};
use crate::tree::{TypeTree, build_tree};
use crate::viewer::{FlyTarget, HighlightTracker, Viewer, select_leaf};
use log::debug;

/// Identifies one model load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// Type tree state bound to one viewer
///
/// # Example
///
/// ```
/// use ifc_typetree::{
///     Aabb, CheckState, FlyTarget, MetadataSet, ObjectRecord, Result, TreeConfig,
///     TypeTreeSession, Viewer,
/// };
///
/// #[derive(Default)]
/// struct Headless {
///     hidden: Vec<String>,
/// }
///
/// impl Viewer for Headless {
///     fn set_objects_visible(&mut self, ids: &[String], visible: bool) -> Result<()> {
///         if visible {
///             self.hidden.retain(|id| !ids.contains(id));
///         } else {
///             self.hidden.extend(ids.iter().cloned());
///         }
///         Ok(())
///     }
///     fn set_objects_highlighted(&mut self, _ids: &[String], _on: bool) -> Result<()> {
///         Ok(())
///     }
///     fn has_object(&self, _id: &str) -> bool {
///         true
///     }
///     fn object_aabb(&self, _id: &str) -> Option<Aabb> {
///         None
///     }
///     fn fly_to(&mut self, _target: FlyTarget) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let mut session = TypeTreeSession::new(Headless::default(), TreeConfig::default());
/// let ticket = session.begin_load();
/// let metadata = MetadataSet::from_records(vec![
///     ObjectRecord::new("a", "Wall", "W1"),
///     ObjectRecord::new("b", "Wall", "W2"),
/// ]);
/// session.on_model_loaded(ticket, &metadata)?;
///
/// session.on_toggle_check("obj:a", false)?;
/// assert_eq!(session.state_of_key("type:Wall"), Some(CheckState::Indeterminate));
/// assert_eq!(session.viewer().hidden, vec!["a".to_string()]);
/// # Ok(())
/// # }
/// ```
pub struct TypeTreeSession<V: Viewer> {
    viewer: V,
    config: TreeConfig,
    tree: TypeTree,
    checked: CheckedMap,
    expanded: ExpandedMap,
    selection: HighlightTracker,
    hover: HighlightTracker,
    generation: u64,
    pending: Option<u64>,
    destroyed: bool,
}

impl<V: Viewer> TypeTreeSession<V> {
    /// Take ownership of a viewer
    pub fn new(viewer: V, config: TreeConfig) -> Self {
        let expanded = ExpandedMap::new(config.default_expanded());
        Self {
            viewer,
            config,
            tree: TypeTree::default(),
            checked: CheckedMap::new(),
            expanded,
            selection: HighlightTracker::new(),
            hover: HighlightTracker::new(),
            generation: 0,
            pending: None,
            destroyed: false,
        }
    }

    /// Start a new load cycle, discarding the current tree and state
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.reset_state();
        LoadTicket(self.generation)
    }

    /// Apply the metadata of a finished load
    ///
    /// Builds the tree, initializes both maps, makes every object match its
    /// initial checked value and optionally frames the model. Returns
    /// `Ok(false)` without touching anything when `ticket` is not the
    /// latest pending load.
    pub fn on_model_loaded(&mut self, ticket: LoadTicket, metadata: &MetadataSet) -> Result<bool> {
        self.ensure_alive()?;
        if self.pending != Some(ticket.0) {
            debug!(
                "ignoring completion of load {} (pending: {:?})",
                ticket.0, self.pending
            );
            return Ok(false);
        }
        self.pending = None;

        self.tree = build_tree(metadata, &self.config);
        self.checked = CheckedMap::initialized(&self.tree, self.config.initial_visibility());
        self.expanded = ExpandedMap::initialized(&self.tree, self.config.default_expanded());

        let ids = self.tree.all_object_ids();
        if !ids.is_empty() {
            self.viewer
                .set_objects_visible(&ids, self.config.initial_visibility())?;
        }
        if self.config.fly_to_model_on_load() {
            self.viewer.fly_to(FlyTarget::Model)?;
        }
        Ok(true)
    }

    /// Check or uncheck a node and everything below it
    ///
    /// The new state is committed before the viewer is told, with one batched
    /// call. Unknown keys are ignored.
    pub fn on_toggle_check(&mut self, key: &str, value: bool) -> Result<()> {
        self.ensure_alive()?;
        let Some(node) = self.tree.find(key) else {
            debug!("toggle on unknown node {}", key);
            return Ok(());
        };
        let Toggle {
            checked,
            affected_ids,
        } = toggle(node, value, &self.checked);
        self.checked = checked;

        if !affected_ids.is_empty() {
            self.viewer.set_objects_visible(&affected_ids, value)?;
        }
        Ok(())
    }

    /// Expand or collapse a directory
    ///
    /// Returns the new expansion flag, or `None` when `key` is not a
    /// directory of the current tree.
    pub fn on_toggle_expand(&mut self, key: &str) -> Option<bool> {
        if !self.tree.find(key).is_some_and(|node| node.is_dir()) {
            debug!("expand toggle on non-directory {}", key);
            return None;
        }
        self.expanded = toggle_expand(key, &self.expanded);
        Some(self.expanded.is_expanded(key))
    }

    /// Select a leaf: highlight it alone and fly the camera to it
    ///
    /// Directory keys and unknown keys are ignored.
    pub fn on_click_leaf(&mut self, key: &str) -> Result<()> {
        self.ensure_alive()?;
        let Some(leaf) = self.tree.find(key).and_then(|node| node.as_leaf()) else {
            return Ok(());
        };
        select_leaf(&mut self.viewer, &mut self.selection, leaf)
    }

    /// Move the hover highlight to a picked object, or clear it
    pub fn on_hover(&mut self, id: Option<&str>) -> Result<bool> {
        self.ensure_alive()?;
        self.hover.hover(&mut self.viewer, id)
    }

    /// Current tree
    pub fn tree(&self) -> &TypeTree {
        &self.tree
    }

    /// Current checked map
    pub fn checked(&self) -> &CheckedMap {
        &self.checked
    }

    /// Current expansion map
    pub fn expanded(&self) -> &ExpandedMap {
        &self.expanded
    }

    /// Checkbox state of a node, if it exists
    pub fn state_of_key(&self, key: &str) -> Option<CheckState> {
        self.tree.find(key).map(|node| state_of(node, &self.checked))
    }

    /// Id of the selected object
    pub fn selected(&self) -> Option<&str> {
        self.selection.current()
    }

    /// Id of the hovered object
    pub fn hovered(&self) -> Option<&str> {
        self.hover.current()
    }

    /// Rows to render, in order
    pub fn rows(&self) -> Vec<TreeRow> {
        visible_rows(&self.tree, &self.checked, &self.expanded)
    }

    /// Session configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The owned viewer
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// The owned viewer, mutably
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Whether [`destroy`](Self::destroy) has run
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Clear highlights, destroy the viewer and drop all state
    ///
    /// Runs at most once; later calls do nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Err(err) = self.selection.clear(&mut self.viewer) {
            debug!("clearing selection on teardown failed: {}", err);
        }
        if let Err(err) = self.hover.clear(&mut self.viewer) {
            debug!("clearing hover on teardown failed: {}", err);
        }
        self.viewer.destroy();
        self.destroyed = true;
        self.pending = None;
        self.reset_state();
    }

    fn reset_state(&mut self) {
        self.tree = TypeTree::default();
        self.checked = CheckedMap::new();
        self.expanded = ExpandedMap::new(self.config.default_expanded());
        self.selection.forget();
        self.hover.forget();
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            Err(Error::ViewerDestroyed)
        } else {
            Ok(())
        }
    }
}

impl<V: Viewer> Drop for TypeTreeSession<V> {
    fn drop(&mut self) {
        self.destroy();
    }
}
