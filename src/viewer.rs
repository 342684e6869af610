//! The seam to the external 3D viewer
//!
//! The type tree never renders, picks or loads anything itself. Everything
//! that touches the scene goes through the [`Viewer`] trait, which a host
//! implements on top of its actual engine.

use crate::error::Result;
use crate::tree::LeafNode;
use log::{debug, warn};

/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: [f64; 3],
    /// Maximum corner
    pub max: [f64; 3],
}

impl Aabb {
    /// Create a box from its two corners
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Center point of the box
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Whether the box encloses no volume and no point
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }
}

/// What a camera flight should frame
#[derive(Debug, Clone, PartialEq)]
pub enum FlyTarget {
    /// The whole loaded model
    Model,
    /// A scene object the viewer knows by id
    Object(String),
    /// An explicit bounding box
    Aabb(Aabb),
}

/// Operations the type tree needs from a 3D viewer
///
/// # Example
///
/// ```
/// use ifc_typetree::{Aabb, FlyTarget, Result, Viewer};
///
/// struct Headless;
///
/// impl Viewer for Headless {
///     fn set_objects_visible(&mut self, _ids: &[String], _visible: bool) -> Result<()> {
///         Ok(())
///     }
///     fn set_objects_highlighted(&mut self, _ids: &[String], _on: bool) -> Result<()> {
///         Ok(())
///     }
///     fn has_object(&self, _id: &str) -> bool {
///         false
///     }
///     fn object_aabb(&self, _id: &str) -> Option<Aabb> {
///         None
///     }
///     fn fly_to(&mut self, _target: FlyTarget) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Viewer {
    /// Show or hide a batch of objects with one call
    fn set_objects_visible(&mut self, ids: &[String], visible: bool) -> Result<()>;

    /// Highlight or un-highlight a batch of objects
    fn set_objects_highlighted(&mut self, ids: &[String], highlighted: bool) -> Result<()>;

    /// Whether the scene holds an object with this id that can be flown to
    fn has_object(&self, id: &str) -> bool;

    /// Bounding box of an object, if the viewer can compute one
    fn object_aabb(&self, id: &str) -> Option<Aabb>;

    /// Move the camera so the target fills the view
    fn fly_to(&mut self, target: FlyTarget) -> Result<()>;

    /// Release the viewer's resources
    ///
    /// Called exactly once by the owning session.
    fn destroy(&mut self) {}
}

/// Move the camera to an object
///
/// Prefers the object itself and falls back to its bounding box. Returns
/// whether a flight was started.
pub fn focus_object<V: Viewer + ?Sized>(viewer: &mut V, id: &str) -> Result<bool> {
    if viewer.has_object(id) {
        viewer.fly_to(FlyTarget::Object(id.to_string()))?;
        return Ok(true);
    }
    match viewer.object_aabb(id) {
        Some(aabb) => {
            viewer.fly_to(FlyTarget::Aabb(aabb))?;
            Ok(true)
        }
        None => {
            warn!("cannot focus object {}: no scene object and no bounds", id);
            Ok(false)
        }
    }
}

/// Make a leaf's entity the only selected object and fly the camera to it
///
/// The previous selection is un-highlighted first. The new selection is
/// recorded as soon as its highlight succeeds, so a failed flight still
/// leaves `selection` pointing at the lit object.
pub fn select_leaf<V: Viewer + ?Sized>(
    viewer: &mut V,
    selection: &mut HighlightTracker,
    leaf: &LeafNode,
) -> Result<()> {
    selection.clear(viewer)?;
    viewer.set_objects_highlighted(leaf.object_ids(), true)?;
    selection.mark(&leaf.object_id);
    focus_object(viewer, &leaf.object_id)?;
    Ok(())
}

/// Keeps at most one object highlighted at a time
///
/// Used for both the hover highlight and the click selection: moving to a
/// new object un-highlights the previous one first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightTracker {
    current: Option<String>,
}

impl HighlightTracker {
    /// Create a tracker with nothing highlighted
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently highlighted object id
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Highlight `id`, or clear the highlight when `None`
    ///
    /// Returns whether the highlighted object changed.
    pub fn hover<V: Viewer + ?Sized>(&mut self, viewer: &mut V, id: Option<&str>) -> Result<bool> {
        if self.current.as_deref() == id {
            return Ok(false);
        }
        self.clear(viewer)?;
        if let Some(id) = id {
            debug!("highlighting {}", id);
            viewer.set_objects_highlighted(&[id.to_string()], true)?;
            self.current = Some(id.to_string());
        }
        Ok(true)
    }

    /// Un-highlight the current object, if any
    pub fn clear<V: Viewer + ?Sized>(&mut self, viewer: &mut V) -> Result<()> {
        if let Some(previous) = self.current.take() {
            viewer.set_objects_highlighted(&[previous], false)?;
        }
        Ok(())
    }

    /// Record `id` as highlighted without calling the viewer
    fn mark(&mut self, id: &str) {
        self.current = Some(id.to_string());
    }

    /// Forget the current object without calling the viewer
    pub(crate) fn forget(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Scripted {
        objects: Vec<String>,
        aabb: Option<Aabb>,
        highlight_calls: Vec<(Vec<String>, bool)>,
        flights: Vec<FlyTarget>,
        grounded: bool,
    }

    impl Viewer for Scripted {
        fn set_objects_visible(&mut self, _ids: &[String], _visible: bool) -> Result<()> {
            Ok(())
        }
        fn set_objects_highlighted(&mut self, ids: &[String], on: bool) -> Result<()> {
            self.highlight_calls.push((ids.to_vec(), on));
            Ok(())
        }
        fn has_object(&self, id: &str) -> bool {
            self.objects.iter().any(|o| o == id)
        }
        fn object_aabb(&self, _id: &str) -> Option<Aabb> {
            self.aabb
        }
        fn fly_to(&mut self, target: FlyTarget) -> Result<()> {
            if self.grounded {
                return Err(crate::Error::viewer("camera busy"));
            }
            self.flights.push(target);
            Ok(())
        }
    }

    #[test]
    fn test_aabb_center_and_empty() {
        let aabb = Aabb::new([0.0, 0.0, 0.0], [2.0, 4.0, 6.0]);
        assert_eq!(aabb.center(), [1.0, 2.0, 3.0]);
        assert!(!aabb.is_empty());
        assert!(Aabb::new([1.0, 0.0, 0.0], [0.0, 1.0, 1.0]).is_empty());
    }

    #[test]
    fn test_focus_prefers_object() {
        let mut viewer = Scripted {
            objects: vec!["a".to_string()],
            aabb: Some(Aabb::new([0.0; 3], [1.0; 3])),
            ..Default::default()
        };
        assert!(focus_object(&mut viewer, "a").unwrap());
        assert_eq!(viewer.flights, vec![FlyTarget::Object("a".to_string())]);
    }

    #[test]
    fn test_focus_falls_back_to_aabb_then_nothing() {
        let aabb = Aabb::new([0.0; 3], [1.0; 3]);
        let mut viewer = Scripted {
            aabb: Some(aabb),
            ..Default::default()
        };
        assert!(focus_object(&mut viewer, "a").unwrap());
        assert_eq!(viewer.flights, vec![FlyTarget::Aabb(aabb)]);

        let mut viewer = Scripted::default();
        assert!(!focus_object(&mut viewer, "a").unwrap());
        assert!(viewer.flights.is_empty());
    }

    #[test]
    fn test_hover_switches_highlight() {
        let mut viewer = Scripted::default();
        let mut tracker = HighlightTracker::new();

        assert!(tracker.hover(&mut viewer, Some("a")).unwrap());
        assert!(!tracker.hover(&mut viewer, Some("a")).unwrap());
        assert!(tracker.hover(&mut viewer, Some("b")).unwrap());
        assert!(tracker.hover(&mut viewer, None).unwrap());

        assert_eq!(
            viewer.highlight_calls,
            vec![
                (vec!["a".to_string()], true),
                (vec!["a".to_string()], false),
                (vec!["b".to_string()], true),
                (vec!["b".to_string()], false),
            ]
        );
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_select_leaf_replaces_previous_selection() {
        let mut viewer = Scripted {
            objects: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        let mut selection = HighlightTracker::new();

        select_leaf(&mut viewer, &mut selection, &LeafNode::new("a", "A")).unwrap();
        select_leaf(&mut viewer, &mut selection, &LeafNode::new("b", "B")).unwrap();

        assert_eq!(selection.current(), Some("b"));
        assert_eq!(
            viewer.highlight_calls,
            vec![
                (vec!["a".to_string()], true),
                (vec!["a".to_string()], false),
                (vec!["b".to_string()], true),
            ]
        );
        assert_eq!(viewer.flights.len(), 2);
    }

    #[test]
    fn test_select_leaf_records_selection_when_flight_fails() {
        let mut viewer = Scripted {
            objects: vec!["a".to_string()],
            grounded: true,
            ..Default::default()
        };
        let mut selection = HighlightTracker::new();

        let err = select_leaf(&mut viewer, &mut selection, &LeafNode::new("a", "A")).unwrap_err();
        assert_eq!(err.code(), "E3001");
        assert_eq!(selection.current(), Some("a"));

        selection.clear(&mut viewer).unwrap();
        assert_eq!(
            viewer.highlight_calls.last(),
            Some(&(vec!["a".to_string()], false))
        );
    }
}
