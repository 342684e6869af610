//! Shared helpers for integration tests
//!
//! Provides a viewer double that records every call into a shared log, so
//! tests can inspect the calls even after the owning session is dropped.

#![allow(dead_code)]

use ifc_typetree::{Aabb, Error, FlyTarget, MetadataSet, ObjectRecord, Result, Viewer};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A call made into the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Visible(Vec<String>, bool),
    Highlighted(Vec<String>, bool),
    FlyTo(FlyTarget),
    Destroy,
}

/// Viewer double that logs calls and can be told to fail
#[derive(Default)]
pub struct RecordingViewer {
    pub log: Rc<RefCell<Vec<Call>>>,
    pub objects: Vec<String>,
    pub bounds: HashMap<String, Aabb>,
    pub fail_visibility: bool,
    pub fail_fly_to: bool,
}

impl RecordingViewer {
    /// Create a viewer that knows every given object id
    pub fn with_objects(ids: &[&str]) -> Self {
        Self {
            objects: ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Shared handle to the call log
    pub fn log_handle(&self) -> Rc<RefCell<Vec<Call>>> {
        Rc::clone(&self.log)
    }

    /// Snapshot of the calls so far
    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    /// Drop every logged call
    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}

impl Viewer for RecordingViewer {
    fn set_objects_visible(&mut self, ids: &[String], visible: bool) -> Result<()> {
        if self.fail_visibility {
            return Err(Error::viewer("setObjectsVisible failed"));
        }
        self.log
            .borrow_mut()
            .push(Call::Visible(ids.to_vec(), visible));
        Ok(())
    }

    fn set_objects_highlighted(&mut self, ids: &[String], highlighted: bool) -> Result<()> {
        self.log
            .borrow_mut()
            .push(Call::Highlighted(ids.to_vec(), highlighted));
        Ok(())
    }

    fn has_object(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o == id)
    }

    fn object_aabb(&self, id: &str) -> Option<Aabb> {
        self.bounds.get(id).copied()
    }

    fn fly_to(&mut self, target: FlyTarget) -> Result<()> {
        if self.fail_fly_to {
            return Err(Error::viewer("flyTo failed"));
        }
        self.log.borrow_mut().push(Call::FlyTo(target));
        Ok(())
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(Call::Destroy);
    }
}

/// Replay the highlight calls in the log and return the ids left lit
pub fn highlighted_now(calls: &[Call]) -> Vec<String> {
    let mut lit: Vec<String> = Vec::new();
    for call in calls {
        if let Call::Highlighted(ids, on) = call {
            for id in ids {
                lit.retain(|l| l != id);
                if *on {
                    lit.push(id.clone());
                }
            }
        }
    }
    lit
}

/// The three-record model used across tests: two walls and a door
pub fn wall_door_metadata() -> MetadataSet {
    MetadataSet::from_records(vec![
        ObjectRecord::new("a", "Wall", "W1"),
        ObjectRecord::new("b", "Wall", "W2"),
        ObjectRecord::new("c", "Door", "D1"),
    ])
}
