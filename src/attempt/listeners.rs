//! Change notification for attempt observers.

use crate::core::cube::Cube;
use crate::core::solution::PartialSolution;
use crate::core::step::StepKind;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Saved solutions grouped by phase.
pub type SavedSolutions = BTreeMap<StepKind, Vec<Arc<PartialSolution>>>;

/// Called after saved solutions are added, removed or reordered.
pub type SavedListener = Box<dyn FnMut(&SavedSolutions) + Send>;

/// Called after the live solution changes or a comment or flag is set.
pub type AttributeListener = Box<dyn FnMut(&PartialSolution) + Send>;

/// Called after the displayed cube state changes.
pub type CubeListener = Box<dyn FnMut(&Cube) + Send>;

/// Registered observers, notified synchronously in registration order.
#[derive(Default)]
pub struct Listeners {
    saved: Vec<SavedListener>,
    attribute: Vec<AttributeListener>,
    cube: Vec<CubeListener>,
}

impl Listeners {
    pub fn add_saved(&mut self, listener: SavedListener) {
        self.saved.push(listener);
    }

    pub fn add_attribute(&mut self, listener: AttributeListener) {
        self.attribute.push(listener);
    }

    pub fn add_cube(&mut self, listener: CubeListener) {
        self.cube.push(listener);
    }

    pub fn notify_saved(&mut self, saved: &SavedSolutions) {
        for listener in &mut self.saved {
            listener(saved);
        }
    }

    pub fn notify_attribute(&mut self, solution: &PartialSolution) {
        for listener in &mut self.attribute {
            listener(solution);
        }
    }

    pub fn notify_cube(&mut self, cube: &Cube) {
        for listener in &mut self.cube {
            listener(cube);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("saved", &self.saved.len())
            .field("attribute", &self.attribute.len())
            .field("cube", &self.cube.len())
            .finish()
    }
}
