//! Visual orientation of the cube.
//!
//! Orientations are plain values: every rotation returns a new orientation
//! and leaves the receiver untouched, so solution nodes can share them.

use crate::core::moves::Face;
use crate::core::step::{Axis, Step, StepKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-cube rotation axis, named as in cube notation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    X,
    Y,
    Z,
}

impl Rotation {
    pub fn letter(self) -> char {
        match self {
            Rotation::X => 'x',
            Rotation::Y => 'y',
            Rotation::Z => 'z',
        }
    }

    pub fn from_char(c: char) -> Option<Rotation> {
        match c {
            'x' => Some(Rotation::X),
            'y' => Some(Rotation::Y),
            'z' => Some(Rotation::Z),
            _ => None,
        }
    }
}

/// Which face is on top and which faces the viewer.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::core::{Face, Orientation};
///
/// let o = Orientation::default();
/// assert_eq!(o.right(), Face::R);
///
/// let rotated = o.x(1);
/// assert_eq!(rotated.top(), Face::F);
/// assert_eq!(rotated.x(3), o);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Orientation {
    top: Face,
    front: Face,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            top: Face::U,
            front: Face::F,
        }
    }
}

impl Orientation {
    /// Returns `None` when `top` and `front` lie on the same axis.
    pub fn new(top: Face, front: Face) -> Option<Self> {
        if top == front || top == front.opposite() {
            return None;
        }
        Some(Self { top, front })
    }

    pub fn top(&self) -> Face {
        self.top
    }

    pub fn front(&self) -> Face {
        self.front
    }

    /// The face 90° clockwise from `front` looking down on `top`.
    pub fn right(&self) -> Face {
        self.top.rotate(self.front, 1)
    }

    /// Rotate around the right face.
    pub fn x(&self, ticks: u8) -> Self {
        let axis = self.right();
        Self {
            top: axis.rotate(self.top, ticks),
            front: axis.rotate(self.front, ticks),
        }
    }

    /// Rotate around the top face.
    pub fn y(&self, ticks: u8) -> Self {
        Self {
            top: self.top,
            front: self.top.rotate(self.front, ticks),
        }
    }

    /// Rotate around the front face.
    pub fn z(&self, ticks: u8) -> Self {
        Self {
            top: self.front.rotate(self.top, ticks),
            front: self.front,
        }
    }

    pub fn rotate(&self, rotation: Rotation, ticks: u8) -> Self {
        match rotation {
            Rotation::X => self.x(ticks),
            Rotation::Y => self.y(ticks),
            Rotation::Z => self.z(ticks),
        }
    }

    /// Default orientation for working on `step`, ignoring context.
    pub fn default_for(step: Step) -> Self {
        let (top, front) = match (step.kind(), step.axis()) {
            (StepKind::Scrambled, _) => (Face::U, Face::F),
            (StepKind::Eo, Axis::Ud) => (Face::B, Face::U),
            (StepKind::Eo, Axis::Fb) => (Face::U, Face::F),
            (StepKind::Eo, Axis::Rl) => (Face::U, Face::R),
            (_, Axis::Ud) => (Face::U, Face::F),
            (_, Axis::Fb) => (Face::B, Face::U),
            (_, Axis::Rl) => (Face::R, Face::F),
            (_, Axis::Any) => (Face::U, Face::F),
        };
        Self { top, front }
    }

    /// Orientation for a node entering `step` after a node on `previous`
    /// oriented as `inherited`.
    ///
    /// Right after EO the default is used, turned once around the top face
    /// if its front is not on the EO axis. Every other node, including the
    /// first one after the root, keeps whatever the previous node showed.
    pub fn following(step: Step, previous: Option<(Step, Orientation)>) -> Self {
        match previous {
            None => Self::default_for(step),
            Some((prev, _)) if prev.kind() == StepKind::Eo => {
                let o = Self::default_for(step);
                if prev.axis().contains(o.front) {
                    o
                } else {
                    o.y(1)
                }
            }
            Some((_, inherited)) => inherited,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "top={}, front={}", self.top, self.front)
    }
}
