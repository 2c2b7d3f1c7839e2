//! Core cube and solution types.
//!
//! This module contains the pure value types the attempt is built from:
//! - Moves, algorithms with a normal and an inverse half, and cube states
//! - Solving steps and the visual orientation for each
//! - The partial-solution tree
//!
//! Nothing here performs I/O or notifies anyone. The stateful controller
//! lives in [`crate::attempt`].

pub mod algorithm;
pub mod cube;
pub mod moves;
pub mod orientation;
pub mod solution;
pub mod step;

pub use algorithm::{Algorithm, AlgorithmError};
pub use cube::Cube;
pub use moves::{Face, Move, Turn};
pub use orientation::{Orientation, Rotation};
pub use solution::{InsertionState, PartialSolution, SolutionKey};
pub use step::{Axis, Step, StepError, StepKind};
