//! fmc-attempt: the state of a Fewest Moves Challenge attempt
//!
//! An attempt starts from a scramble and is solved step by step (EO, DR,
//! HTR, floppy reduction or slice, finish), on the normal or the inverse
//! scramble, with alternatives saved and explored as a tree. Once finished,
//! a solution can be retyped as a whole and the insertions worked out.
//!
//! The crate is a pure core with an imperative shell around it:
//!
//! - **core**: moves, algorithms, cubes, steps and the partial-solution tree
//! - **phase**: the phase graph and the [`StepLibrary`] boundary to
//!   step-detection and solver code
//! - **insertions**: wide-move parsing and the insertion diff
//! - **attempt**: the [`Attempt`] controller and its listeners
//! - **session**: a text command language with undo and replayable scripts
//! - **snapshot**: versioned JSON and binary snapshots of an attempt
//!
//! Nothing here decides whether a step is solved. That is the job of the
//! [`StepLibrary`] the attempt is built with.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fmc_attempt::{AttemptBuilder, Algorithm, Cube, SolveError, Step, StepLibrary};
//!
//! /// Every step is solved when the whole cube is.
//! struct WholeCube;
//!
//! impl StepLibrary for WholeCube {
//!     fn is_solved(&self, _: Step, cube: &Cube) -> bool { cube.is_solved() }
//!     fn is_eligible(&self, _: Step, _: &Cube) -> bool { true }
//!     fn case_name(&self, _: Step, _: &Cube) -> String { String::new() }
//!     fn solve(&self, _: Step, _: &Cube, _: usize) -> Result<Vec<Algorithm>, SolveError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let mut attempt = AttemptBuilder::new()
//!     .library(Arc::new(WholeCube))
//!     .scramble("R U")
//!     .build()
//!     .unwrap();
//!
//! attempt.advance_to(Step::FINISH);
//! assert!(attempt.append(&"U' R'".parse::<Algorithm>().unwrap()));
//! let saved = attempt.save().unwrap();
//! assert_eq!(attempt.to_str(&saved), "U' R' // finish (2)");
//! ```

pub mod attempt;
pub mod config;
pub mod core;
pub mod insertions;
pub mod phase;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use attempt::{Attempt, AttemptBuilder, BuildError};
pub use config::{ConfigError, Preferences, SortOrder};
pub use core::{Algorithm, Axis, Cube, Move, Orientation, PartialSolution, Step, StepKind};
pub use phase::{SolveError, StepLibrary};
pub use session::{Command, Session, SessionError};
pub use snapshot::{AttemptSnapshot, SnapshotError};
