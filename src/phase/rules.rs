//! Per-step rules supplied by a cube library.
//!
//! Recognizing whether a step is solved, which moves keep it solved and
//! searching for solutions all belong to an external solver. The attempt
//! only talks to it through [`StepLibrary`].

use crate::core::algorithm::Algorithm;
use crate::core::cube::Cube;
use crate::core::step::Step;
use thiserror::Error;

/// Errors reported by a [`StepLibrary`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("No solver available for '{0}'")]
    Unsupported(String),

    #[error("Requested {requested} solutions, at most {max} allowed")]
    TooMany { requested: usize, max: usize },

    #[error("Solver failed: {0}")]
    Failed(String),
}

/// Rules and solver for every step.
pub trait StepLibrary {
    /// Whether the goal of `step` is reached on `cube`.
    fn is_solved(&self, step: Step, cube: &Cube) -> bool;

    /// Whether work on `step` may start from `cube`.
    fn is_eligible(&self, step: Step, cube: &Cube) -> bool;

    /// Whether `alg` preserves what `step` achieved.
    ///
    /// The default applies the moves to a solved cube and checks that the
    /// step still reads as solved.
    fn are_moves_allowed(&self, step: Step, alg: &Algorithm) -> bool {
        let mut cube = Cube::solved();
        cube.apply(alg);
        self.is_solved(step, &cube)
    }

    /// Short recognition label for the case `cube` shows for `step`.
    fn case_name(&self, step: Step, cube: &Cube) -> String;

    /// Up to `count` algorithms solving `step` from `cube`, best first.
    fn solve(&self, step: Step, cube: &Cube, count: usize) -> Result<Vec<Algorithm>, SolveError>;

    /// A random scramble.
    fn scramble(&self) -> Result<String, SolveError> {
        Err(SolveError::Unsupported("scramble".to_string()))
    }
}
