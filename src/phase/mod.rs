//! The phase graph and the rules each phase imposes.

pub mod graph;
pub mod rules;

pub use graph::{default_next, natural_next, next_steps};
pub use rules::{SolveError, StepLibrary};
