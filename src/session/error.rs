//! Session error types.

use crate::core::algorithm::AlgorithmError;
use crate::insertions::InsertionError;
use crate::phase::rules::SolveError;
use crate::session::command::CommandError;
use std::fmt;
use thiserror::Error;

/// A script line that failed to parse.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptLineError {
    /// 1-based line number.
    pub line: usize,
    pub error: CommandError,
}

impl fmt::Display for ScriptLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Errors that can occur running commands or scripts
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unable to access session file: {0}")]
    Io(#[from] std::io::Error),

    /// Every line of the script that failed to parse
    #[error("Invalid session script ({} bad lines)", .0.len())]
    Script(Vec<ScriptLineError>),

    #[error(transparent)]
    Command(#[from] CommandError),

    /// The attempt refused the command; the message says why
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("Invalid replacement: {0}")]
    Insertion(#[from] InsertionError),

    #[error("Invalid scramble: {0}")]
    Scramble(#[from] AlgorithmError),
}
