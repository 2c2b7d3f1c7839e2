//! Errors building an attempt.

use crate::config::ConfigError;
use crate::core::algorithm::AlgorithmError;
use thiserror::Error;

/// Errors that can occur when building an attempt.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Step library not specified. Call .library(lib) before .build()")]
    MissingLibrary,

    #[error("Invalid scramble: {0}")]
    InvalidScramble(#[from] AlgorithmError),

    #[error("Invalid preferences: {0}")]
    InvalidPreferences(#[from] ConfigError),
}
