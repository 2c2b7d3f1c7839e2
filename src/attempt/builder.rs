//! Builder for constructing attempts.

use crate::attempt::error::BuildError;
use crate::attempt::Attempt;
use crate::config::Preferences;
use crate::phase::rules::StepLibrary;
use std::sync::Arc;

/// Builder for an [`Attempt`] with a fluent API.
#[derive(Default)]
pub struct AttemptBuilder {
    library: Option<Arc<dyn StepLibrary + Send + Sync>>,
    preferences: Preferences,
    scramble: Option<String>,
}

impl AttemptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step library (required).
    pub fn library(mut self, library: Arc<dyn StepLibrary + Send + Sync>) -> Self {
        self.library = Some(library);
        self
    }

    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Start from `scramble` instead of a solved cube.
    pub fn scramble(mut self, scramble: impl Into<String>) -> Self {
        self.scramble = Some(scramble.into());
        self
    }

    /// Build the attempt.
    /// Returns an error if the library is missing or a value is invalid.
    pub fn build(self) -> Result<Attempt, BuildError> {
        let library = self.library.ok_or(BuildError::MissingLibrary)?;
        self.preferences.validate()?;

        let mut attempt = Attempt::with_preferences(library, self.preferences);
        if let Some(scramble) = self.scramble {
            attempt.set_scramble(&scramble)?;
        }
        Ok(attempt)
    }
}
