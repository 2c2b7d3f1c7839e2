//! User preferences for an attempt.
//!
//! Preferences are an ordinary value owned by whoever builds the
//! [`Attempt`](crate::attempt::Attempt). Changing them on a live attempt goes
//! through [`Attempt::set_preferences`](crate::attempt::Attempt::set_preferences),
//! which re-sorts saved solutions and notifies listeners.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on solutions requested from the solver in one call.
pub const DEFAULT_MAX_SOLUTIONS_PER_SOLVE: usize = 50;

/// Errors that can occur loading or saving preferences
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to access preferences: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preferences file: {0}")]
    Parse(String),

    #[error("Invalid preference: {0}")]
    Invalid(String),
}

/// How saved solutions are ordered within a phase.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Shortest cumulative solution first.
    #[default]
    MoveCount,
    /// Oldest save first.
    SaveTime,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::MoveCount => write!(f, "movecount"),
            SortOrder::SaveTime => write!(f, "time"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movecount" | "move_count" | "length" => Ok(SortOrder::MoveCount),
            "time" | "save_time" => Ok(SortOrder::SaveTime),
            other => Err(ConfigError::Invalid(format!("unknown sort order '{}'", other))),
        }
    }
}

/// Attempt preferences.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::config::{Preferences, SortOrder};
///
/// let prefs = Preferences::from_json(r#"{"sort_order": "save_time"}"#).unwrap();
/// assert_eq!(prefs.sort_order, SortOrder::SaveTime);
/// assert!(!prefs.group_by_axis);
/// assert_eq!(prefs.max_solutions_per_solve, 50);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub sort_order: SortOrder,
    /// Group saved solutions by step and axis before sorting.
    pub group_by_axis: bool,
    pub max_solutions_per_solve: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sort_order: SortOrder::default(),
            group_by_axis: false,
            max_solutions_per_solve: DEFAULT_MAX_SOLUTIONS_PER_SOLVE,
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_solutions_per_solve == 0 {
            return Err(ConfigError::Invalid(
                "max_solutions_per_solve must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let prefs: Preferences =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        prefs.validate()?;
        Ok(prefs)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.sort_order, SortOrder::MoveCount);
        assert!(!prefs.group_by_axis);
        assert_eq!(prefs.max_solutions_per_solve, 50);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let prefs = Preferences::from_json("{}").unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn json_round_trip() {
        let prefs = Preferences {
            sort_order: SortOrder::SaveTime,
            group_by_axis: true,
            max_solutions_per_solve: 10,
        };
        let json = prefs.to_json().unwrap();
        assert_eq!(Preferences::from_json(&json).unwrap(), prefs);
    }

    #[test]
    fn rejects_zero_solve_cap() {
        let result = Preferences::from_json(r#"{"max_solutions_per_solve": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Preferences::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn sort_order_names() {
        assert_eq!("movecount".parse::<SortOrder>().unwrap(), SortOrder::MoveCount);
        assert_eq!("time".parse::<SortOrder>().unwrap(), SortOrder::SaveTime);
        assert!("random".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::SaveTime.to_string(), "time");
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let prefs = Preferences {
            group_by_axis: true,
            ..Preferences::default()
        };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
    }
}
