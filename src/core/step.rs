//! Solving phases and the axis they are solved on.
//!
//! A [`Step`] names a position in the phase graph, e.g. `eofb` or `htrud`.
//! Only meaningful kind/axis pairs can be constructed, so every table keyed
//! by a step is an exhaustive match.

use crate::core::moves::Face;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when naming a step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("Unknown step '{0}'")]
    UnknownStep(String),

    #[error("Unknown axis '{0}'")]
    UnknownAxis(String),

    #[error("Step '{kind}' cannot be solved on axis '{axis}'")]
    InvalidAxis { kind: String, axis: String },
}

/// Solving phase.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// The attempt root: nothing solved yet.
    Scrambled,
    Eo,
    Dr,
    Htr,
    Fr,
    Slice,
    Finish,
    Insertions,
}

impl StepKind {
    pub const ALL: [StepKind; 8] = [
        StepKind::Scrambled,
        StepKind::Eo,
        StepKind::Dr,
        StepKind::Htr,
        StepKind::Fr,
        StepKind::Slice,
        StepKind::Finish,
        StepKind::Insertions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Scrambled => "",
            StepKind::Eo => "eo",
            StepKind::Dr => "dr",
            StepKind::Htr => "htr",
            StepKind::Fr => "fr",
            StepKind::Slice => "slice",
            StepKind::Finish => "finish",
            StepKind::Insertions => "insertions",
        }
    }

    /// Whether the kind is solved on one of the three axes.
    pub fn has_axis(self) -> bool {
        matches!(
            self,
            StepKind::Eo | StepKind::Dr | StepKind::Htr | StepKind::Fr | StepKind::Slice
        )
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| StepError::UnknownStep(s.to_string()))
    }
}

/// Cube axis a phase is solved on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// No axis (root, finish and insertions).
    Any,
    Ud,
    Fb,
    Rl,
}

impl Axis {
    pub const SOLVING: [Axis; 3] = [Axis::Ud, Axis::Fb, Axis::Rl];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Any => "",
            Axis::Ud => "ud",
            Axis::Fb => "fb",
            Axis::Rl => "rl",
        }
    }

    /// Whether `face` lies on this axis. Nothing lies on [`Axis::Any`].
    pub fn contains(self, face: Face) -> bool {
        match self {
            Axis::Any => false,
            Axis::Ud => matches!(face, Face::U | Face::D),
            Axis::Fb => matches!(face, Face::F | Face::B),
            Axis::Rl => matches!(face, Face::R | Face::L),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" => Ok(Axis::Any),
            "ud" | "du" => Ok(Axis::Ud),
            "fb" | "bf" => Ok(Axis::Fb),
            "rl" | "lr" => Ok(Axis::Rl),
            _ => Err(StepError::UnknownAxis(s.to_string())),
        }
    }
}

/// A phase together with its axis.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::core::{Axis, Step, StepKind};
///
/// let step = Step::new(StepKind::Eo, Axis::Fb).unwrap();
/// assert_eq!(step.to_string(), "eofb");
/// assert_eq!("eofb".parse::<Step>().unwrap(), step);
///
/// // EO always needs an axis
/// assert!(Step::new(StepKind::Eo, Axis::Any).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Step {
    kind: StepKind,
    axis: Axis,
}

impl Step {
    pub const SCRAMBLED: Step = Step::fixed(StepKind::Scrambled);
    pub const FINISH: Step = Step::fixed(StepKind::Finish);
    pub const INSERTIONS: Step = Step::fixed(StepKind::Insertions);

    const fn fixed(kind: StepKind) -> Step {
        Step {
            kind,
            axis: Axis::Any,
        }
    }

    pub fn new(kind: StepKind, axis: Axis) -> Result<Step, StepError> {
        if kind.has_axis() == (axis == Axis::Any) {
            return Err(StepError::InvalidAxis {
                kind: kind.to_string(),
                axis: axis.to_string(),
            });
        }
        Ok(Step { kind, axis })
    }

    /// Step on one of the three solving axes. Panics if `kind` has no axis,
    /// which is a programming error.
    pub(crate) fn on_axis(kind: StepKind, axis: Axis) -> Step {
        debug_assert!(kind.has_axis() && axis != Axis::Any);
        Step { kind, axis }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_root(&self) -> bool {
        self.kind == StepKind::Scrambled
    }

    /// Finish and insertions only ever lead to more insertions.
    pub fn is_final(&self) -> bool {
        matches!(self.kind, StepKind::Finish | StepKind::Insertions)
    }

    /// Short display name. HTR, FR and slice are usually named without their
    /// axis since it is fixed by the DR that precedes them.
    pub fn label(&self) -> String {
        match self.kind {
            StepKind::Htr | StepKind::Fr | StepKind::Slice => self.kind.to_string(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.axis)
    }
}

impl FromStr for Step {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        for kind in StepKind::ALL {
            if let Some(rest) = lower.strip_prefix(kind.as_str()) {
                if let Ok(axis) = rest.parse::<Axis>() {
                    if let Ok(step) = Step::new(kind, axis) {
                        return Ok(step);
                    }
                }
            }
        }
        Err(StepError::UnknownStep(s.to_string()))
    }
}

impl From<Step> for String {
    fn from(step: Step) -> Self {
        step.to_string()
    }
}

impl TryFrom<String> for Step {
    type Error = StepError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_round_trip() {
        for name in [
            "", "eoud", "eofb", "eorl", "drud", "htrfb", "frrl", "sliceud", "finish", "insertions",
        ] {
            let step: Step = name.parse().unwrap();
            assert_eq!(step.to_string(), name);
        }
    }

    #[test]
    fn invalid_pairs_are_rejected() {
        assert!(Step::new(StepKind::Dr, Axis::Any).is_err());
        assert!(Step::new(StepKind::Finish, Axis::Ud).is_err());
        assert!(Step::new(StepKind::Scrambled, Axis::Fb).is_err());
        assert!("eo".parse::<Step>().is_err());
        assert!("finishud".parse::<Step>().is_err());
        assert!("oll".parse::<Step>().is_err());
    }

    #[test]
    fn label_hides_fixed_axes() {
        assert_eq!("htrud".parse::<Step>().unwrap().label(), "htr");
        assert_eq!("drud".parse::<Step>().unwrap().label(), "drud");
        assert_eq!(Step::FINISH.label(), "finish");
    }

    #[test]
    fn final_steps() {
        assert!(Step::FINISH.is_final());
        assert!(Step::INSERTIONS.is_final());
        assert!(!Step::SCRAMBLED.is_final());
        assert!(!"frud".parse::<Step>().unwrap().is_final());
    }

    #[test]
    fn axis_contains_its_faces() {
        assert!(Axis::Ud.contains(Face::U));
        assert!(Axis::Ud.contains(Face::D));
        assert!(!Axis::Ud.contains(Face::F));
        assert!(!Axis::Any.contains(Face::U));
    }

    #[test]
    fn step_serializes_as_name() {
        let step: Step = "drrl".parse().unwrap();
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, "\"drrl\"");
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
