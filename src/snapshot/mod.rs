//! Snapshots of an attempt.
//!
//! An [`AttemptSnapshot`] captures the scramble, the live solution and every
//! saved solution with its comment, flags and save time, so an attempt can
//! be written to disk and picked up later. Listeners and the step library
//! are not part of a snapshot; they belong to the attempt it is restored
//! into.
//!
//! An insertions step is captured with the text last typed into it, which
//! is typed again on restore to bring back its markers.

use crate::attempt::Attempt;
use crate::core::algorithm::Algorithm;
use crate::core::orientation::Orientation;
use crate::core::solution::PartialSolution;
use crate::core::step::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// A solution as its steps from the root, each with its own moves.
pub type Chain = Vec<(Step, Algorithm)>;

/// Text typed into the insertions step at the end of a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedEdit {
    pub text: String,
    pub cursor: usize,
}

/// A saved solution and what the attempt knew about it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub chain: Chain,
    pub comment: Option<String>,
    pub done: bool,
    pub obscured: bool,
    pub saved_at: Option<DateTime<Utc>>,
    /// Step the user was working on when this was saved unsolved.
    pub continuation: Option<Step>,
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub edit: Option<TypedEdit>,
}

/// Serializable state of an attempt.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fmc_attempt::attempt::Attempt;
/// use fmc_attempt::core::{Algorithm, Cube, Step};
/// use fmc_attempt::phase::{SolveError, StepLibrary};
/// use fmc_attempt::snapshot::AttemptSnapshot;
///
/// struct Unconstrained;
///
/// impl StepLibrary for Unconstrained {
///     fn is_solved(&self, _: Step, _: &Cube) -> bool { false }
///     fn is_eligible(&self, _: Step, _: &Cube) -> bool { true }
///     fn are_moves_allowed(&self, _: Step, _: &Algorithm) -> bool { true }
///     fn case_name(&self, _: Step, _: &Cube) -> String { String::new() }
///     fn solve(&self, _: Step, _: &Cube, _: usize) -> Result<Vec<Algorithm>, SolveError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let mut attempt = Attempt::new(Arc::new(Unconstrained));
/// attempt.set_scramble("R U F").unwrap();
/// attempt.advance_to("eofb".parse().unwrap());
/// attempt.append(&"D".parse().unwrap());
///
/// let json = AttemptSnapshot::capture(&attempt).to_json().unwrap();
///
/// let mut restored = Attempt::new(Arc::new(Unconstrained));
/// AttemptSnapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();
/// assert_eq!(restored.scramble(), "R U F");
/// assert_eq!(restored.solution().full_alg().to_string(), "D");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    pub scramble: String,

    /// Whether the inverse scramble was being worked on
    pub inverse: bool,

    /// The live solution
    pub live: Chain,

    #[serde(default)]
    pub live_edit: Option<TypedEdit>,

    pub saved: Vec<SavedEntry>,
}

impl AttemptSnapshot {
    pub fn capture(attempt: &Attempt) -> Self {
        let saved = attempt
            .solutions_by_kind()
            .values()
            .flatten()
            .map(|solution| SavedEntry {
                chain: chain_of(solution),
                comment: attempt.get_comment(solution).map(str::to_string),
                done: attempt.is_done(solution),
                obscured: attempt.is_obscured(solution),
                saved_at: attempt.saved_at(solution),
                continuation: attempt.continuation(solution),
                orientation: attempt.saved_orientation(solution),
                edit: typed_edit(solution),
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            scramble: attempt.scramble().to_string(),
            inverse: attempt.is_inverse(),
            live: chain_of(attempt.solution()),
            live_edit: typed_edit(attempt.solution()),
            saved,
        }
    }

    /// Replace the state of `attempt` with this snapshot. Everything is
    /// checked first, so on error the attempt is untouched.
    pub fn restore(&self, attempt: &mut Attempt) -> Result<(), SnapshotError> {
        self.check_version()?;
        self.scramble.parse::<Algorithm>()?;
        let live = rebuild(&self.live, self.live_edit.as_ref())?;
        let saved = self
            .saved
            .iter()
            .map(|entry| Ok((rebuild(&entry.chain, entry.edit.as_ref())?, entry)))
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        attempt.set_scramble(&self.scramble)?;
        for (solution, entry) in saved {
            attempt.restore_saved(
                solution.clone(),
                entry.saved_at,
                entry.continuation,
                entry.orientation,
            );
            if let Some(comment) = &entry.comment {
                attempt.set_comment(&solution, comment.clone());
            }
            if entry.done {
                attempt.toggle_done(&solution);
            }
            if entry.obscured {
                attempt.toggle_obscured(&solution);
            }
        }
        attempt.set_solution(live);
        attempt.set_inverse(self.inverse);
        info!(id = %self.id, saved = self.saved.len(), "Restored snapshot");
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

fn chain_of(solution: &PartialSolution) -> Chain {
    solution
        .substeps()
        .into_iter()
        .map(|s| (s.step(), s.alg().clone()))
        .collect()
}

fn typed_edit(solution: &PartialSolution) -> Option<TypedEdit> {
    let (text, cursor) = solution.insertions()?.edit.typed()?;
    Some(TypedEdit {
        text: text.to_string(),
        cursor,
    })
}

fn rebuild(
    chain: &[(Step, Algorithm)],
    edit: Option<&TypedEdit>,
) -> Result<PartialSolution, SnapshotError> {
    let ((first, first_alg), rest) = chain
        .split_first()
        .ok_or_else(|| SnapshotError::InvalidChain("empty".to_string()))?;
    if !first.is_root() {
        return Err(SnapshotError::InvalidChain(format!(
            "starts at '{}' instead of the root",
            first
        )));
    }
    let mut node = PartialSolution::with_alg(*first, first_alg.clone(), None);
    for (step, alg) in rest {
        if step.is_root() {
            return Err(SnapshotError::InvalidChain("root after the first step".to_string()));
        }
        node = PartialSolution::with_alg(*step, alg.clone(), Some(Arc::new(node)));
    }
    if let Some(edit) = edit {
        node.set_replacement(&edit.text, edit.cursor)?;
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cube::Cube;
    use crate::phase::rules::{SolveError, StepLibrary};

    struct SolvedCube;

    impl StepLibrary for SolvedCube {
        fn is_solved(&self, _step: Step, cube: &Cube) -> bool {
            cube.is_solved()
        }

        fn is_eligible(&self, _step: Step, _cube: &Cube) -> bool {
            true
        }

        fn are_moves_allowed(&self, _step: Step, _alg: &Algorithm) -> bool {
            true
        }

        fn case_name(&self, _step: Step, _cube: &Cube) -> String {
            "2e".to_string()
        }

        fn solve(&self, _step: Step, _cube: &Cube, _count: usize) -> Result<Vec<Algorithm>, SolveError> {
            Ok(Vec::new())
        }
    }

    fn attempt_with_saves() -> Attempt {
        let mut attempt = Attempt::new(Arc::new(SolvedCube));
        attempt.set_scramble("R U").unwrap();
        attempt.advance_to("eofb".parse().unwrap());
        attempt.append(&"U'".parse().unwrap());
        attempt.advance_to("drud".parse().unwrap());
        attempt.append(&"R'".parse().unwrap());
        let saved = attempt.save().unwrap();
        attempt.set_comment(&saved, "solved");
        attempt.toggle_done(&saved);
        attempt
    }

    #[test]
    fn json_round_trip_restores_saved_solutions() {
        let attempt = attempt_with_saves();
        let json = AttemptSnapshot::capture(&attempt).to_json().unwrap();

        let mut restored = Attempt::new(Arc::new(SolvedCube));
        AttemptSnapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();

        let dr = restored.solutions_for_step("drud".parse().unwrap());
        assert_eq!(dr.len(), 1);
        assert_eq!(dr[0].full_alg().to_string(), "U' R'");
        assert_eq!(restored.get_comment(&dr[0]), Some("solved"));
        assert!(restored.is_done(&dr[0]));
        assert_eq!(restored.saved_at(&dr[0]), attempt.saved_at(&dr[0]));
    }

    #[test]
    fn binary_round_trip() {
        let snapshot = AttemptSnapshot::capture(&attempt_with_saves());
        let bytes = snapshot.to_bytes().unwrap();
        let back = AttemptSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(back.id, snapshot.id);
        assert_eq!(back.live, snapshot.live);
        assert_eq!(back.saved, snapshot.saved);
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut snapshot = AttemptSnapshot::capture(&attempt_with_saves());
        snapshot.version = SNAPSHOT_VERSION + 1;
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(matches!(
            AttemptSnapshot::from_json(&json),
            Err(SnapshotError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn bad_chain_leaves_attempt_untouched() {
        let mut snapshot = AttemptSnapshot::capture(&attempt_with_saves());
        snapshot.live.remove(0);

        let mut target = attempt_with_saves();
        let before = target.solution().key();
        assert!(matches!(
            snapshot.restore(&mut target),
            Err(SnapshotError::InvalidChain(_))
        ));
        assert_eq!(target.solution().key(), before);
        assert!(!target.solutions_by_kind().is_empty());
    }

    #[test]
    fn insertion_markers_survive_restore() {
        let mut attempt = Attempt::new(Arc::new(SolvedCube));
        attempt.set_scramble("R U").unwrap();
        attempt.advance_to(Step::FINISH);
        attempt.append(&"U' R'".parse().unwrap());
        attempt.advance_to(Step::INSERTIONS);
        attempt.set_replacement("U' Rw R'", 3).unwrap();
        let markers = attempt.solution().insertions().unwrap().markers.clone();

        let json = AttemptSnapshot::capture(&attempt).to_json().unwrap();
        let mut restored = Attempt::new(Arc::new(SolvedCube));
        AttemptSnapshot::from_json(&json).unwrap().restore(&mut restored).unwrap();

        let state = restored.solution().insertions().unwrap();
        assert_eq!(state.markers, markers);
        assert_eq!(state.edit.typed(), Some(("U' Rw R'", 3)));
        assert_eq!(restored.solution().alg(), attempt.solution().alg());
    }

    #[test]
    fn edit_on_plain_step_is_rejected() {
        let mut snapshot = AttemptSnapshot::capture(&attempt_with_saves());
        snapshot.live_edit = Some(TypedEdit {
            text: "R".to_string(),
            cursor: 1,
        });
        let mut target = attempt_with_saves();
        assert!(matches!(
            snapshot.restore(&mut target),
            Err(SnapshotError::InvalidEdit(_))
        ));
    }
}
