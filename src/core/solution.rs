//! The partial-solution tree.
//!
//! Every solving phase contributes one [`PartialSolution`] node holding just
//! the moves of that phase and a shared link to the phase it continues.
//! Saved alternatives branch off common ancestors, so the links form a tree
//! of shared suffixes rather than a chain owned by one attempt.

use crate::core::algorithm::Algorithm;
use crate::core::orientation::Orientation;
use crate::core::step::Step;
use crate::insertions::{InsertionError, Insertions, Markers};
use crate::phase::rules::StepLibrary;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Content identity of a node: its step and cumulative algorithm.
///
/// Metadata about nodes (comments, flags, timestamps) is keyed by this
/// rather than by the node itself, so two nodes reached by different
/// paths but with the same result share their metadata.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct SolutionKey {
    pub step: Step,
    pub alg: String,
}

/// Insertion edit state carried by an insertions node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InsertionState {
    pub edit: Insertions,
    pub markers: Markers,
}

/// One phase's contribution to a solution.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fmc_attempt::core::{Algorithm, PartialSolution, Step};
///
/// let root = Arc::new(PartialSolution::root());
/// let eo = PartialSolution::with_alg(
///     "eofb".parse::<Step>().unwrap(),
///     "R U".parse::<Algorithm>().unwrap(),
///     Some(root),
/// );
/// let dr = PartialSolution::with_alg(
///     "drud".parse::<Step>().unwrap(),
///     "U' F".parse::<Algorithm>().unwrap(),
///     Some(Arc::new(eo)),
/// );
///
/// assert_eq!(dr.full_alg().to_string(), "R F");
/// assert_eq!(dr.substeps().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct PartialSolution {
    step: Step,
    alg: Algorithm,
    previous: Option<Arc<PartialSolution>>,
    orientation: Orientation,
    insertions: Option<InsertionState>,
}

impl PartialSolution {
    /// The attempt root: nothing solved, no moves.
    pub fn root() -> Self {
        Self::new(Step::SCRAMBLED, None)
    }

    /// An empty node for `step` continuing from `previous`.
    pub fn new(step: Step, previous: Option<Arc<PartialSolution>>) -> Self {
        Self::with_alg(step, Algorithm::new(), previous)
    }

    pub fn with_alg(step: Step, alg: Algorithm, previous: Option<Arc<PartialSolution>>) -> Self {
        let orientation = Orientation::following(
            step,
            previous.as_deref().map(|p| (p.step, p.orientation)),
        );
        let insertions = if step == Step::INSERTIONS {
            let original = previous
                .as_deref()
                .map(PartialSolution::full_alg)
                .unwrap_or_default();
            let edit = Insertions::new(original);
            let markers = edit.markers();
            Some(InsertionState { edit, markers })
        } else {
            None
        };
        Self {
            step,
            alg,
            previous,
            orientation,
            insertions,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// This phase's own moves.
    pub fn alg(&self) -> &Algorithm {
        &self.alg
    }

    pub fn previous(&self) -> Option<&Arc<PartialSolution>> {
        self.previous.as_ref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn insertions(&self) -> Option<&InsertionState> {
        self.insertions.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.previous.is_none()
    }

    /// The same node with its own moves replaced.
    pub fn with_moves(&self, alg: Algorithm) -> Self {
        Self::with_alg(self.step, alg, self.previous.clone())
    }

    /// Cumulative algorithm from the root through this node.
    pub fn full_alg(&self) -> Algorithm {
        match &self.previous {
            Some(prev) => prev.full_alg().merge(&self.alg),
            None => self.alg.clone(),
        }
    }

    /// Nodes from the root down to and including this one.
    pub fn substeps(&self) -> Vec<&PartialSolution> {
        let mut chain = vec![self];
        let mut node = self;
        while let Some(prev) = node.previous.as_deref() {
            chain.push(prev);
            node = prev;
        }
        chain.reverse();
        chain
    }

    /// True when neither this node nor any ancestor has moves.
    pub fn is_empty(&self) -> bool {
        self.substeps().iter().all(|s| s.alg.is_empty())
    }

    pub fn key(&self) -> SolutionKey {
        SolutionKey {
            step: self.step,
            alg: self.full_alg().to_string(),
        }
    }

    /// Whether `alg` respects the constraints of the phase this one
    /// continues. The root and finish phases constrain nothing.
    pub fn allows_moves(&self, alg: &Algorithm, lib: &dyn StepLibrary) -> bool {
        match self.previous.as_deref() {
            None => true,
            Some(prev) if prev.step.is_root() || prev.step == Step::FINISH => true,
            Some(prev) => lib.are_moves_allowed(prev.step, alg),
        }
    }

    /// Merge `alg` into this node's moves. Returns false, leaving the node
    /// unchanged, if the moves are not allowed here. Insertions nodes only
    /// change through [`set_replacement`](Self::set_replacement).
    pub fn append(&mut self, alg: &Algorithm, lib: &dyn StepLibrary) -> bool {
        if self.insertions.is_some() || !self.allows_moves(alg, lib) {
            return false;
        }
        self.alg = self.alg.merge(alg);
        true
    }

    /// Retype the whole solution of an insertions node. See
    /// [`Insertions::set_replacement`].
    pub fn set_replacement(&mut self, text: &str, cursor: usize) -> Result<(), InsertionError> {
        let state = self.insertions.as_mut().ok_or(InsertionError::NotActive)?;
        state.edit.set_replacement(text, cursor)?;
        state.markers = state.edit.markers();
        self.alg = state.edit.net_alg();
        Ok(())
    }
}

impl PartialEq for PartialSolution {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PartialSolution {}

impl Hash for PartialSolution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
