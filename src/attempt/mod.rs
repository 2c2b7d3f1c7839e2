//! The attempt controller.
//!
//! An [`Attempt`] owns everything about one scramble: the live partial
//! solution being worked on, whether moves go to the normal or the inverse
//! scramble, saved solutions per phase and the metadata attached to them.
//! All operations run to completion on the calling thread. Illegal user
//! actions leave the attempt unchanged and report `false`, `None` or an
//! error value; nothing here panics on user input.

pub mod builder;
pub mod error;
pub mod listeners;
pub mod sort;

pub use builder::AttemptBuilder;
pub use error::BuildError;
pub use listeners::{AttributeListener, CubeListener, Listeners, SavedListener, SavedSolutions};

use crate::config::{ConfigError, Preferences};
use crate::core::algorithm::{Algorithm, AlgorithmError};
use crate::core::cube::Cube;
use crate::core::orientation::{Orientation, Rotation};
use crate::core::solution::{PartialSolution, SolutionKey};
use crate::core::step::{Step, StepKind};
use crate::insertions::InsertionError;
use crate::phase::graph::{natural_next, next_steps};
use crate::phase::rules::{SolveError, StepLibrary};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// State of one FMC attempt.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fmc_attempt::attempt::Attempt;
/// use fmc_attempt::core::{Algorithm, Cube, Step};
/// use fmc_attempt::phase::{SolveError, StepLibrary};
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
/// attempt.set_scramble("R U2 F").unwrap();
/// attempt.advance_to("eofb".parse().unwrap());
/// assert!(attempt.append(&"R".parse().unwrap()));
/// assert_eq!(attempt.solution().full_alg().to_string(), "R");
/// ```
pub struct Attempt {
    scramble: String,
    scramble_alg: Algorithm,
    cube: Cube,
    inverse: bool,
    solution: PartialSolution,
    saved: SavedSolutions,
    done: HashSet<SolutionKey>,
    comments: HashMap<SolutionKey, String>,
    continuations: HashMap<SolutionKey, Step>,
    orientations: HashMap<SolutionKey, Orientation>,
    obscured: HashSet<SolutionKey>,
    saved_at: HashMap<SolutionKey, DateTime<Utc>>,
    preferences: Preferences,
    library: Arc<dyn StepLibrary + Send + Sync>,
    listeners: Listeners,
}

impl Attempt {
    pub fn new(library: Arc<dyn StepLibrary + Send + Sync>) -> Self {
        Self::with_preferences(library, Preferences::default())
    }

    pub fn with_preferences(
        library: Arc<dyn StepLibrary + Send + Sync>,
        preferences: Preferences,
    ) -> Self {
        Self {
            scramble: String::new(),
            scramble_alg: Algorithm::new(),
            cube: Cube::solved(),
            inverse: false,
            solution: PartialSolution::root(),
            saved: SavedSolutions::new(),
            done: HashSet::new(),
            comments: HashMap::new(),
            continuations: HashMap::new(),
            orientations: HashMap::new(),
            obscured: HashSet::new(),
            saved_at: HashMap::new(),
            preferences,
            library,
            listeners: Listeners::default(),
        }
    }

    pub fn scramble(&self) -> &str {
        &self.scramble
    }

    pub fn inverse_scramble(&self) -> String {
        self.scramble_alg.inverted().to_string()
    }

    /// The cube as currently displayed: inverted while in NISS mode.
    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// The live node.
    pub fn solution(&self) -> &PartialSolution {
        &self.solution
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn library(&self) -> &dyn StepLibrary {
        self.library.as_ref()
    }

    pub fn add_saved_solution_listener(
        &mut self,
        listener: impl FnMut(&SavedSolutions) + Send + 'static,
    ) {
        self.listeners.add_saved(Box::new(listener));
    }

    pub fn add_solution_attribute_listener(
        &mut self,
        listener: impl FnMut(&PartialSolution) + Send + 'static,
    ) {
        self.listeners.add_attribute(Box::new(listener));
    }

    pub fn add_cube_listener(&mut self, listener: impl FnMut(&Cube) + Send + 'static) {
        self.listeners.add_cube(Box::new(listener));
    }

    /// Start over on `scramble`, forgetting every saved solution.
    pub fn set_scramble(&mut self, scramble: &str) -> Result<(), AlgorithmError> {
        let alg: Algorithm = scramble.parse()?;

        self.saved.clear();
        self.done.clear();
        self.comments.clear();
        self.continuations.clear();
        self.orientations.clear();
        self.obscured.clear();
        self.saved_at.clear();
        self.listeners.notify_saved(&self.saved);

        self.scramble = scramble.trim().to_string();
        self.scramble_alg = alg;
        self.inverse = false;
        info!(scramble = %self.scramble, "New scramble");
        self.set_solution(PartialSolution::root());
        Ok(())
    }

    pub fn niss(&mut self) {
        self.set_inverse(!self.inverse);
    }

    pub fn set_inverse(&mut self, inverse: bool) {
        if inverse != self.inverse {
            self.inverse = inverse;
            debug!(inverse, "NISS toggled");
            self.update_cube();
        }
    }

    /// Append moves on the side currently being worked on.
    pub fn append(&mut self, alg: &Algorithm) -> bool {
        self.append_on(alg, self.inverse)
    }

    /// Append moves to the normal or the inverse side, whatever the current
    /// NISS state.
    pub fn append_on(&mut self, alg: &Algorithm, inverse: bool) -> bool {
        let alg = if inverse { alg.on_inverse() } else { alg.clone() };
        if !self.solution.append(&alg, self.library.as_ref()) {
            warn!(moves = %alg, step = %self.solution.step(), "Moves not allowed");
            return false;
        }
        debug!(moves = %alg, step = %self.solution.step(), "Appended moves");
        self.update_cube();
        true
    }

    /// Drop the moves of the live node, or step back out of it if it has
    /// none.
    pub fn back(&mut self) {
        match self.solution.previous().cloned() {
            None => self.set_solution(PartialSolution::root()),
            Some(previous) if !self.solution.alg().is_empty() => {
                let step = self.solution.step();
                self.set_solution(PartialSolution::new(step, Some(previous)));
            }
            Some(popped) => {
                let anchor = popped
                    .previous()
                    .map(|p| (**p).clone())
                    .unwrap_or_else(PartialSolution::root);
                debug!(step = %popped.step(), "Stepping back");
                self.set_solution(anchor);
                self.advance_to(popped.step());
            }
        }
    }

    /// Start working on `step` after the live node. An empty live node is
    /// replaced rather than continued.
    pub fn advance_to(&mut self, step: Step) {
        if self.solution.step() == step {
            return;
        }
        let anchor = match self.solution.previous() {
            Some(previous) if self.solution.alg().is_empty() => Arc::clone(previous),
            _ => Arc::new(self.solution.clone()),
        };
        self.inverse = if anchor.alg().inverse_moves().is_empty() {
            false
        } else {
            anchor.alg().normal_moves().is_empty()
        };
        debug!(from = %anchor.step(), to = %step, "Advancing");
        self.set_solution(PartialSolution::new(step, Some(anchor)));
    }

    /// Continue with the step chosen earlier for the live node, or the
    /// natural successor of its step.
    pub fn advance(&mut self) {
        let next = self
            .continuations
            .get(&self.solution.key())
            .copied()
            .unwrap_or_else(|| natural_next(self.solution.step()));
        self.advance_to(next);
    }

    /// Clear the moves on the side being worked on, keeping the other side.
    pub fn reset(&mut self) {
        let step = self.solution.step();
        let previous = self.solution.previous().cloned();
        let alg = self.solution.alg();
        let kept = if self.inverse {
            Algorithm::from_moves(alg.normal_moves().to_vec(), Vec::new())
        } else {
            Algorithm::from_moves(Vec::new(), alg.inverse_moves().to_vec())
        };
        let fresh = if self.solution.insertions().is_some() {
            PartialSolution::new(step, previous)
        } else {
            PartialSolution::with_alg(step, kept, previous)
        };
        self.set_solution(fresh);
    }

    /// Make `solution` the live node.
    pub fn set_solution(&mut self, mut solution: PartialSolution) {
        if let Some(orientation) = self.orientations.get(&solution.key()) {
            solution.set_orientation(*orientation);
        }
        self.solution = solution;
        self.update_cube();
        self.listeners.notify_attribute(&self.solution);
    }

    /// Move to `step` from wherever the user is. Returns false if the cube
    /// is not eligible for a new step.
    ///
    /// Naming a step kind already passed rewinds to just before it. Naming
    /// the current kind swaps its axis.
    pub fn set_step(&mut self, step: Step) -> bool {
        let mut anchor = Arc::new(self.solution.clone());
        while anchor.alg().is_empty() {
            let Some(previous) = anchor.previous().cloned() else {
                break;
            };
            anchor = previous;
        }

        let chain = anchor.substeps();
        let earlier = chain
            .iter()
            .rev()
            .skip(1)
            .find(|s| s.step().kind() == step.kind());
        if let Some(earlier) = earlier {
            let target = earlier
                .previous()
                .map(|p| (**p).clone())
                .unwrap_or_else(PartialSolution::root);
            debug!(step = %step, "Rewinding");
            self.set_solution(target);
            self.advance_to(step);
            return true;
        }

        if step.kind() == anchor.step().kind() {
            self.back();
            self.advance_to(step);
            return true;
        }

        if self.library.is_eligible(step, &self.normal_cube()) {
            self.advance_to(step);
            true
        } else {
            warn!(step = %step, "Cube is not eligible");
            false
        }
    }

    /// Candidate solutions for the live step, each continuing the live
    /// node's moves. Solutions already saved for this step are skipped.
    /// The attempt is not changed.
    pub fn solve(&self, count: usize) -> Result<Vec<PartialSolution>, SolveError> {
        let max = self.preferences.max_solutions_per_solve;
        if count > max {
            return Err(SolveError::TooMany {
                requested: count,
                max,
            });
        }
        let step = self.solution.step();
        let mut existing: HashSet<String> = self
            .solutions_for_step(step)
            .iter()
            .map(|s| s.full_alg().to_string())
            .collect();

        let requested = existing
            .len()
            .checked_add(count)
            .ok_or(SolveError::TooMany {
                requested: count,
                max,
            })?;
        info!(step = %step, count, "Solving");
        let algs = self.library.solve(step, &self.normal_cube(), requested)?;

        let mut found = Vec::new();
        for alg in algs {
            if found.len() >= count {
                break;
            }
            let candidate = PartialSolution::with_alg(
                step,
                self.solution.alg().merge(&alg),
                self.solution.previous().cloned(),
            );
            if existing.insert(candidate.full_alg().to_string()) {
                found.push(candidate);
            }
        }
        debug!(step = %step, found = found.len(), "Solve finished");
        Ok(found)
    }

    /// Save the live node.
    ///
    /// A solved step is saved as is and the live node moves on: EO, DR and
    /// finish are reset to look for alternatives, other steps advance. An
    /// unsolved step is folded into its predecessor and saved there,
    /// commented with the case it leaves. Returns the saved node, or `None`
    /// when there is nothing to save.
    pub fn save(&mut self) -> Option<PartialSolution> {
        let cube = self.normal_cube();
        let current = self.solution.clone();
        if current.step().is_root() {
            warn!("Nothing to save before the first step");
            return None;
        }

        let to_be_saved = if self.library.is_solved(current.step(), &cube) {
            match current.step().kind() {
                StepKind::Eo | StepKind::Dr | StepKind::Finish => self.reset(),
                _ => self.advance(),
            }
            current
        } else {
            let previous = current.previous().cloned()?;
            if previous.is_root() {
                warn!(step = %current.step(), "Complete at least one step before saving");
                return None;
            }
            let merged = PartialSolution::with_alg(
                previous.step(),
                previous.alg().merge(current.alg()),
                previous.previous().cloned(),
            );
            let key = merged.key();
            if !self.comments.contains_key(&key) {
                let case = self.library.case_name(current.step(), &cube);
                let comment = if next_steps(merged.step()).len() > 1 {
                    format!("{}-{}", current.step(), case)
                } else {
                    case
                };
                self.set_comment(&merged, comment);
            }
            self.continuations.insert(key.clone(), current.step());
            self.orientations.insert(key, current.orientation());
            merged
        };

        info!(step = %to_be_saved.step(), alg = %to_be_saved.full_alg(), "Saved solution");
        self.save_solutions(vec![to_be_saved.clone()]);
        Some(to_be_saved)
    }

    /// Add solutions to their phase buckets, skipping any whose cumulative
    /// algorithm is already saved there.
    pub fn save_solutions(&mut self, solutions: Vec<PartialSolution>) {
        let now = Utc::now();
        for solution in solutions {
            let key = solution.key();
            let bucket = self.saved.entry(solution.step().kind()).or_default();
            if bucket.iter().any(|s| s.full_alg().to_string() == key.alg) {
                continue;
            }
            self.saved_at.entry(key).or_insert(now);
            bucket.push(Arc::new(solution));
        }
        self.resort();
        self.listeners.notify_saved(&self.saved);
    }

    /// Put back a saved solution with the bookkeeping it had when captured.
    pub(crate) fn restore_saved(
        &mut self,
        solution: PartialSolution,
        saved_at: Option<DateTime<Utc>>,
        continuation: Option<Step>,
        orientation: Option<Orientation>,
    ) {
        let key = solution.key();
        if let Some(saved_at) = saved_at {
            self.saved_at.insert(key.clone(), saved_at);
        }
        if let Some(step) = continuation {
            self.continuations.insert(key.clone(), step);
        }
        if let Some(orientation) = orientation {
            self.orientations.insert(key, orientation);
        }
        self.save_solutions(vec![solution]);
    }

    pub(crate) fn continuation(&self, solution: &PartialSolution) -> Option<Step> {
        self.continuations.get(&solution.key()).copied()
    }

    pub(crate) fn saved_orientation(&self, solution: &PartialSolution) -> Option<Orientation> {
        self.orientations.get(&solution.key()).copied()
    }

    /// Remove a saved solution. If the user was working from it, fall back
    /// to its predecessor.
    pub fn forget(&mut self, solution: &PartialSolution) -> bool {
        let key = solution.key();
        let kind = solution.step().kind();
        let Some(bucket) = self.saved.get_mut(&kind) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|s| s.key() != key);
        if bucket.len() == before {
            return false;
        }
        if bucket.is_empty() {
            self.saved.remove(&kind);
        }
        self.done.remove(&key);
        self.obscured.remove(&key);
        self.saved_at.remove(&key);
        info!(step = %key.step, alg = %key.alg, "Forgot solution");

        let working_from = self.solution.key() == key
            || self.solution.previous().is_some_and(|p| p.key() == key);
        if working_from {
            match solution.previous() {
                Some(previous) => {
                    let previous = (**previous).clone();
                    let step = previous.step();
                    self.set_solution(previous);
                    if self.library.is_solved(step, &self.normal_cube()) {
                        self.advance();
                    }
                }
                None => self.back(),
            }
        }
        self.listeners.notify_saved(&self.saved);
        true
    }

    /// Make a saved solution the live node and continue from it.
    pub fn select(&mut self, solution: &PartialSolution) {
        debug!(step = %solution.step(), alg = %solution.full_alg(), "Selected solution");
        self.set_solution(solution.clone());
        self.advance();
    }

    /// Flip the done flag. Only saved solutions can be done, so for any
    /// other node the flag of its predecessor is flipped instead.
    pub fn toggle_done(&mut self, solution: &PartialSolution) {
        let key = solution.key();
        if self.is_saved(&key) {
            if !self.done.remove(&key) {
                self.done.insert(key);
            }
            self.listeners.notify_attribute(solution);
        } else if let Some(previous) = solution.previous() {
            let previous = Arc::clone(previous);
            self.toggle_done(&previous);
        }
    }

    pub fn toggle_obscured(&mut self, solution: &PartialSolution) {
        let key = solution.key();
        if !self.obscured.remove(&key) {
            self.obscured.insert(key);
        }
        self.listeners.notify_attribute(solution);
    }

    pub fn set_comment(&mut self, solution: &PartialSolution, comment: impl Into<String>) {
        self.comments.insert(solution.key(), comment.into());
        self.listeners.notify_attribute(solution);
    }

    pub fn get_comment(&self, solution: &PartialSolution) -> Option<&str> {
        self.comments.get(&solution.key()).map(String::as_str)
    }

    pub fn is_done(&self, solution: &PartialSolution) -> bool {
        self.done.contains(&solution.key())
    }

    pub fn is_obscured(&self, solution: &PartialSolution) -> bool {
        self.obscured.contains(&solution.key())
    }

    pub fn saved_at(&self, solution: &PartialSolution) -> Option<DateTime<Utc>> {
        self.saved_at.get(&solution.key()).copied()
    }

    /// Display label: `alg // comment (move count)`, with every move shown
    /// as `?` when the solution is obscured.
    pub fn to_str(&self, solution: &PartialSolution) -> String {
        let comment = self
            .get_comment(solution)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| solution.step().label());
        let alg = if self.is_obscured(solution) {
            solution.alg().masked()
        } else {
            solution.alg().to_string()
        };
        format!("{} // {} ({})", alg, comment, solution.full_alg().len())
    }

    pub fn solutions_by_kind(&self) -> &SavedSolutions {
        &self.saved
    }

    /// Saved solutions for exactly `step`, axis included.
    pub fn solutions_for_step(&self, step: Step) -> Vec<Arc<PartialSolution>> {
        self.saved
            .get(&step.kind())
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|s| s.step() == step)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The most recent node in the live chain whose step is solved.
    pub fn last_solved_step(&self) -> Option<PartialSolution> {
        let cube = self.normal_cube();
        self.solution
            .substeps()
            .into_iter()
            .rev()
            .find(|s| self.library.is_solved(s.step(), &cube))
            .cloned()
    }

    /// Turn the displayed cube of the live node.
    pub fn rotate(&mut self, rotation: Rotation, ticks: u8) {
        let orientation = self.solution.orientation().rotate(rotation, ticks);
        self.solution.set_orientation(orientation);
        self.listeners.notify_cube(&self.cube);
    }

    /// Retype the solution of a live insertions node. Rejected text leaves
    /// the node unchanged.
    pub fn set_replacement(&mut self, text: &str, cursor: usize) -> Result<(), InsertionError> {
        if let Err(e) = self.solution.set_replacement(text, cursor) {
            warn!(error = %e, "Replacement rejected");
            return Err(e);
        }
        self.update_cube();
        self.listeners.notify_attribute(&self.solution);
        Ok(())
    }

    /// Replace the preferences, re-sorting every phase.
    pub fn set_preferences(&mut self, preferences: Preferences) -> Result<(), ConfigError> {
        preferences.validate()?;
        self.preferences = preferences;
        self.resort();
        self.listeners.notify_saved(&self.saved);
        Ok(())
    }

    fn is_saved(&self, key: &SolutionKey) -> bool {
        self.saved
            .get(&key.step.kind())
            .is_some_and(|bucket| bucket.iter().any(|s| s.key() == *key))
    }

    fn resort(&mut self) {
        for bucket in self.saved.values_mut() {
            sort::sort_solutions(bucket, &self.preferences, &self.saved_at);
        }
    }

    /// Scramble followed by the live solution, never inverted.
    pub fn normal_cube(&self) -> Cube {
        let mut cube = Cube::solved();
        cube.apply(&self.scramble_alg);
        cube.apply(&self.solution.full_alg());
        cube
    }

    fn update_cube(&mut self) {
        let mut cube = self.normal_cube();
        if self.inverse {
            cube.invert();
        }
        self.cube = cube;
        self.listeners.notify_cube(&self.cube);
    }
}

impl std::fmt::Debug for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attempt")
            .field("scramble", &self.scramble)
            .field("inverse", &self.inverse)
            .field("step", &self.solution.step())
            .field("alg", &self.solution.alg().to_string())
            .field("listeners", &self.listeners)
            .finish()
    }
}
