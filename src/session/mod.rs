//! Command driven sessions.
//!
//! A [`Session`] wraps an [`Attempt`] with the command language from
//! [`command`]: it dispatches parsed commands, keeps the history of those
//! that succeeded, undoes moves and NISS toggles, and saves the history as a
//! replayable script.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fmc_attempt::attempt::Attempt;
//! use fmc_attempt::core::{Algorithm, Cube, Step};
//! use fmc_attempt::phase::{SolveError, StepLibrary};
//! use fmc_attempt::session::Session;
//!
//! struct Unconstrained;
//!
//! impl StepLibrary for Unconstrained {
//!     fn is_solved(&self, _: Step, _: &Cube) -> bool { false }
//!     fn is_eligible(&self, _: Step, _: &Cube) -> bool { true }
//!     fn are_moves_allowed(&self, _: Step, _: &Algorithm) -> bool { true }
//!     fn case_name(&self, _: Step, _: &Cube) -> String { String::new() }
//!     fn solve(&self, _: Step, _: &Cube, _: usize) -> Result<Vec<Algorithm>, SolveError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let mut session = Session::new(Attempt::new(Arc::new(Unconstrained)));
//! session.execute("scramble(\"R U F\")").unwrap();
//! session.execute("eofb").unwrap();
//! session.execute("f' u'").unwrap();
//! assert_eq!(session.attempt().solution().alg().to_string(), "F' U'");
//!
//! session.undo().unwrap();
//! assert!(session.attempt().solution().alg().is_empty());
//! ```

pub mod command;
pub mod error;

pub use command::{Command, CommandError};
pub use error::{ScriptLineError, SessionError};

use crate::attempt::Attempt;
use crate::core::algorithm::Algorithm;
use crate::core::solution::PartialSolution;
use crate::core::step::{Axis, Step, StepKind};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, info, warn};

/// Version written in the header of saved scripts.
pub const SCRIPT_VERSION: u32 = 1;

/// Added before and after generated scramble moves.
const SCRAMBLE_WRAPPER: &str = "R' U' F";

/// An attempt driven by text commands.
#[derive(Debug)]
pub struct Session {
    attempt: Attempt,
    history: Vec<Command>,
    undo_pointer: Option<usize>,
    status: String,
}

impl Session {
    pub fn new(attempt: Attempt) -> Self {
        Self {
            attempt,
            history: Vec::new(),
            undo_pointer: None,
            status: String::new(),
        }
    }

    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    pub fn attempt_mut(&mut self) -> &mut Attempt {
        &mut self.attempt
    }

    /// Commands that succeeded, oldest first.
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    /// Message left by the last command, if it had something to report.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Parse and run one line.
    pub fn execute(&mut self, line: &str) -> Result<(), SessionError> {
        let command: Command = line.parse()?;
        self.run(command)
    }

    /// Run a command, recording it in the history if it succeeds.
    pub fn run(&mut self, command: Command) -> Result<(), SessionError> {
        self.status.clear();
        if command == Command::Undo {
            self.undo()?;
            return Ok(());
        }
        let recorded = self.apply(&command)?;
        debug!(command = %recorded, "Command succeeded");
        self.record(recorded);
        Ok(())
    }

    /// Reverse the most recent undoable command by running its inverse.
    /// Returns false if there is nothing left to undo.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        let Some(pointer) = self.undo_pointer else {
            return Ok(false);
        };
        let inverse = match &self.history[pointer] {
            Command::Moves(alg) => Command::Moves(alg.inverted()),
            Command::Niss => Command::Niss,
            _ => {
                self.undo_pointer = None;
                return Ok(false);
            }
        };
        let recorded = self.apply(&inverse)?;
        self.history.push(recorded);
        self.undo_pointer = pointer.checked_sub(1);
        Ok(true)
    }

    /// The history as a script that [`load_script`](Self::load_script)
    /// replays.
    pub fn script(&self) -> String {
        let mut lines = vec![
            format!("# fmc-attempt session v{}", SCRIPT_VERSION),
            format!("# saved {}", Utc::now().to_rfc3339()),
        ];
        lines.extend(self.history.iter().map(Command::to_string));
        lines.join("\n") + "\n"
    }

    /// Replace the session with a replay of `script`.
    ///
    /// Every line is parsed before anything runs. If any line fails, all
    /// failures are returned and the session is left as it was. Blank lines
    /// and lines starting with `#` are skipped.
    pub fn load_script(&mut self, script: &str) -> Result<(), SessionError> {
        let parsed: Vec<Validation<Command, NonEmptyVec<ScriptLineError>>> = script
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|(i, line)| match line.parse::<Command>() {
                Ok(command) => Validation::success(command),
                Err(error) => Validation::fail(ScriptLineError { line: i + 1, error }),
            })
            .collect();

        let commands = match Validation::all_vec(parsed) {
            Validation::Success(commands) => commands,
            Validation::Failure(errors) => {
                warn!(errors = errors.len(), "Session script rejected");
                return Err(SessionError::Script(errors.iter().cloned().collect()));
            }
        };

        self.attempt.set_scramble("")?;
        self.history.clear();
        self.undo_pointer = None;
        for command in commands {
            if let Err(e) = self.run(command.clone()) {
                warn!(command = %command, error = %e, "Skipped command during replay");
            }
        }
        info!(commands = self.history.len(), "Session replayed");
        Ok(())
    }

    pub fn save_session(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        std::fs::write(path, self.script())?;
        info!(path = %path.display(), "Saved session");
        Ok(())
    }

    /// Load and replay a script written by
    /// [`save_session`](Self::save_session).
    pub fn load_session(&mut self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let script = std::fs::read_to_string(path)?;
        self.load_script(&script)?;
        info!(path = %path.display(), "Loaded session");
        Ok(())
    }

    fn record(&mut self, command: Command) {
        self.history.push(command);
        self.undo_pointer = Some(self.history.len() - 1);
    }

    /// Run a command against the attempt. Returns the command as it should
    /// be recorded.
    fn apply(&mut self, command: &Command) -> Result<Command, SessionError> {
        match command {
            Command::Moves(alg) => self.append_moves(alg)?,
            Command::Rotate(rotation, ticks) => self.attempt.rotate(*rotation, *ticks),
            Command::Step(step) => self.set_step(*step)?,
            Command::Htr => {
                let axis = self.solved_dr_axis().ok_or_else(|| {
                    SessionError::Rejected("Cube is not eligible for HTR".to_string())
                })?;
                self.set_step(Step::on_axis(StepKind::Htr, axis))?;
            }
            Command::Fr(axis) => self.set_step_on_dr_axis(StepKind::Fr, *axis)?,
            Command::Slice(axis) => self.set_step_on_dr_axis(StepKind::Slice, *axis)?,
            Command::Finish => self.set_step(Step::FINISH)?,
            Command::Insertions => self.set_step(Step::INSERTIONS)?,
            Command::Niss => self.attempt.niss(),
            Command::Solve(count) => self.solve(*count)?,
            Command::Comment(text) => {
                let target = self.annotation_target()?;
                self.attempt.set_comment(&target, text.clone());
            }
            Command::Done => {
                let live = self.attempt.solution().clone();
                self.attempt.toggle_done(&live);
            }
            Command::Obscure => {
                let target = self.annotation_target()?;
                self.attempt.toggle_obscured(&target);
            }
            Command::Save => {
                let saved = self.attempt.save().ok_or_else(|| {
                    SessionError::Rejected("Complete at least one step before saving".to_string())
                })?;
                self.status = format!("Saved {}", self.attempt.to_str(&saved));
            }
            Command::Reset => self.attempt.reset(),
            Command::Back => self.attempt.back(),
            Command::Check(kind, index) => {
                let solution = self.saved_solution(*kind, *index)?;
                self.attempt.select(&solution);
            }
            Command::Forget(kind, index) => {
                let solution = self.saved_solution(*kind, *index)?;
                self.attempt.forget(&solution);
            }
            Command::Sort(order, grouped) => {
                let mut preferences = self.attempt.preferences().clone();
                preferences.sort_order = *order;
                preferences.group_by_axis = *grouped;
                self.attempt
                    .set_preferences(preferences)
                    .map_err(|e| SessionError::Rejected(e.to_string()))?;
            }
            Command::Replace(text, cursor) => self.attempt.set_replacement(text, *cursor)?,
            Command::Scramble(Some(scramble)) => self.attempt.set_scramble(scramble)?,
            Command::Scramble(None) => {
                let scramble = self.random_scramble()?;
                self.attempt.set_scramble(&scramble)?;
                return Ok(Command::Scramble(Some(scramble)));
            }
            Command::Undo => {
                return Err(SessionError::Rejected("undo cannot be replayed".to_string()))
            }
        }
        Ok(command.clone())
    }

    /// Append typed moves. If the live step is still empty and the moves
    /// only fit the step before it, that step is reopened and the moves go
    /// there instead.
    fn append_moves(&mut self, alg: &Algorithm) -> Result<(), SessionError> {
        let inverse = self.attempt.is_inverse();
        if self.attempt.append_on(alg, inverse) {
            return Ok(());
        }

        let live = self.attempt.solution();
        let side = if inverse { alg.on_inverse() } else { alg.clone() };
        let reopen = match live.previous() {
            Some(previous) if live.alg().is_empty() && !previous.is_root() => previous
                .allows_moves(&side, self.attempt.library())
                .then(|| previous.alg().clone()),
            _ => None,
        };
        let Some(previous_alg) = reopen else {
            let after = live
                .previous()
                .map(|p| p.step().to_string())
                .unwrap_or_default();
            return Err(SessionError::Rejected(format!(
                "{} not allowed after {}",
                alg, after
            )));
        };

        debug!(moves = %alg, "Reopening previous step");
        self.attempt.back();
        let normal = Algorithm::from_moves(previous_alg.normal_moves().to_vec(), Vec::new());
        let inverted = Algorithm::from_moves(previous_alg.inverse_moves().to_vec(), Vec::new());
        if !normal.is_empty() {
            self.attempt.append_on(&normal, false);
        }
        if !inverted.is_empty() {
            self.attempt.append_on(&inverted, true);
        }
        self.attempt.set_inverse(inverse);
        if self.attempt.append_on(alg, inverse) {
            Ok(())
        } else {
            Err(SessionError::Rejected(format!("{} not allowed here", alg)))
        }
    }

    fn set_step(&mut self, step: Step) -> Result<(), SessionError> {
        if self.attempt.set_step(step) {
            Ok(())
        } else {
            Err(SessionError::Rejected(format!(
                "Cube is not eligible for {}",
                step
            )))
        }
    }

    fn set_step_on_dr_axis(
        &mut self,
        kind: StepKind,
        axis: Option<Axis>,
    ) -> Result<(), SessionError> {
        let axis = axis.or_else(|| self.chain_dr_axis()).ok_or_else(|| {
            SessionError::Rejected(format!(
                "No DR step found. Specify axis=\"...\" to set the {} axis",
                kind
            ))
        })?;
        self.set_step(Step::on_axis(kind, axis))
    }

    /// Axis of the DR step in the live chain.
    fn chain_dr_axis(&self) -> Option<Axis> {
        self.attempt
            .solution()
            .substeps()
            .into_iter()
            .find(|s| s.step().kind() == StepKind::Dr)
            .map(|s| s.step().axis())
    }

    /// First axis on which the cube is in DR.
    fn solved_dr_axis(&self) -> Option<Axis> {
        let cube = self.attempt.normal_cube();
        Axis::SOLVING.into_iter().find(|axis| {
            self.attempt
                .library()
                .is_solved(Step::on_axis(StepKind::Dr, *axis), &cube)
        })
    }

    fn solve(&mut self, count: usize) -> Result<(), SessionError> {
        let step = self.attempt.solution().step();
        let found = self.attempt.solve(count)?;
        let Some(last) = found.last().cloned() else {
            self.status = format!("No solutions found for {}", step);
            return Ok(());
        };
        self.status = format!(
            "Found {} solution{}",
            found.len(),
            if found.len() == 1 { "" } else { "s" }
        );
        self.attempt.save_solutions(found);
        self.attempt.select(&last);
        Ok(())
    }

    /// The live node if it has moves, otherwise the node before it.
    fn annotation_target(&self) -> Result<PartialSolution, SessionError> {
        let live = self.attempt.solution();
        let target = if live.alg().is_empty() {
            live.previous().map(|p| (**p).clone())
        } else {
            Some(live.clone())
        };
        target
            .filter(|t| !t.step().is_root())
            .ok_or_else(|| SessionError::Rejected("Nothing to annotate yet".to_string()))
    }

    fn saved_solution(&self, kind: StepKind, index: usize) -> Result<PartialSolution, SessionError> {
        let missing = || SessionError::Rejected(format!("Couldn't find {} #{}", kind, index));
        let bucket = self
            .attempt
            .solutions_by_kind()
            .get(&kind)
            .ok_or_else(missing)?;
        index
            .checked_sub(1)
            .and_then(|i| bucket.get(i))
            .map(|s| PartialSolution::clone(Arc::as_ref(s)))
            .ok_or_else(missing)
    }

    fn random_scramble(&self) -> Result<String, SessionError> {
        let wrapper: Algorithm = SCRAMBLE_WRAPPER.parse()?;
        let generated: Algorithm = self.attempt.library().scramble()?.parse()?;
        Ok(wrapper.merge(&generated).merge(&wrapper).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cube::Cube;
    use crate::phase::rules::{SolveError, StepLibrary};

    struct Unconstrained;

    impl StepLibrary for Unconstrained {
        fn is_solved(&self, _step: Step, _cube: &Cube) -> bool {
            false
        }

        fn is_eligible(&self, _step: Step, _cube: &Cube) -> bool {
            true
        }

        fn are_moves_allowed(&self, _step: Step, _alg: &Algorithm) -> bool {
            true
        }

        fn case_name(&self, _step: Step, _cube: &Cube) -> String {
            String::new()
        }

        fn solve(&self, _step: Step, _cube: &Cube, _count: usize) -> Result<Vec<Algorithm>, SolveError> {
            Ok(Vec::new())
        }

        fn scramble(&self) -> Result<String, SolveError> {
            Ok("U R2 F".to_string())
        }
    }

    fn session() -> Session {
        let mut session = Session::new(Attempt::new(std::sync::Arc::new(Unconstrained)));
        session.execute("scramble(\"R U F\")").unwrap();
        session
    }

    #[test]
    fn failed_commands_are_not_recorded() {
        let mut s = session();
        assert!(s.execute("check(\"eo\", 1)").is_err());
        assert!(s.execute("bogus").is_err());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn random_scramble_is_wrapped_and_recorded() {
        let mut s = session();
        s.execute("scramble").unwrap();
        assert_eq!(s.attempt().scramble(), "R' U' F U R2 F R' U' F");
        assert_eq!(
            s.history().last(),
            Some(&Command::Scramble(Some("R' U' F U R2 F R' U' F".to_string())))
        );
    }

    #[test]
    fn undo_walks_back_through_moves_and_niss() {
        let mut s = session();
        s.execute("eofb").unwrap();
        s.execute("R").unwrap();
        s.execute("niss").unwrap();
        s.execute("D").unwrap();

        assert!(s.undo().unwrap());
        assert_eq!(s.attempt().solution().alg().to_string(), "R");
        assert!(s.undo().unwrap());
        assert!(!s.attempt().is_inverse());
        assert!(s.undo().unwrap());
        assert!(s.attempt().solution().alg().is_empty());
        assert!(!s.undo().unwrap());
    }

    #[test]
    fn fr_needs_a_dr_axis() {
        let mut s = session();
        assert!(matches!(s.execute("fr"), Err(SessionError::Rejected(_))));
        s.execute("fr(\"ud\")").unwrap();
        assert_eq!(s.attempt().solution().step().to_string(), "frud");
    }

    #[test]
    fn comment_targets_last_node_with_moves() {
        let mut s = session();
        s.execute("eofb").unwrap();
        s.execute("R").unwrap();
        s.execute("drud").unwrap();
        s.execute("comment(\"nice\")").unwrap();
        let previous = s.attempt().solution().previous().unwrap().clone();
        assert_eq!(s.attempt().get_comment(&previous), Some("nice"));
    }
}
