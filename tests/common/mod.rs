//! Deterministic step library shared by the integration tests.

#![allow(dead_code)]

use fmc_attempt::core::{Algorithm, Cube, Face, Step};
use fmc_attempt::phase::{SolveError, StepLibrary};
use fmc_attempt::Attempt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Rules {
    solved: HashSet<Step>,
    solved_when_cube_is: bool,
    ineligible: HashSet<Step>,
    forbidden: HashMap<Step, Vec<Face>>,
    solutions: HashMap<Step, Vec<String>>,
    requested: Vec<usize>,
}

/// A step library whose answers are set by the test.
///
/// A step is solved if it was marked solved, or if the whole cube is solved
/// and `solved_when_cube_is` was turned on. Moves are allowed after a step
/// unless they turn one of the faces forbidden for it.
#[derive(Default)]
pub struct FakeLibrary {
    rules: Mutex<Rules>,
}

impl FakeLibrary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn mark_solved(&self, step: &str) {
        self.rules.lock().unwrap().solved.insert(parse_step(step));
    }

    pub fn unmark_solved(&self, step: &str) {
        self.rules.lock().unwrap().solved.remove(&parse_step(step));
    }

    pub fn solved_when_cube_is(&self) {
        self.rules.lock().unwrap().solved_when_cube_is = true;
    }

    pub fn make_ineligible(&self, step: &str) {
        self.rules.lock().unwrap().ineligible.insert(parse_step(step));
    }

    pub fn forbid(&self, step: &str, faces: &[Face]) {
        self.rules
            .lock()
            .unwrap()
            .forbidden
            .insert(parse_step(step), faces.to_vec());
    }

    pub fn set_solutions(&self, step: &str, algs: &[&str]) {
        self.rules
            .lock()
            .unwrap()
            .solutions
            .insert(parse_step(step), algs.iter().map(|a| a.to_string()).collect());
    }

    /// Counts passed to `solve`, in call order.
    pub fn requested(&self) -> Vec<usize> {
        self.rules.lock().unwrap().requested.clone()
    }
}

impl StepLibrary for FakeLibrary {
    fn is_solved(&self, step: Step, cube: &Cube) -> bool {
        let rules = self.rules.lock().unwrap();
        rules.solved.contains(&step) || (rules.solved_when_cube_is && cube.is_solved())
    }

    fn is_eligible(&self, step: Step, _cube: &Cube) -> bool {
        !self.rules.lock().unwrap().ineligible.contains(&step)
    }

    fn are_moves_allowed(&self, step: Step, alg: &Algorithm) -> bool {
        let rules = self.rules.lock().unwrap();
        let Some(faces) = rules.forbidden.get(&step) else {
            return true;
        };
        alg.normal_moves()
            .iter()
            .chain(alg.inverse_moves())
            .all(|m| !faces.contains(&m.face))
    }

    fn case_name(&self, _step: Step, _cube: &Cube) -> String {
        "4c4e".to_string()
    }

    fn solve(&self, step: Step, _cube: &Cube, count: usize) -> Result<Vec<Algorithm>, SolveError> {
        let mut rules = self.rules.lock().unwrap();
        rules.requested.push(count);
        let canned = rules.solutions.get(&step).cloned().unwrap_or_default();
        canned
            .iter()
            .take(count)
            .map(|a| a.parse().map_err(|e| SolveError::Failed(format!("{}", e))))
            .collect()
    }

    fn scramble(&self) -> Result<String, SolveError> {
        Ok("D2 B L'".to_string())
    }
}

pub fn parse_step(step: &str) -> Step {
    step.parse().unwrap()
}

pub fn alg(moves: &str) -> Algorithm {
    moves.parse().unwrap()
}

pub fn attempt(library: &Arc<FakeLibrary>, scramble: &str) -> Attempt {
    let mut attempt = Attempt::new(library.clone());
    attempt.set_scramble(scramble).unwrap();
    attempt
}
