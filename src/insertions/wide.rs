//! Wide-move notation.
//!
//! A wide move such as `Rw` turns two layers, which is the opposite outer
//! layer followed by a whole-cube rotation. Parsing rewrites every later
//! move through the accumulated rotations so the result is expressed in
//! outer-layer moves only.

use super::InsertionError;
use crate::core::moves::{Face, Move, Turn};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A move as typed, possibly wide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WideMove {
    pub face: Face,
    pub wide: bool,
    pub turn: Turn,
}

impl From<Move> for WideMove {
    fn from(mv: Move) -> Self {
        Self {
            face: mv.face,
            wide: false,
            turn: mv.turn,
        }
    }
}

impl fmt::Display for WideMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = if self.wide { "w" } else { "" };
        write!(f, "{}{}{}", self.face, w, self.turn.suffix())
    }
}

/// Parsed wide-notation text.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct WideAlgorithm {
    /// Moves as typed.
    pub wide_moves: Vec<WideMove>,
    /// The same moves rewritten as outer-layer turns.
    pub normalized_moves: Vec<Move>,
}

fn whole_text() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([rufldb]w?[2']?\s*)*$").expect("valid regex"))
}

fn single_move() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([rufldb])(w?)([2']?)").expect("valid regex"))
}

/// Parse text such as `R Uw2 f'`. Case is ignored. The whole text must be
/// valid notation; nothing is returned for partially valid input.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::insertions::parse_wide_alg;
///
/// let alg = parse_wide_alg("Rw U").unwrap();
/// let normal: Vec<String> = alg.normalized_moves.iter().map(|m| m.to_string()).collect();
/// assert_eq!(normal, vec!["L", "F"]);
/// ```
pub fn parse_wide_alg(text: &str) -> Result<WideAlgorithm, InsertionError> {
    let lower = text.to_lowercase();
    if !whole_text().is_match(&lower) {
        return Err(InsertionError::InvalidNotation(text.to_string()));
    }

    let mut rotations: Vec<(Face, u8)> = Vec::new();
    let mut parsed = WideAlgorithm::default();
    for caps in single_move().captures_iter(&lower) {
        let invalid = || InsertionError::InvalidNotation(text.to_string());
        let letter = caps[1].chars().next().ok_or_else(invalid)?;
        let typed = Face::from_char(letter).ok_or_else(invalid)?;
        let wide = &caps[2] == "w";
        let turn = Turn::from_suffix(&caps[3]).ok_or_else(invalid)?;
        parsed.wide_moves.push(WideMove {
            face: typed,
            wide,
            turn,
        });

        let mut face = rotations
            .iter()
            .fold(typed, |f, &(axis, ticks)| axis.rotate(f, ticks));
        if wide {
            rotations.push((face, turn.ticks()));
            face = face.opposite();
        }
        parsed.normalized_moves.push(Move::new(face, turn));
    }
    Ok(parsed)
}
