//! Move sequences split into a normal and an inverse half.
//!
//! An [`Algorithm`] is the unit of work everywhere in the attempt: the moves
//! a phase contributes, the cumulative solution so far, the output of the
//! solver. Moves on the inverse half are written in parentheses and are
//! applied to the inverse scramble (NISS).

use crate::core::moves::{Move, Turn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing move notation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("Invalid move '{0}'")]
    InvalidMove(String),

    #[error("Unbalanced parenthesis in '{0}'")]
    UnbalancedParenthesis(String),

    #[error("Nested parenthesis in '{0}'")]
    NestedParenthesis(String),
}

/// An ordered pair of move lists: moves on the normal scramble and moves on
/// the inverse scramble.
///
/// Two algorithms are equal exactly when their canonical string forms are
/// equal.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::core::Algorithm;
///
/// let alg: Algorithm = "R U (F')".parse().unwrap();
/// assert_eq!(alg.len(), 3);
///
/// let merged = alg.merge(&"U' R".parse().unwrap());
/// assert_eq!(merged.to_string(), "R2 (F')");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Algorithm {
    normal: Vec<Move>,
    inverse: Vec<Move>,
}

impl Algorithm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an algorithm from raw move lists without cancelling anything.
    pub fn from_moves(normal: Vec<Move>, inverse: Vec<Move>) -> Self {
        Self { normal, inverse }
    }

    pub fn normal_moves(&self) -> &[Move] {
        &self.normal
    }

    pub fn inverse_moves(&self) -> &[Move] {
        &self.inverse
    }

    pub fn len(&self) -> usize {
        self.normal.len() + self.inverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.inverse.is_empty()
    }

    /// Append a single move to one half, cancelling against the tail of that
    /// half where possible.
    ///
    /// Cancellation looks past moves on the opposite face, since those
    /// commute with `mv`.
    pub fn push(&mut self, mv: Move, on_inverse: bool) {
        let moves = if on_inverse {
            &mut self.inverse
        } else {
            &mut self.normal
        };
        for i in (0..moves.len()).rev() {
            let last = moves[i];
            if last.face == mv.face {
                let ticks = (last.turn.ticks() + mv.turn.ticks()) % 4;
                match Turn::from_ticks(ticks) {
                    Some(turn) => moves[i] = Move::new(mv.face, turn),
                    None => {
                        moves.remove(i);
                    }
                }
                return;
            }
            if last.face != mv.face.opposite() {
                break;
            }
        }
        moves.push(mv);
    }

    /// Concatenate `other` onto this algorithm, half by half, cancelling
    /// moves at the seams.
    pub fn merge(&self, other: &Algorithm) -> Algorithm {
        let mut merged = self.clone();
        for mv in &other.normal {
            merged.push(*mv, false);
        }
        for mv in &other.inverse {
            merged.push(*mv, true);
        }
        merged
    }

    /// Invert both halves independently (reverse order, invert each move).
    pub fn inverted(&self) -> Algorithm {
        Algorithm {
            normal: invert_moves(&self.normal),
            inverse: invert_moves(&self.inverse),
        }
    }

    /// Reinterpret normal moves as inverse-side moves and vice versa.
    pub fn on_inverse(&self) -> Algorithm {
        Algorithm {
            normal: self.inverse.clone(),
            inverse: self.normal.clone(),
        }
    }

    /// The equivalent linear solution: normal moves followed by the inverse
    /// of the inverse-side moves.
    pub fn all_on_normal(&self) -> Algorithm {
        let mut normal = self.normal.clone();
        normal.extend(invert_moves(&self.inverse));
        Algorithm {
            normal,
            inverse: Vec::new(),
        }
    }

    /// Canonical form with every move replaced by `?`.
    pub fn masked(&self) -> String {
        let mask = |moves: &[Move]| vec!["?"; moves.len()].join(" ");
        render(&mask(&self.normal), &mask(&self.inverse))
    }
}

fn flush_token(
    token: &mut String,
    in_parens: bool,
    alg: &mut Algorithm,
) -> Result<(), AlgorithmError> {
    if token.is_empty() {
        return Ok(());
    }
    let mv: Move = token.parse()?;
    if in_parens {
        alg.inverse.push(mv);
    } else {
        alg.normal.push(mv);
    }
    token.clear();
    Ok(())
}

fn invert_moves(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.inverse()).collect()
}

fn join(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render(normal: &str, inverse: &str) -> String {
    match (normal.is_empty(), inverse.is_empty()) {
        (_, true) => normal.to_string(),
        (true, false) => format!("({})", inverse),
        (false, false) => format!("{} ({})", normal, inverse),
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(&join(&self.normal), &join(&self.inverse)))
    }
}

impl FromStr for Algorithm {
    type Err = AlgorithmError;

    /// Parse notation such as `R U2 (F' B)`. Every parenthesized group is
    /// appended to the inverse half. No moves are cancelled while parsing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut alg = Algorithm::new();
        let mut in_parens = false;
        let mut token = String::new();

        for c in s.chars() {
            match c {
                '(' => {
                    flush_token(&mut token, in_parens, &mut alg)?;
                    if in_parens {
                        return Err(AlgorithmError::NestedParenthesis(s.to_string()));
                    }
                    in_parens = true;
                }
                ')' => {
                    flush_token(&mut token, in_parens, &mut alg)?;
                    if !in_parens {
                        return Err(AlgorithmError::UnbalancedParenthesis(s.to_string()));
                    }
                    in_parens = false;
                }
                c if c.is_whitespace() => flush_token(&mut token, in_parens, &mut alg)?,
                c => token.push(c),
            }
        }
        flush_token(&mut token, in_parens, &mut alg)?;
        if in_parens {
            return Err(AlgorithmError::UnbalancedParenthesis(s.to_string()));
        }
        Ok(alg)
    }
}

impl From<Algorithm> for String {
    fn from(alg: Algorithm) -> Self {
        alg.to_string()
    }
}

impl TryFrom<String> for Algorithm {
    type Error = AlgorithmError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
