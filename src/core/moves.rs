//! Faces, turns and single outer-layer moves.
//!
//! These are the atoms every algorithm, cube and orientation in the crate is
//! built from. All types are small `Copy` values.

use crate::core::algorithm::AlgorithmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six faces of the cube.
///
/// The declaration order (U, R, F, D, L, B) is also the facelet order used by
/// [`Cube`](crate::core::Cube).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    U,
    R,
    F,
    D,
    L,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    /// Index of the face in U, R, F, D, L, B order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::R => Face::L,
            Face::L => Face::R,
            Face::F => Face::B,
            Face::B => Face::F,
        }
    }

    /// The four faces adjacent to this one.
    ///
    /// After a whole-cube rotation in the direction of a clockwise turn of
    /// this face, position `ring()[i]` holds the face that was at
    /// `ring()[(i + 1) % 4]`.
    pub fn ring(self) -> [Face; 4] {
        match self {
            Face::F => [Face::U, Face::L, Face::D, Face::R],
            Face::B => [Face::U, Face::R, Face::D, Face::L],
            Face::R => [Face::U, Face::F, Face::D, Face::B],
            Face::L => [Face::U, Face::B, Face::D, Face::F],
            Face::U => [Face::F, Face::R, Face::B, Face::L],
            Face::D => [Face::F, Face::L, Face::B, Face::R],
        }
    }

    /// Rotate `face` around this face's axis by `ticks` quarter turns.
    ///
    /// Faces on the rotation axis are returned unchanged.
    pub fn rotate(self, face: Face, ticks: u8) -> Face {
        let ring = self.ring();
        match ring.iter().position(|f| *f == face) {
            Some(i) => ring[(i + ticks as usize) % 4],
            None => face,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::R => 'R',
            Face::F => 'F',
            Face::D => 'D',
            Face::L => 'L',
            Face::B => 'B',
        }
    }

    /// Parse a face letter, ignoring case.
    pub fn from_char(c: char) -> Option<Face> {
        match c.to_ascii_uppercase() {
            'U' => Some(Face::U),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'B' => Some(Face::B),
            _ => None,
        }
    }

    /// Outward normal as an (x, y, z) vector with x right, y up, z front.
    pub(crate) fn normal(self) -> [i8; 3] {
        match self {
            Face::U => [0, 1, 0],
            Face::D => [0, -1, 0],
            Face::R => [1, 0, 0],
            Face::L => [-1, 0, 0],
            Face::F => [0, 0, 1],
            Face::B => [0, 0, -1],
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Amount of a face turn.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Turn {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Turn {
    /// Number of clockwise quarter turns.
    pub fn ticks(self) -> u8 {
        match self {
            Turn::Clockwise => 1,
            Turn::Half => 2,
            Turn::CounterClockwise => 3,
        }
    }

    pub fn from_ticks(ticks: u8) -> Option<Turn> {
        match ticks % 4 {
            1 => Some(Turn::Clockwise),
            2 => Some(Turn::Half),
            3 => Some(Turn::CounterClockwise),
            _ => None,
        }
    }

    pub fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Half => Turn::Half,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Half => "2",
            Turn::CounterClockwise => "'",
        }
    }

    pub(crate) fn from_suffix(suffix: &str) -> Option<Turn> {
        match suffix {
            "" => Some(Turn::Clockwise),
            "2" => Some(Turn::Half),
            "'" => Some(Turn::CounterClockwise),
            _ => None,
        }
    }
}

/// A single outer-layer move such as `R`, `U2` or `F'`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    pub fn inverse(self) -> Move {
        Move {
            face: self.face,
            turn: self.turn.inverse(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = AlgorithmError;

    /// Parse standard notation. Face letters must be upper case; lower case
    /// letters denote wide moves, which are handled by
    /// [`parse_wide_alg`](crate::insertions::parse_wide_alg).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlgorithmError::InvalidMove(s.to_string());
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if !letter.is_ascii_uppercase() {
            return Err(invalid());
        }
        let face = Face::from_char(letter).ok_or_else(invalid)?;
        let turn = Turn::from_suffix(chars.as_str()).ok_or_else(invalid)?;
        Ok(Move { face, turn })
    }
}
