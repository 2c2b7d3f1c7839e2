//! Facelet-level cube state.
//!
//! The cube is stored as a permutation of its 54 stickers: `facelets[p]` is
//! the solved-state index of the sticker currently at position `p`. Centers
//! never move since only outer-layer turns are applied, so the permutation
//! is a faithful group element and inversion is permutation inversion.

use crate::core::algorithm::{Algorithm, AlgorithmError};
use crate::core::moves::{Face, Move};
use std::sync::OnceLock;

const FACELETS: usize = 54;

type Perm = [u8; FACELETS];

/// State of a 3x3x3 cube reached from solved by some algorithm.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::core::{Algorithm, Cube};
///
/// let mut cube = Cube::new("R U R' U'").unwrap();
/// assert!(!cube.is_solved());
///
/// let undo: Algorithm = "U R U' R'".parse().unwrap();
/// cube.apply(&undo);
/// assert!(cube.is_solved());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Cube {
    facelets: Perm,
}

impl Default for Cube {
    fn default() -> Self {
        Self::solved()
    }
}

impl Cube {
    pub fn solved() -> Self {
        let mut facelets = [0u8; FACELETS];
        for (i, f) in facelets.iter_mut().enumerate() {
            *f = i as u8;
        }
        Self { facelets }
    }

    /// Cube state after applying `scramble` to a solved cube.
    pub fn new(scramble: &str) -> Result<Self, AlgorithmError> {
        let alg: Algorithm = scramble.parse()?;
        let mut cube = Self::solved();
        cube.apply(&alg);
        Ok(cube)
    }

    /// Apply the normal moves, then the inverse of the inverse-side moves.
    pub fn apply(&mut self, alg: &Algorithm) {
        for mv in alg.all_on_normal().normal_moves() {
            self.apply_move(*mv);
        }
    }

    pub fn apply_move(&mut self, mv: Move) {
        let dest = &quarter_turns()[mv.face.index()];
        for _ in 0..mv.turn.ticks() {
            let mut next = self.facelets;
            for (p, &d) in dest.iter().enumerate() {
                next[d as usize] = self.facelets[p];
            }
            self.facelets = next;
        }
    }

    /// Replace the state by its group inverse, i.e. the state reached by the
    /// inverse of whatever algorithm produced it.
    pub fn invert(&mut self) {
        let mut inverse = [0u8; FACELETS];
        for (p, &f) in self.facelets.iter().enumerate() {
            inverse[f as usize] = p as u8;
        }
        self.facelets = inverse;
    }

    pub fn is_solved(&self) -> bool {
        self.facelets
            .iter()
            .enumerate()
            .all(|(p, &f)| p / 9 == f as usize / 9)
    }

    /// Sticker colors by position, named after the face they belong to when
    /// solved. Positions are ordered U, R, F, D, L, B, row-major per face.
    pub fn facelets(&self) -> [Face; FACELETS] {
        let mut colors = [Face::U; FACELETS];
        for (color, &f) in colors.iter_mut().zip(self.facelets.iter()) {
            *color = Face::ALL[f as usize / 9];
        }
        colors
    }
}

/// Destination of every facelet under a clockwise quarter turn of each face.
fn quarter_turns() -> &'static [Perm; 6] {
    static TURNS: OnceLock<[Perm; 6]> = OnceLock::new();
    TURNS.get_or_init(|| {
        let stickers: Vec<([i8; 3], [i8; 3])> = (0..FACELETS).map(sticker_geometry).collect();
        let lookup = |pos: [i8; 3], normal: [i8; 3]| {
            stickers
                .iter()
                .position(|s| *s == (pos, normal))
                .map(|i| i as u8)
        };

        let mut turns = [[0u8; FACELETS]; 6];
        for face in Face::ALL {
            let axis = face.normal();
            let perm = &mut turns[face.index()];
            for (i, &(pos, normal)) in stickers.iter().enumerate() {
                perm[i] = if dot(pos, axis) == 1 {
                    lookup(rotate_clockwise(axis, pos), rotate_clockwise(axis, normal))
                        .unwrap_or(i as u8)
                } else {
                    i as u8
                };
            }
        }
        turns
    })
}

/// Cubie position and outward normal of facelet `index`.
fn sticker_geometry(index: usize) -> ([i8; 3], [i8; 3]) {
    let face = Face::ALL[index / 9];
    let row = ((index % 9) / 3) as i8;
    let col = (index % 3) as i8;
    let pos = match face {
        Face::U => [col - 1, 1, row - 1],
        Face::D => [col - 1, -1, 1 - row],
        Face::F => [col - 1, 1 - row, 1],
        Face::B => [1 - col, 1 - row, -1],
        Face::R => [1, 1 - row, 1 - col],
        Face::L => [-1, 1 - row, col - 1],
    };
    (pos, face.normal())
}

fn dot(a: [i8; 3], b: [i8; 3]) -> i8 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [i8; 3], b: [i8; 3]) -> [i8; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Rotate `v` a quarter turn clockwise as seen from the tip of `axis`.
fn rotate_clockwise(axis: [i8; 3], v: [i8; 3]) -> [i8; 3] {
    let along = dot(axis, v);
    let c = cross(axis, v);
    [
        axis[0] * along - c[0],
        axis[1] * along - c[1],
        axis[2] * along - c[2],
    ]
}
