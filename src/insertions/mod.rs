//! Insertion editing of a finished solution.
//!
//! Once a solution is finished the user may retype it as a whole, using
//! wide moves where convenient. [`Insertions`] keeps the original algorithm
//! fixed and works out what the retyped text added to it: moves inserted,
//! moves replaced, and the net algorithm that turns one into the other.

pub mod diff;
pub mod markers;
pub mod wide;

pub use markers::{add_markers, Markers};
pub use wide::{parse_wide_alg, WideAlgorithm, WideMove};

use crate::core::algorithm::Algorithm;
use crate::core::moves::Move;
use diff::Tag;
use thiserror::Error;

/// Why replacement text was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InsertionError {
    #[error("Invalid move notation '{0}'")]
    InvalidNotation(String),

    #[error("Parentheses are not allowed in replacement text")]
    Parenthesis,

    #[error("Cursor {cursor} is outside the replacement text (length {len})")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("The current step is not an insertions step")]
    NotActive,
}

/// A single difference between the original and the retyped algorithm,
/// positioned by index into the original's linear move list.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Edit {
    /// `moves` inserted before original move `pos`. Removed moves appear
    /// here as the insertion of their inverse.
    Insertion { pos: usize, moves: Vec<WideMove> },
    /// Original moves `start..end` replaced by `moves`.
    Replacement {
        start: usize,
        end: usize,
        moves: Vec<WideMove>,
    },
}

/// Edit session turning `original` into a retyped replacement.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::core::Algorithm;
/// use fmc_attempt::insertions::{Edit, Insertions};
///
/// let original: Algorithm = "R U F".parse().unwrap();
/// let mut session = Insertions::new(original);
/// session.set_replacement("R F", 3).unwrap();
///
/// let edits = session.get_edits();
/// assert_eq!(edits.len(), 1);
/// assert!(matches!(&edits[0], Edit::Insertion { pos: 1, .. }));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Insertions {
    original: Algorithm,
    replacement: Algorithm,
    wide_alg_moves: Vec<WideMove>,
    typed: Option<(String, usize)>,
}

impl Insertions {
    pub fn new(original: Algorithm) -> Self {
        let wide_alg_moves = linear_moves(&original)
            .into_iter()
            .map(WideMove::from)
            .collect();
        Self {
            replacement: original.clone(),
            original,
            wide_alg_moves,
            typed: None,
        }
    }

    pub fn original(&self) -> &Algorithm {
        &self.original
    }

    pub fn replacement(&self) -> &Algorithm {
        &self.replacement
    }

    pub fn wide_alg_moves(&self) -> &[WideMove] {
        &self.wide_alg_moves
    }

    /// Text and cursor of the last accepted replacement, if any.
    pub fn typed(&self) -> Option<(&str, usize)> {
        self.typed.as_ref().map(|(text, cursor)| (text.as_str(), *cursor))
    }

    /// Replace the edited algorithm with `text`. Moves before byte offset
    /// `cursor` are taken on the normal scramble, moves after it on the
    /// inverse. On error the previous replacement is kept.
    pub fn set_replacement(&mut self, text: &str, cursor: usize) -> Result<(), InsertionError> {
        if text.contains('(') || text.contains(')') {
            return Err(InsertionError::Parenthesis);
        }
        if cursor > text.len() || !text.is_char_boundary(cursor) {
            return Err(InsertionError::CursorOutOfRange {
                cursor,
                len: text.len(),
            });
        }
        let (before, after) = text.split_at(cursor);
        let before = parse_wide_alg(before)?;
        let after = parse_wide_alg(after)?;

        let after = Algorithm::from_moves(after.normalized_moves, Vec::new()).inverted();
        self.replacement = Algorithm::from_moves(
            before.normalized_moves,
            after.normal_moves().to_vec(),
        );
        self.wide_alg_moves = before.wide_moves;
        self.typed = Some((text.to_string(), cursor));
        Ok(())
    }

    /// Moves that take the original to the replacement.
    pub fn net_alg(&self) -> Algorithm {
        self.original.inverted().merge(&self.replacement)
    }

    pub fn get_edits(&self) -> Vec<Edit> {
        let old: Vec<WideMove> = linear_moves(&self.original)
            .into_iter()
            .map(WideMove::from)
            .collect();
        let new = &self.wide_alg_moves;

        diff::opcodes(&old, new)
            .into_iter()
            .filter_map(|code| match code.tag {
                Tag::Equal => None,
                Tag::Replace => Some(Edit::Replacement {
                    start: code.old.start,
                    end: code.old.end,
                    moves: new[code.new].to_vec(),
                }),
                Tag::Delete => {
                    let removed = Algorithm::from_moves(
                        linear_moves(&self.original)[code.old.clone()].to_vec(),
                        Vec::new(),
                    );
                    Some(Edit::Insertion {
                        pos: code.old.start,
                        moves: removed
                            .inverted()
                            .normal_moves()
                            .iter()
                            .copied()
                            .map(WideMove::from)
                            .collect(),
                    })
                }
                Tag::Insert => Some(Edit::Insertion {
                    pos: code.old.start,
                    moves: new[code.new].to_vec(),
                }),
            })
            .collect()
    }

    pub fn markers(&self) -> Markers {
        add_markers(&linear_moves(&self.original), &self.get_edits())
    }
}

fn linear_moves(alg: &Algorithm) -> Vec<Move> {
    alg.all_on_normal().normal_moves().to_vec()
}
