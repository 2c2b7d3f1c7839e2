//! Property-based tests for the core types and the attempt controller.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

mod common;

use common::{attempt, FakeLibrary};
use fmc_attempt::core::{
    Algorithm, Cube, Face, Move, Orientation, PartialSolution, Rotation, Step, StepKind, Turn,
};
use fmc_attempt::insertions::{parse_wide_alg, Insertions, Markers, WideMove};
use proptest::prelude::*;
use std::sync::Arc;

prop_compose! {
    fn arbitrary_move()(face in 0..6usize, ticks in 1..4u8) -> Move {
        Move::new(Face::ALL[face], Turn::from_ticks(ticks).unwrap())
    }
}

prop_compose! {
    fn arbitrary_alg()(
        normal in prop::collection::vec(arbitrary_move(), 0..8),
        inverse in prop::collection::vec(arbitrary_move(), 0..4),
    ) -> Algorithm {
        Algorithm::from_moves(normal, inverse)
    }
}

prop_compose! {
    fn normal_alg()(moves in prop::collection::vec(arbitrary_move(), 0..10)) -> Algorithm {
        Algorithm::from_moves(moves, Vec::new())
    }
}

fn arbitrary_orientation() -> impl Strategy<Value = Orientation> {
    (0..6usize, 0..6usize)
        .prop_filter_map("top and front on one axis", |(top, front)| {
            Orientation::new(Face::ALL[top], Face::ALL[front])
        })
}

fn arbitrary_rotation() -> impl Strategy<Value = Rotation> {
    prop_oneof![Just(Rotation::X), Just(Rotation::Y), Just(Rotation::Z)]
}

fn cube_after(moves: &[Move]) -> Cube {
    let mut cube = Cube::solved();
    cube.apply(&Algorithm::from_moves(moves.to_vec(), Vec::new()));
    cube
}

/// A move as typed for insertions: any face, maybe wide, any turn.
fn typed_move() -> impl Strategy<Value = String> {
    (0..6usize, any::<bool>(), 0..3usize).prop_map(|(face, wide, turn)| {
        let w = if wide { "w" } else { "" };
        format!("{}{}{}", Face::ALL[face], w, ["", "2", "'"][turn])
    })
}

prop_compose! {
    // Typed text and a cursor on a move boundary.
    fn typed_text()(
        moves in prop::collection::vec(typed_move(), 0..8),
        cut in 0..9usize,
    ) -> (String, usize) {
        let cut = cut.min(moves.len());
        (moves.join(" "), moves[..cut].join(" ").len())
    }
}

fn normalized(text: &str) -> Vec<Move> {
    parse_wide_alg(text).unwrap().normalized_moves
}

/// Typed moves with every marker swapped for the moves it stands for.
fn substitute(markers: &Markers) -> String {
    let mut moves: Vec<WideMove> = Vec::new();
    let mut replaced = false;
    for token in markers.text.split_whitespace() {
        if let Some(symbol) = markers.symbols.get(token) {
            moves.extend(symbol.iter().copied());
            replaced = token.starts_with(['[', '{', '<']);
        } else if token.starts_with([']', '}', '>']) {
            replaced = false;
        } else if !replaced {
            moves.push(WideMove::from(token.parse::<Move>().unwrap()));
        }
    }
    moves.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
}

proptest! {
    #[test]
    fn rotations_cycle_back(
        orientation in arbitrary_orientation(),
        rotation in arbitrary_rotation(),
        ticks in 0..4u8,
    ) {
        let turned = orientation.rotate(rotation, ticks);
        let back = turned.rotate(rotation, (4 - ticks) % 4);
        prop_assert_eq!(back, orientation);
        prop_assert_eq!(orientation.rotate(rotation, 4), orientation);
    }

    #[test]
    fn rotations_keep_faces_perpendicular(
        orientation in arbitrary_orientation(),
        rotation in arbitrary_rotation(),
        ticks in 0..4u8,
    ) {
        let turned = orientation.rotate(rotation, ticks);
        prop_assert_ne!(turned.top(), turned.front());
        prop_assert_ne!(turned.top(), turned.front().opposite());
        prop_assert_ne!(turned.right(), turned.top());
        prop_assert_ne!(turned.right(), turned.front());
    }

    #[test]
    fn full_alg_merges_previous(algs in prop::collection::vec(arbitrary_alg(), 1..5)) {
        let steps = ["eofb", "drud", "htrud", "frud", "finish"];
        let mut node = Arc::new(PartialSolution::root());
        for (alg, step) in algs.into_iter().zip(steps) {
            let step: Step = step.parse().unwrap();
            let next = PartialSolution::with_alg(step, alg, Some(node.clone()));
            prop_assert_eq!(next.full_alg(), node.full_alg().merge(next.alg()));
            node = Arc::new(next);
        }
    }

    #[test]
    fn merge_with_inverse_cancels(alg in arbitrary_alg()) {
        prop_assert!(alg.merge(&alg.inverted()).is_empty());
    }

    #[test]
    fn merge_agrees_with_cube(first in normal_alg(), second in normal_alg()) {
        let mut stepwise = Cube::solved();
        stepwise.apply(&first);
        stepwise.apply(&second);

        let mut merged = Cube::solved();
        merged.apply(&first.merge(&second));
        prop_assert_eq!(merged, stepwise);
    }

    #[test]
    fn markers_substitute_back_to_typed_moves(
        original in normal_alg(),
        (text, cursor) in typed_text(),
    ) {
        let mut edit = Insertions::new(original);
        edit.set_replacement(&text, cursor).unwrap();

        let substituted = substitute(&edit.markers());
        let (before, _) = text.split_at(cursor);
        prop_assert_eq!(
            cube_after(&normalized(&substituted)),
            cube_after(&normalized(before))
        );
    }

    #[test]
    fn net_alg_turns_original_into_replacement(
        original in normal_alg(),
        (text, cursor) in typed_text(),
    ) {
        let mut edit = Insertions::new(original.clone());
        edit.set_replacement(&text, cursor).unwrap();

        let rebuilt = original.merge(&edit.net_alg());
        let replacement = edit.replacement();
        prop_assert_eq!(
            cube_after(rebuilt.normal_moves()),
            cube_after(replacement.normal_moves())
        );
        prop_assert_eq!(
            cube_after(rebuilt.inverse_moves()),
            cube_after(replacement.inverse_moves())
        );
    }

    #[test]
    fn append_respects_previous_step(forbidden in 0..6usize, alg in normal_alg()) {
        let lib = FakeLibrary::new();
        let face = Face::ALL[forbidden];
        lib.forbid("eofb", &[face]);
        let mut a = attempt(&lib, "R U F");
        a.advance_to("eofb".parse().unwrap());
        a.append(&"R2".parse().unwrap());
        a.advance_to("drud".parse().unwrap());

        let allowed = alg.normal_moves().iter().all(|m| m.face != face);
        let before = a.solution().alg().clone();
        prop_assert_eq!(a.append(&alg), allowed);
        if !allowed {
            prop_assert_eq!(a.solution().alg(), &before);
        }
    }

    #[test]
    fn niss_toggle_is_symmetric(scramble in normal_alg(), moves in normal_alg()) {
        let lib = FakeLibrary::new();
        let mut a = attempt(&lib, &scramble.to_string());
        a.advance_to("eoud".parse().unwrap());
        a.append(&moves);
        let before = a.cube().clone();
        a.set_inverse(true);
        a.set_inverse(false);
        prop_assert_eq!(a.cube(), &before);
    }

    #[test]
    fn saving_twice_keeps_one(alg in normal_alg()) {
        let lib = FakeLibrary::new();
        let mut a = attempt(&lib, "R U F");
        let root = Arc::new(PartialSolution::root());
        let node = PartialSolution::with_alg("eorl".parse().unwrap(), alg, Some(root));
        a.save_solutions(vec![node.clone()]);
        a.save_solutions(vec![node]);
        prop_assert_eq!(a.solutions_by_kind()[&StepKind::Eo].len(), 1);
    }
}
