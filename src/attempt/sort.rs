//! Ordering of saved solutions.

use crate::config::{Preferences, SortOrder};
use crate::core::solution::{PartialSolution, SolutionKey};
use crate::core::step::Step;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Rank {
    /// Cumulative length, then own inverse moves, own normal moves, text.
    MoveCount(usize, bool, bool, String),
    SaveTime(Option<DateTime<Utc>>),
}

fn rank(
    sol: &PartialSolution,
    order: SortOrder,
    saved_at: &HashMap<SolutionKey, DateTime<Utc>>,
) -> Rank {
    match order {
        SortOrder::MoveCount => Rank::MoveCount(
            sol.full_alg().len(),
            !sol.alg().inverse_moves().is_empty(),
            !sol.alg().normal_moves().is_empty(),
            sol.alg().to_string(),
        ),
        SortOrder::SaveTime => Rank::SaveTime(saved_at.get(&sol.key()).copied()),
    }
}

/// Sort one phase's saved solutions in place. The sort is stable, so
/// solutions that rank equal keep their relative order.
pub fn sort_solutions(
    solutions: &mut [Arc<PartialSolution>],
    prefs: &Preferences,
    saved_at: &HashMap<SolutionKey, DateTime<Utc>>,
) {
    solutions.sort_by_cached_key(|sol| {
        let group: Option<Step> = prefs.group_by_axis.then(|| sol.step());
        (group, rank(sol, prefs.sort_order, saved_at))
    });
}
