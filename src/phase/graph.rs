//! Which step may follow which.

use crate::core::step::{Axis, Step, StepKind};

/// Steps that may directly follow `step`, in menu order.
///
/// # Example
///
/// ```rust
/// use fmc_attempt::core::Step;
/// use fmc_attempt::phase::next_steps;
///
/// let names: Vec<String> = next_steps("eofb".parse().unwrap())
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// assert_eq!(names, vec!["drud", "drrl"]);
/// ```
pub fn next_steps(step: Step) -> Vec<Step> {
    let on = |kind: StepKind, axis: Axis| Step::on_axis(kind, axis);
    let axis = step.axis();
    match step.kind() {
        StepKind::Scrambled => vec![
            on(StepKind::Eo, Axis::Fb),
            on(StepKind::Eo, Axis::Rl),
            on(StepKind::Eo, Axis::Ud),
            Step::FINISH,
        ],
        StepKind::Eo => dr_axes_after_eo(axis)
            .into_iter()
            .map(|a| on(StepKind::Dr, a))
            .collect(),
        StepKind::Dr => vec![on(StepKind::Htr, axis)],
        StepKind::Htr => vec![on(StepKind::Fr, axis), on(StepKind::Slice, axis), Step::FINISH],
        StepKind::Fr => vec![on(StepKind::Slice, axis), Step::FINISH],
        StepKind::Slice => vec![Step::FINISH],
        StepKind::Finish | StepKind::Insertions => vec![Step::INSERTIONS],
    }
}

fn dr_axes_after_eo(eo: Axis) -> Vec<Axis> {
    match eo {
        Axis::Ud => vec![Axis::Fb, Axis::Rl],
        Axis::Rl => vec![Axis::Ud, Axis::Fb],
        Axis::Fb => vec![Axis::Ud, Axis::Rl],
        Axis::Any => Vec::new(),
    }
}

/// Natural successor of a solved step, if one is preferred over the first
/// entry of [`next_steps`].
pub fn default_next(step: Step) -> Option<Step> {
    match step.kind() {
        StepKind::Htr => Some(Step::on_axis(StepKind::Fr, step.axis())),
        StepKind::Fr => Some(Step::FINISH),
        _ => None,
    }
}

/// Successor used when nothing else has been chosen.
pub fn natural_next(step: Step) -> Step {
    default_next(step)
        .or_else(|| next_steps(step).first().copied())
        .unwrap_or(Step::INSERTIONS)
}
