//! Grouping edit scripts into context-bounded hunks.

use crate::model::{DiffLine, Hunk};

/// Group an edit script into hunks.
///
/// Change runs separated by no more than `2 × context_lines` unchanged ops
/// merge into one hunk; each hunk's window extends `context_lines` before the
/// first change and after the last, clipped to the sequence bounds.
pub(crate) fn group_hunks(ops: &[DiffLine], context_lines: usize) -> Vec<Hunk> {
    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, DiffLine::Context(_)))
        .map(|(index, _)| index)
        .collect();
    if changes.is_empty() {
        return Vec::new();
    }

    let mut hunks = Vec::new();
    let mut run_start = changes[0];
    let mut run_end = changes[0];
    for &index in &changes[1..] {
        if index - run_end - 1 <= 2 * context_lines {
            run_end = index;
        } else {
            hunks.push(build_hunk(ops, run_start, run_end, context_lines));
            run_start = index;
            run_end = index;
        }
    }
    hunks.push(build_hunk(ops, run_start, run_end, context_lines));
    hunks
}

fn build_hunk(
    ops: &[DiffLine],
    first_change: usize,
    last_change: usize,
    context_lines: usize,
) -> Hunk {
    let window_start = first_change.saturating_sub(context_lines);
    let window_end = (last_change + context_lines).min(ops.len() - 1);

    // Header positions count, among the ops preceding the window, those that
    // advance each side, then add 1 for the 1-based convention.
    let old_preceding = ops[..window_start].iter().filter(|op| op.in_old()).count();
    let new_preceding = ops[..window_start].iter().filter(|op| op.in_new()).count();

    let window = &ops[window_start..=window_end];
    Hunk {
        old_start: old_preceding + 1,
        old_count: window.iter().filter(|op| op.in_old()).count(),
        new_start: new_preceding + 1,
        new_count: window.iter().filter(|op| op.in_new()).count(),
        lines: window.to_vec(),
    }
}
