//! Line-level edit scripts via longest common subsequence.
//!
//! The length table is the standard O(m·n) dynamic program, kept in a flat
//! row-major buffer. Above the configured line ceiling the table is skipped
//! entirely and the file is treated as a full replacement — correctness over
//! diff minimality for pathological inputs.

use crate::model::DiffLine;

/// Compute the edit script turning `old` into `new`, in increasing
/// original-position order.
pub(crate) fn edit_script(old: &[String], new: &[String], max_lines: usize) -> Vec<DiffLine> {
    if old.len() > max_lines || new.len() > max_lines {
        return full_replacement(old, new);
    }

    let m = old.len();
    let n = new.len();
    let width = n + 1;
    // lengths[i * width + j] = LCS length of old[..i] and new[..j].
    let mut lengths = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            lengths[i * width + j] = if old[i - 1] == new[j - 1] {
                lengths[(i - 1) * width + (j - 1)] + 1
            } else {
                lengths[(i - 1) * width + j].max(lengths[i * width + (j - 1)])
            };
        }
    }

    // Backtrack from (m, n): consume a matching pair as context whenever both
    // indices allow it, otherwise descend toward the larger neighbor, ties
    // broken toward the new side. Ops come out reversed.
    let mut ops = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1] == new[j - 1] {
            ops.push(DiffLine::Context(old[i - 1].clone()));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lengths[i * width + (j - 1)] >= lengths[(i - 1) * width + j])
        {
            ops.push(DiffLine::Insert(new[j - 1].clone()));
            j -= 1;
        } else {
            ops.push(DiffLine::Delete(old[i - 1].clone()));
            i -= 1;
        }
    }
    ops.reverse();
    ops
}

fn full_replacement(old: &[String], new: &[String]) -> Vec<DiffLine> {
    let mut ops = Vec::with_capacity(old.len() + new.len());
    ops.extend(old.iter().cloned().map(DiffLine::Delete));
    ops.extend(new.iter().cloned().map(DiffLine::Insert));
    ops
}
