//! Generator tunables. Nothing in the engine is process-wide state: every
//! entry point takes an explicit configuration so callers and tests can vary
//! each knob independently.

/// Knobs for the diff generator.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Unchanged lines emitted around each change region of a hunk. Change
    /// runs separated by at most twice this many unchanged lines are merged
    /// into one hunk.
    pub context_lines: usize,

    /// Line-count ceiling above which the LCS table is skipped and a modified
    /// file is diffed as a full replacement (every old line deleted, every
    /// new line inserted).
    pub max_lcs_lines: usize,

    /// Number of leading bytes inspected for a null byte when classifying a
    /// file as binary. Binary files never appear in generated output.
    pub binary_sniff_len: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            context_lines: 3,
            max_lcs_lines: 5000,
            binary_sniff_len: 8 * 1024,
        }
    }
}
