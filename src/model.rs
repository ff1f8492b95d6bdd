//! Data model shared by the generator and the patch engine.
//!
//! [`PatchDocument`] is the only durable entity, and it has no identity beyond
//! the text it renders to; everything else is recomputed per run. Line roles
//! are a closed tagged union, matched exhaustively everywhere.

/// Sentinel path marking the absent side of a pure creation or pure deletion.
pub const DEV_NULL: &str = "/dev/null";

/// A single line within a hunk, tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in both the old and the new file.
    Context(String),
    /// Present only in the old file.
    Delete(String),
    /// Present only in the new file.
    Insert(String),
}

impl DiffLine {
    /// Whether this line occupies a position in the old file.
    pub fn in_old(&self) -> bool {
        !matches!(self, DiffLine::Insert(_))
    }

    /// Whether this line occupies a position in the new file.
    pub fn in_new(&self) -> bool {
        !matches!(self, DiffLine::Delete(_))
    }

    /// The line text without its role prefix.
    pub fn text(&self) -> &str {
        match self {
            DiffLine::Context(text) | DiffLine::Delete(text) | DiffLine::Insert(text) => text,
        }
    }
}

/// A contiguous, context-bounded block of changes within one file.
///
/// Line numbers are 1-based per the unified-diff convention; `old_start` and
/// `new_start` denote the first covered line counting context. Within a hunk,
/// the lines occupying old positions sum to `old_count` and the lines
/// occupying new positions sum to `new_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    fn render(&self, out: &mut String) {
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            self.old_start, self.old_count, self.new_start, self.new_count
        ));
        for line in &self.lines {
            let prefix = match line {
                DiffLine::Context(_) => ' ',
                DiffLine::Delete(_) => '-',
                DiffLine::Insert(_) => '+',
            };
            out.push(prefix);
            out.push_str(line.text());
            out.push('\n');
        }
    }
}

/// All hunks for one file, in increasing `old_start` order, together with the
/// file's old and new paths.
///
/// Either path may be [`DEV_NULL`], signaling pure creation or pure deletion.
/// Paths are relative, forward-slash normalized, and never absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Whether this diff creates a file that did not exist before.
    pub fn is_creation(&self) -> bool {
        self.old_path == DEV_NULL
    }

    /// Whether this diff deletes an existing file.
    pub fn is_deletion(&self) -> bool {
        self.new_path == DEV_NULL
    }

    /// The on-disk relative path this diff addresses.
    pub fn path(&self) -> &str {
        if self.is_creation() {
            &self.new_path
        } else {
            &self.old_path
        }
    }

    fn render(&self, out: &mut String) {
        out.push_str(&format!("diff --git a/{0} b/{0}\n", self.path()));
        if self.is_creation() {
            out.push_str("--- /dev/null\n");
        } else {
            out.push_str(&format!("--- a/{}\n", self.old_path));
        }
        if self.is_deletion() {
            out.push_str("+++ /dev/null\n");
        } else {
            out.push_str(&format!("+++ b/{}\n", self.new_path));
        }
        for hunk in &self.hunks {
            hunk.render(out);
        }
    }
}

/// An ordered collection of per-file diffs, in order of appearance in the
/// source text. Order matters only for output determinism; each file diff is
/// applied independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchDocument {
    pub files: Vec<FileDiff>,
}

impl PatchDocument {
    /// Whether the document contains no file sections at all.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Serialize the document as unified-diff text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            file.render(&mut out);
        }
        out
    }

    /// Count insertions, deletions, and touched files for caller-facing
    /// summaries.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats {
            files_changed: self.files.len(),
            ..DiffStats::default()
        };
        for file in &self.files {
            for hunk in &file.hunks {
                for line in &hunk.lines {
                    match line {
                        DiffLine::Insert(_) => stats.additions += 1,
                        DiffLine::Delete(_) => stats.deletions += 1,
                        DiffLine::Context(_) => {}
                    }
                }
            }
        }
        stats
    }
}

/// Insertion/deletion counters for display purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
}

/// Split content into its logical line sequence.
///
/// The single trailing empty element produced by a final newline is dropped
/// so that line counts match standard `diff`; [`join_lines`] restores it.
pub(crate) fn split_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.split('\n').map(String::from).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Serialize a logical line sequence back to file content with a single
/// trailing newline. Zero lines serialize to empty content.
pub(crate) fn join_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
