//! Unified-diff parsing and application.
//!
//! The three public modes share one execution core parameterized over
//! direction and dry-run: `apply` replays forward and mutates, `revert`
//! replays in reverse and mutates, and the two predicates run the same
//! validation without touching the tree.

mod apply;
mod parser;

use std::path::Path;

use crate::error::{PatchError, Result};

pub use parser::parse;

/// Apply `patch_text` to the tree rooted at `target_dir`.
///
/// Files already rewritten before a failure stay rewritten; the caller is
/// expected to report the error and inspect the tree (for example by
/// regenerating a diff) rather than rely on rollback.
pub fn apply(target_dir: &Path, patch_text: &str) -> Result<()> {
    run(target_dir, patch_text, false, false)
}

/// Undo a previously applied `patch_text` on the tree rooted at `target_dir`.
pub fn revert(target_dir: &Path, patch_text: &str) -> Result<()> {
    run(target_dir, patch_text, true, false)
}

/// Whether `patch_text` would apply cleanly in the forward direction.
/// Nothing is mutated.
pub fn is_applicable(target_dir: &Path, patch_text: &str) -> bool {
    run(target_dir, patch_text, false, true).is_ok()
}

/// Whether `patch_text` is already applied, i.e. whether it could be cleanly
/// reversed. Nothing is mutated.
pub fn is_applied(target_dir: &Path, patch_text: &str) -> bool {
    run(target_dir, patch_text, true, true).is_ok()
}

fn run(target_dir: &Path, patch_text: &str, reverse: bool, dry_run: bool) -> Result<()> {
    let document = parse(patch_text);
    if document.is_empty() {
        return Err(PatchError::NoHunksFound);
    }
    apply::apply_document(target_dir, &document, reverse, dry_run)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_empty_patch_text_reports_no_hunks() {
        let dir = tempdir().unwrap();
        let err = apply(dir.path(), "nothing resembling a diff").unwrap_err();
        assert!(matches!(err, PatchError::NoHunksFound));
        assert!(!is_applicable(dir.path(), ""));
        assert!(!is_applied(dir.path(), ""));
    }

    #[test]
    fn test_mode_predicates_flip_after_apply() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f.txt"), "one\ntwo\n").unwrap();
        let patch = "\
--- a/f.txt
+++ b/f.txt
@@ -1,2 +1,2 @@
 one
-two
+deux
";
        assert!(is_applicable(dir.path(), patch));
        assert!(!is_applied(dir.path(), patch));

        apply(dir.path(), patch).unwrap();
        assert!(!is_applicable(dir.path(), patch));
        assert!(is_applied(dir.path(), patch));

        revert(dir.path(), patch).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("f.txt")).unwrap(),
            "one\ntwo\n"
        );
        assert!(is_applicable(dir.path(), patch));
    }
}
