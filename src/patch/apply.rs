//! Hunk replay against a real file tree.
//!
//! One execution core serves every mode: `reverse` swaps which side of the
//! document is the expected pre-image, and `dry_run` performs every check
//! without mutating anything. Every target path goes through the containment
//! guard before any file-system access.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{PatchError, Result};
use crate::model::{DEV_NULL, DiffLine, FileDiff, Hunk, PatchDocument, join_lines, split_lines};
use crate::utils::path::resolve_within;

/// Replay `document` against the tree rooted at `root`.
///
/// A failed file diff aborts only that file; subsequent file diffs still get
/// their attempt, and the first error recorded is the one reported. Files
/// already rewritten stay rewritten — there is no rollback across files.
pub(crate) fn apply_document(
    root: &Path,
    document: &PatchDocument,
    reverse: bool,
    dry_run: bool,
) -> Result<()> {
    let mut first_error = None;
    for file_diff in &document.files {
        match apply_file(root, file_diff, reverse, dry_run) {
            Ok(()) => trace!(path = file_diff.path(), reverse, dry_run, "file diff ok"),
            Err(err) => {
                debug!(path = file_diff.path(), %err, "file diff failed");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn apply_file(root: &Path, file_diff: &FileDiff, reverse: bool, dry_run: bool) -> Result<()> {
    let (before, after) = if reverse {
        (&file_diff.new_path, &file_diff.old_path)
    } else {
        (&file_diff.old_path, &file_diff.new_path)
    };

    if before == DEV_NULL {
        create_file(root, file_diff, reverse, dry_run)
    } else if after == DEV_NULL {
        delete_file(root, file_diff, reverse, dry_run)
    } else {
        modify_file(root, file_diff, reverse, dry_run)
    }
}

/// Creation in the active direction.
///
/// The expected content is the concatenation, across hunks in file order, of
/// the lines the direction inserts: a hunk's delete lines are exactly what a
/// reverse apply must reproduce when it undoes a deletion.
fn create_file(root: &Path, file_diff: &FileDiff, reverse: bool, dry_run: bool) -> Result<()> {
    let abs = resolve_within(root, file_diff.path())?;
    let lines = reconstructed_lines(file_diff, reverse);
    if dry_run {
        return Ok(());
    }
    if let Some(parent) = abs.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(&abs, join_lines(&lines))?;
    Ok(())
}

/// Deletion in the active direction.
///
/// Forward deletion only requires the pre-image file to exist. Undoing a
/// creation additionally requires the on-disk content to equal, line for
/// line, what the patch originally created.
fn delete_file(root: &Path, file_diff: &FileDiff, reverse: bool, dry_run: bool) -> Result<()> {
    let abs = resolve_within(root, file_diff.path())?;
    if !abs.exists() {
        return Err(PatchError::FileNotFound { path: abs });
    }
    if reverse {
        let expected = reconstructed_lines(file_diff, false);
        let current = read_lines(&abs)?;
        if current != expected {
            return Err(PatchError::ContentMismatch { path: abs });
        }
    }
    if dry_run {
        return Ok(());
    }
    fs::remove_file(&abs)?;
    Ok(())
}

fn modify_file(root: &Path, file_diff: &FileDiff, reverse: bool, dry_run: bool) -> Result<()> {
    let rel = if reverse {
        &file_diff.new_path
    } else {
        &file_diff.old_path
    };
    let abs = resolve_within(root, rel)?;
    if !abs.exists() {
        return Err(PatchError::FileNotFound { path: abs });
    }
    if file_diff.hunks.is_empty() {
        return Ok(());
    }

    let mut lines = read_lines(&abs)?;
    let mut offset: isize = 0;
    for (index, hunk) in file_diff.hunks.iter().enumerate() {
        offset = apply_hunk(&mut lines, hunk, reverse, offset).map_err(|reason| {
            PatchError::HunkApplicationFailed {
                path: abs.clone(),
                hunk: index,
                reason,
            }
        })?;
    }

    if dry_run {
        return Ok(());
    }
    fs::write(&abs, join_lines(&lines))?;
    Ok(())
}

/// Splice one hunk into `lines`, returning the updated running offset.
///
/// The offset corrects for length drift introduced by earlier hunks in the
/// same file, so every hunk keeps its pre-image-relative line numbers even
/// though the file's length has already changed underneath it.
fn apply_hunk(
    lines: &mut Vec<String>,
    hunk: &Hunk,
    reverse: bool,
    offset: isize,
) -> std::result::Result<isize, String> {
    let declared_start = if reverse { hunk.new_start } else { hunk.old_start };
    let start = declared_start as isize - 1 + offset;
    if start < 0 {
        return Err(format!("start line {declared_start} out of range"));
    }
    let start = start as usize;

    let mut expected: Vec<&String> = Vec::new();
    let mut replacement: Vec<&String> = Vec::new();
    for line in &hunk.lines {
        match line {
            DiffLine::Context(text) => {
                expected.push(text);
                replacement.push(text);
            }
            DiffLine::Delete(text) => {
                if reverse {
                    replacement.push(text);
                } else {
                    expected.push(text);
                }
            }
            DiffLine::Insert(text) => {
                if reverse {
                    expected.push(text);
                } else {
                    replacement.push(text);
                }
            }
        }
    }

    let end = start + expected.len();
    if end > lines.len() {
        return Err(format!(
            "window of {} lines at line {} runs past end of file ({} lines)",
            expected.len(),
            start + 1,
            lines.len()
        ));
    }
    for (i, want) in expected.iter().enumerate() {
        if lines[start + i] != **want {
            return Err(format!(
                "line {} does not match: expected {:?}, found {:?}",
                start + i + 1,
                want,
                lines[start + i]
            ));
        }
    }

    lines.splice(start..end, replacement.iter().map(|text| (*text).clone()));
    Ok(offset + replacement.len() as isize - expected.len() as isize)
}

/// The file body carried by a single-role file diff: insert lines forward,
/// delete lines in reverse. Forward creation writes these; undoing a creation
/// expects them on disk; undoing a deletion re-creates them.
fn reconstructed_lines(file_diff: &FileDiff, reverse: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for hunk in &file_diff.hunks {
        for line in &hunk.lines {
            match line {
                DiffLine::Insert(text) if !reverse => lines.push(text.clone()),
                DiffLine::Delete(text) if reverse => lines.push(text.clone()),
                _ => {}
            }
        }
    }
    lines
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::patch::parse;

    fn apply_text(root: &Path, text: &str, reverse: bool, dry_run: bool) -> Result<()> {
        apply_document(root, &parse(text), reverse, dry_run)
    }

    const MODIFY: &str = "\
--- a/file.txt
+++ b/file.txt
@@ -1,3 +1,3 @@
 line1
-old_line
+new_line
 line3
";

    #[test]
    fn test_forward_modification() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "line1\nold_line\nline3\n").unwrap();
        apply_text(dir.path(), MODIFY, false, false).unwrap();
        let content = fs::read_to_string(dir.path().join("file.txt")).unwrap();
        assert_eq!(content, "line1\nnew_line\nline3\n");
    }

    #[test]
    fn test_reverse_modification_restores_original() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "line1\nnew_line\nline3\n").unwrap();
        apply_text(dir.path(), MODIFY, true, false).unwrap();
        let content = fs::read_to_string(dir.path().join("file.txt")).unwrap();
        assert_eq!(content, "line1\nold_line\nline3\n");
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "line1\nold_line\nline3\n").unwrap();
        apply_text(dir.path(), MODIFY, false, true).unwrap();
        let content = fs::read_to_string(dir.path().join("file.txt")).unwrap();
        assert_eq!(content, "line1\nold_line\nline3\n");
    }

    #[test]
    fn test_mismatched_content_fails_hunk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file.txt"), "line1\nsomething_else\nline3\n").unwrap();
        let err = apply_text(dir.path(), MODIFY, false, false).unwrap_err();
        assert!(matches!(err, PatchError::HunkApplicationFailed { .. }));
    }

    #[test]
    fn test_missing_modification_target() {
        let dir = tempdir().unwrap();
        let err = apply_text(dir.path(), MODIFY, false, false).unwrap_err();
        assert!(matches!(err, PatchError::FileNotFound { .. }));
    }

    #[test]
    fn test_creation_makes_parent_directories() {
        let dir = tempdir().unwrap();
        let text = "\
--- /dev/null
+++ b/sub/dir/new.txt
@@ -0,0 +1,2 @@
+hello
+world
";
        apply_text(dir.path(), text, false, false).unwrap();
        let content = fs::read_to_string(dir.path().join("sub/dir/new.txt")).unwrap();
        assert_eq!(content, "hello\nworld\n");
    }

    #[test]
    fn test_reverse_creation_checks_content() {
        let dir = tempdir().unwrap();
        let text = "\
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,1 @@
+hello
";
        fs::write(dir.path().join("new.txt"), "tampered\n").unwrap();
        let err = apply_text(dir.path(), text, true, false).unwrap_err();
        assert!(matches!(err, PatchError::ContentMismatch { .. }));
        // The mismatching file survives.
        assert!(dir.path().join("new.txt").exists());

        fs::write(dir.path().join("new.txt"), "hello\n").unwrap();
        apply_text(dir.path(), text, true, false).unwrap();
        assert!(!dir.path().join("new.txt").exists());
    }

    #[test]
    fn test_forward_deletion_requires_existence_only() {
        let dir = tempdir().unwrap();
        let text = "\
--- a/gone.txt
+++ /dev/null
@@ -1,1 +0,0 @@
-anything
";
        let err = apply_text(dir.path(), text, false, false).unwrap_err();
        assert!(matches!(err, PatchError::FileNotFound { .. }));

        // Content is not checked on forward deletion.
        fs::write(dir.path().join("gone.txt"), "different content\n").unwrap();
        apply_text(dir.path(), text, false, false).unwrap();
        assert!(!dir.path().join("gone.txt").exists());
    }

    #[test]
    fn test_reverse_deletion_recreates_file() {
        let dir = tempdir().unwrap();
        let text = "\
--- a/gone.txt
+++ /dev/null
@@ -1,2 +0,0 @@
-first
-second
";
        apply_text(dir.path(), text, true, false).unwrap();
        let content = fs::read_to_string(dir.path().join("gone.txt")).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_offset_propagation_across_hunks() {
        let dir = tempdir().unwrap();
        // Second hunk grows the file by two lines; the third still uses
        // pre-image numbering.
        fs::write(
            dir.path().join("file.txt"),
            "a\nb\nc\nd\ne\nf\ng\nh\n",
        )
        .unwrap();
        let text = "\
--- a/file.txt
+++ b/file.txt
@@ -1,2 +1,1 @@
 a
-b
@@ -3,2 +2,4 @@
 c
+x
+y
 d
@@ -7,2 +7,2 @@
 g
-h
+H
";
        apply_text(dir.path(), text, false, false).unwrap();
        let content = fs::read_to_string(dir.path().join("file.txt")).unwrap();
        assert_eq!(content, "a\nc\nx\ny\nd\ne\nf\ng\nH\n");
    }

    #[test]
    fn test_later_files_attempted_after_failure() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("second.txt"), "before\n").unwrap();
        let text = "\
--- a/missing.txt
+++ b/missing.txt
@@ -1,1 +1,1 @@
-x
+y
--- a/second.txt
+++ b/second.txt
@@ -1,1 +1,1 @@
-before
+after
";
        let err = apply_text(dir.path(), text, false, false).unwrap_err();
        // The first failure is reported...
        assert!(matches!(err, PatchError::FileNotFound { .. }));
        // ...but the second file was still rewritten.
        let content = fs::read_to_string(dir.path().join("second.txt")).unwrap();
        assert_eq!(content, "after\n");
    }

    #[test]
    fn test_traversal_rejected_before_any_write() {
        let dir = tempdir().unwrap();
        let text = "\
--- /dev/null
+++ b/../../../etc/evil.txt
@@ -0,0 +1,1 @@
+malicious
";
        let err = apply_text(dir.path(), text, false, false).unwrap_err();
        assert!(matches!(err, PatchError::PathTraversal { .. }));
    }
}
