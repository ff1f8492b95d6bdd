//! Directory diff generator.
//!
//! Walks two directory trees, classifies every relative path in their union
//! as created, deleted, or modified, and renders the differences as a
//! unified-diff document. The generator and the patch engine communicate only
//! through that rendered text; they never share in-memory state.

mod hunk;
mod lcs;
mod walk;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::DiffConfig;
use crate::error::Result;
use crate::model::{DEV_NULL, DiffLine, FileDiff, Hunk, PatchDocument, split_lines};

/// Compare the trees rooted at `base` and `target` and render every
/// difference as unified-diff text.
///
/// Files are emitted in lexicographic order of their normalized relative
/// paths, so the output is deterministic and reproducible. Returns an empty
/// string when the trees are line-for-line identical under the engine's
/// rules (binary files are invisible to the comparison).
pub fn generate(base: &Path, target: &Path, config: &DiffConfig) -> Result<String> {
    let base_files = walk::collect_files(base)?;
    let target_files = walk::collect_files(target)?;
    debug!(
        base_files = base_files.len(),
        target_files = target_files.len(),
        "diffing trees"
    );

    let union: BTreeSet<&String> = base_files.keys().chain(target_files.keys()).collect();

    let mut document = PatchDocument::default();
    for rel in union {
        let entry = match (base_files.get(rel), target_files.get(rel)) {
            (None, Some(created)) => created_diff(rel, created, config)?,
            (Some(deleted), None) => deleted_diff(rel, deleted, config)?,
            (Some(old), Some(new)) => modified_diff(rel, old, new, config)?,
            (None, None) => None,
        };
        if let Some(file_diff) = entry {
            debug!(path = %rel, hunks = file_diff.hunks.len(), "emitting file diff");
            document.files.push(file_diff);
        }
    }

    if document.is_empty() {
        Ok(String::new())
    } else {
        Ok(document.render())
    }
}

fn created_diff(rel: &str, abs: &Path, config: &DiffConfig) -> Result<Option<FileDiff>> {
    let Some(lines) = load_text_file(abs, config)? else {
        return Ok(None);
    };
    let count = lines.len();
    Ok(Some(FileDiff {
        old_path: DEV_NULL.to_string(),
        new_path: rel.to_string(),
        hunks: vec![Hunk {
            old_start: 0,
            old_count: 0,
            new_start: 1,
            new_count: count,
            lines: lines.into_iter().map(DiffLine::Insert).collect(),
        }],
    }))
}

fn deleted_diff(rel: &str, abs: &Path, config: &DiffConfig) -> Result<Option<FileDiff>> {
    let Some(lines) = load_text_file(abs, config)? else {
        return Ok(None);
    };
    let count = lines.len();
    Ok(Some(FileDiff {
        old_path: rel.to_string(),
        new_path: DEV_NULL.to_string(),
        hunks: vec![Hunk {
            old_start: 1,
            old_count: count,
            new_start: 0,
            new_count: 0,
            lines: lines.into_iter().map(DiffLine::Delete).collect(),
        }],
    }))
}

fn modified_diff(
    rel: &str,
    old_abs: &Path,
    new_abs: &Path,
    config: &DiffConfig,
) -> Result<Option<FileDiff>> {
    let (Some(old_lines), Some(new_lines)) =
        (load_text_file(old_abs, config)?, load_text_file(new_abs, config)?)
    else {
        return Ok(None);
    };
    // Fast path: direct line-sequence comparison before any table work.
    if old_lines == new_lines {
        return Ok(None);
    }
    let ops = lcs::edit_script(&old_lines, &new_lines, config.max_lcs_lines);
    let hunks = hunk::group_hunks(&ops, config.context_lines);
    if hunks.is_empty() {
        return Ok(None);
    }
    Ok(Some(FileDiff {
        old_path: rel.to_string(),
        new_path: rel.to_string(),
        hunks,
    }))
}

/// Read a file as a logical line sequence; `None` classifies it as binary.
fn load_text_file(path: &Path, config: &DiffConfig) -> Result<Option<Vec<String>>> {
    let bytes = fs::read(path)?;
    if is_binary(&bytes, config.binary_sniff_len) {
        return Ok(None);
    }
    Ok(Some(split_lines(&String::from_utf8_lossy(&bytes))))
}

/// Any null byte within the sniff window classifies the file as binary.
fn is_binary(bytes: &[u8], sniff_len: usize) -> bool {
    bytes[..bytes.len().min(sniff_len)].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_binary_detects_null_in_window() {
        assert!(is_binary(b"ab\0cd", 8192));
        assert!(!is_binary(b"plain text", 8192));
    }

    #[test]
    fn test_is_binary_ignores_nulls_past_window() {
        let mut bytes = vec![b'a'; 16];
        bytes.push(0);
        assert!(!is_binary(&bytes, 16));
        assert!(is_binary(&bytes, 32));
    }
}
