//! Tolerant unified-diff parsing.
//!
//! A file section starts at a `--- ` line immediately followed by a `+++ `
//! line; anything between sections that matches neither is skipped, and a
//! malformed hunk header mid-document is skipped rather than fatal. The
//! parser is total: text without a single section yields an empty document,
//! which downstream operations surface as `NoHunksFound`.

use crate::model::{DEV_NULL, DiffLine, FileDiff, Hunk, PatchDocument};

/// Parse unified-diff text into a structured document.
pub fn parse(patch_text: &str) -> PatchDocument {
    let lines: Vec<&str> = patch_text.lines().collect();
    let mut files = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].starts_with("--- ")
            && let Some((file, next)) = parse_file_section(&lines, i)
        {
            files.push(file);
            i = next;
            continue;
        }
        i += 1;
    }
    PatchDocument { files }
}

fn parse_file_section(lines: &[&str], start: usize) -> Option<(FileDiff, usize)> {
    let plus_line = lines.get(start + 1)?;
    if !plus_line.starts_with("+++ ") {
        return None;
    }
    let old_path = header_path(&lines[start][4..]);
    let new_path = header_path(&plus_line[4..]);

    let mut hunks = Vec::new();
    let mut i = start + 2;
    while i < lines.len() {
        if lines[i].starts_with("--- ") {
            break;
        }
        if lines[i].starts_with("@@ ")
            && let Some((hunk, next)) = parse_hunk(lines, i)
        {
            hunks.push(hunk);
            i = next;
            continue;
        }
        i += 1;
    }

    Some((
        FileDiff {
            old_path,
            new_path,
            hunks,
        },
        i,
    ))
}

/// Extract a path from the text after a `--- `/`+++ ` marker: the optional
/// timestamp after the first tab is dropped and the portable `a/`/`b/` prefix
/// is stripped. The `/dev/null` sentinel is preserved verbatim.
fn header_path(raw: &str) -> String {
    let path = raw.split('\t').next().unwrap_or(raw);
    if path == DEV_NULL {
        return path.to_string();
    }
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

fn parse_hunk(lines: &[&str], start: usize) -> Option<(Hunk, usize)> {
    let (old_start, old_count, new_start, new_count) = parse_hunk_header(lines[start])?;

    let mut body = Vec::new();
    let mut old_remaining = old_count;
    let mut new_remaining = new_count;
    let mut i = start + 1;

    // Count-bounded consumption: a line's role is decided by its first
    // character, and each side's counter is tracked independently.
    while old_remaining > 0 && new_remaining > 0 && i < lines.len() {
        let line = lines[i];
        if let Some(text) = line.strip_prefix('-') {
            body.push(DiffLine::Delete(text.to_string()));
            old_remaining -= 1;
        } else if let Some(text) = line.strip_prefix('+') {
            body.push(DiffLine::Insert(text.to_string()));
            new_remaining -= 1;
        } else if line.starts_with('\\') {
            // `\ No newline at end of file` — ignored.
        } else {
            let text = line.strip_prefix(' ').unwrap_or(line);
            body.push(DiffLine::Context(text.to_string()));
            old_remaining -= 1;
            new_remaining -= 1;
        }
        i += 1;
    }

    // One side exhausted: absorb the remaining pure-insert or pure-delete
    // tail (files whose end is pure addition or pure removal).
    while new_remaining > 0 && i < lines.len() {
        if let Some(text) = lines[i].strip_prefix('+') {
            body.push(DiffLine::Insert(text.to_string()));
            new_remaining -= 1;
        } else if !lines[i].starts_with('\\') {
            break;
        }
        i += 1;
    }
    while old_remaining > 0 && i < lines.len() {
        if let Some(text) = lines[i].strip_prefix('-') {
            body.push(DiffLine::Delete(text.to_string()));
            old_remaining -= 1;
        } else if !lines[i].starts_with('\\') {
            break;
        }
        i += 1;
    }

    Some((
        Hunk {
            old_start,
            old_count,
            new_start,
            new_count,
            lines: body,
        },
        i,
    ))
}

/// Parse `@@ -o[,oc] +m[,mc] @@`; an omitted count defaults to 1.
fn parse_hunk_header(header: &str) -> Option<(usize, usize, usize, usize)> {
    let inner = header.strip_prefix("@@ ")?.split(" @@").next()?;
    let mut parts = inner.split_whitespace();
    let (old_start, old_count) = parse_range(parts.next()?.strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(parts.next()?.strip_prefix('+')?)?;
    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
