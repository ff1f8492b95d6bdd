//! Recursive tree enumeration for the generator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::utils::path::to_relative;

/// Build a flat mapping from normalized relative path to absolute location.
///
/// Symlinks are not followed, so cyclic trees cannot arise; anything that is
/// not a plain file is skipped.
pub(crate) fn collect_files(root: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(rel) = to_relative(root, entry.path()) {
            files.insert(rel, entry.path().to_path_buf());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_collect_files_normalizes_nested_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.txt"), "x").unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "y").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let keys: Vec<&String> = files.keys().collect();
        assert_eq!(keys, ["a/b/deep.txt", "top.txt"]);
        assert_eq!(files["top.txt"], dir.path().join("top.txt"));
    }

    #[test]
    fn test_collect_files_skips_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("only/dirs")).unwrap();
        let files = collect_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }
}
