//! Error types for diff generation and patch application.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Every variant is a local, recoverable condition: the caller decides
/// whether to report it, retry with different inputs, or regenerate the
/// patch. Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The supplied text contains zero parsable file sections.
    #[error("no hunks found in patch text")]
    NoHunksFound,

    /// A path inside the patch would escape the target root after `.`/`..`
    /// resolution.
    #[error("path escapes target root: {path}")]
    PathTraversal { path: String },

    /// A modification or deletion target does not exist on disk.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Undoing a creation found on-disk content that disagrees with what the
    /// patch originally created.
    #[error("content mismatch in {}", .path.display())]
    ContentMismatch { path: PathBuf },

    /// A modification hunk's expected window is out of bounds or its lines
    /// disagree with the current file content.
    #[error("hunk #{hunk} failed to apply to {}: {reason}", .path.display())]
    HunkApplicationFailed {
        path: PathBuf,
        hunk: usize,
        reason: String,
    },

    /// IO failure during a read, write, delete, or directory walk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, PatchError>;
