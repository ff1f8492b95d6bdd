//! Unified-diff generation and patch application engine.
//!
//! Two cooperating subsystems share the unified-diff text format as their only
//! contract. The [`diff`] generator walks two directory trees and renders
//! their line-level differences; the [`patch`] engine parses such a document
//! and replays it against a real tree, forward or in reverse, mutating or as a
//! dry run. The rendered text is the sole durable artifact: patches produced
//! on one machine are meant to be committed, inspected, and replayed on
//! another.
//!
//! The engine knows nothing beyond files and lines. Callers hand it
//! already-resolved absolute directory paths and already-read patch text;
//! everything else (caches, snapshot naming, terminal output, command
//! dispatch) belongs to them.

pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod patch;
pub mod utils;

pub use config::DiffConfig;
pub use diff::generate;
pub use error::{PatchError, Result};
pub use model::{DEV_NULL, DiffLine, DiffStats, FileDiff, Hunk, PatchDocument};
pub use patch::{apply, is_applicable, is_applied, parse, revert};
