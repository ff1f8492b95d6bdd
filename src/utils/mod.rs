//! Utilities module aggregator exposing path normalization and containment helpers.

pub mod path;
