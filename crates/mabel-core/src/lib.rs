//! Core data model and merge engine for mabel.
//!
//! This crate defines the canonical representation of a third-party JVM
//! dependency manifest: Maven coordinates and their language-aware identity,
//! per-artifact project records, the dependency and replacement maps, global
//! options with their combine semantics, and the top-level model merge that
//! folds several manifests into one canonical value.
//!
//! Everything here is a pure value transformer: immutable inputs in, new
//! values out. This crate is intentionally free of I/O.

pub mod coordinate;
pub mod dependencies;
pub mod language;
pub mod model;
pub mod options;
pub mod record;
pub mod render;
pub mod replacements;
pub mod version;
