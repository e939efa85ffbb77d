//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the core keeps its files: persisted preferences and the
//! trace log both live under a single data directory.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, preferences_file, trace_file};
