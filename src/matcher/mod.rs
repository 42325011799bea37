//! Predicates deciding what the walker may touch: which directories to
//! enter, which files to read, and which lines to leave alone.

pub mod file;
pub mod line;

pub use file::{FileFilter, SkipReason};
pub use line::LineClassifier;
