//! Directory exclusion and per-file skip policy.

use crate::config::RunConfig;
use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Why a file's content was not rewritten.
///
/// This is the skip half of visiting one file: the walker either rewrites the
/// content or records one of these, then moves on to the rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooLarge { size: u64, limit: u64 },
    BinaryExtension(String),
    StatFailed(String),
    ReadError(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge { size, limit } => {
                write!(f, "too large ({} bytes > {} bytes)", size, limit)
            }
            SkipReason::BinaryExtension(ext) => write!(f, "binary extension .{}", ext),
            SkipReason::StatFailed(msg) => write!(f, "stat failed: {}", msg),
            SkipReason::ReadError(msg) => write!(f, "read error: {}", msg),
        }
    }
}

/// Decides which directories to prune and which files to leave unread.
#[derive(Debug, Clone)]
pub struct FileFilter {
    excluded_names: HashSet<String>,
    excluded_globs: GlobSet,
    binary_extensions: HashSet<String>,
    max_file_bytes: u64,
}

impl FileFilter {
    /// Builds the filter from a run configuration.
    ///
    /// Excluded directory entries containing `*`, `?`, `[` or `{` are compiled
    /// as globs matched against the base name; all others match exactly.
    pub fn new(config: &RunConfig) -> Result<Self> {
        let mut excluded_names = HashSet::new();
        let mut builder = GlobSetBuilder::new();

        for name in &config.excluded_dir_names {
            if name.contains(['*', '?', '[', '{']) {
                builder.add(Glob::new(name)?);
            } else {
                excluded_names.insert(name.clone());
            }
        }

        let binary_extensions = config
            .binary_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        Ok(Self {
            excluded_names,
            excluded_globs: builder.build()?,
            binary_extensions,
            max_file_bytes: config.max_file_bytes,
        })
    }

    /// Returns true when a directory with this base name must not be entered.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_names.contains(name) || self.excluded_globs.is_match(name)
    }

    /// Returns the reason to leave this file's content alone, if any.
    ///
    /// Resolved from metadata and extension only; the file is never opened.
    /// A file that cannot be stat'ed is skipped.
    pub fn skip_reason(&self, path: &Path) -> Option<SkipReason> {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            if self.binary_extensions.contains(&ext) {
                return Some(SkipReason::BinaryExtension(ext));
            }
        }

        match fs::metadata(path) {
            Ok(metadata) if metadata.len() > self.max_file_bytes => Some(SkipReason::TooLarge {
                size: metadata.len(),
                limit: self.max_file_bytes,
            }),
            Ok(_) => None,
            Err(e) => Some(SkipReason::StatFailed(e.to_string())),
        }
    }
}
