//! Recursive traversal that rewrites content and renames files.

use crate::config::RunConfig;
use crate::diff::unified_diff;
use crate::error::{RebrandError, Result};
use crate::matcher::{FileFilter, LineClassifier, SkipReason};
use crate::report::{ChangeEntry, Mode};
use crate::transform::file::target_exists;
use crate::transform::{ContentRewriter, FileOperation, NameRewriter, RuleSet};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    Cancelled,
}

/// Rename bookkeeping for one walk.
///
/// Conflicts are decided from this state plus the disk as it was before the
/// walk touched it, so simulate and apply reach the same verdicts.
#[derive(Debug, Default)]
struct RenameLedger {
    claimed: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl RenameLedger {
    fn is_occupied(&self, target: &Path) -> bool {
        self.claimed.contains(target) || (target_exists(target) && !self.vacated.contains(target))
    }

    fn record(&mut self, from: &Path, to: &Path) {
        self.vacated.insert(from.to_path_buf());
        self.vacated.remove(to);
        self.claimed.insert(to.to_path_buf());
    }
}

/// Visits every file under a root, applying content and name rules.
pub struct TreeWalker<'a> {
    config: &'a RunConfig,
    filter: FileFilter,
    content: ContentRewriter,
    names: NameRewriter,
    mode: Mode,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> TreeWalker<'a> {
    /// Compiles the filters and rewriters for `config`.
    pub fn new(config: &'a RunConfig) -> Result<Self> {
        let classifier = LineClassifier::new(&config.protection)?;
        Ok(Self {
            config,
            filter: FileFilter::new(config)?,
            content: ContentRewriter::new(
                RuleSet::from_rules(config.content_rules.iter().cloned()),
                classifier,
            ),
            names: NameRewriter::new(RuleSet::from_rules(config.name_rules.iter().cloned())),
            mode: Mode::from_apply(config.apply),
            cancel: None,
        })
    }

    /// Stops the walk before the next entry once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Walks `dir`, passing every decision to `emit` as it is made.
    ///
    /// Directories are listed in file-name order. Each listing is read in full
    /// before its entries are visited, so renames made along the way never
    /// cause an entry to be seen twice.
    ///
    /// Failing to enumerate `dir` itself is fatal. Unreadable subdirectories,
    /// unreadable files, failed writes and failed renames are emitted as skip
    /// entries and the walk continues.
    pub fn walk<F>(&self, dir: &Path, mut emit: F) -> Result<WalkOutcome>
    where
        F: FnMut(ChangeEntry),
    {
        let mut ledger = RenameLedger::default();

        let entries = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in entries {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                debug!("cancellation requested, stopping walk");
                return Ok(WalkOutcome::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(RebrandError::TraversalFatal {
                        path: dir.to_path_buf(),
                        source: err,
                    });
                }
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    warn!(path = %path.display(), error = %err, "cannot enumerate");
                    emit(ChangeEntry::skipped_read(
                        path,
                        SkipReason::ReadError(err.to_string()),
                        self.mode,
                    ));
                    continue;
                }
            };

            if entry.file_type().is_file() {
                self.visit_file(entry.path(), dir, &mut ledger, &mut emit);
            }
        }

        Ok(WalkOutcome::Completed)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let excluded = entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.filter.is_excluded_dir(name));
        if excluded {
            debug!(path = %entry.path().display(), "excluded directory");
        }
        excluded
    }

    fn visit_file<F>(&self, path: &Path, root: &Path, ledger: &mut RenameLedger, emit: &mut F)
    where
        F: FnMut(ChangeEntry),
    {
        let wrote = self.rewrite_content(path, root, emit);
        self.rename(path, wrote, ledger, emit);
    }

    /// Returns false only when a detected change could not be written.
    fn rewrite_content<F>(&self, path: &Path, root: &Path, emit: &mut F) -> bool
    where
        F: FnMut(ChangeEntry),
    {
        if let Some(reason) = self.filter.skip_reason(path) {
            debug!(path = %path.display(), %reason, "content skipped");
            if self.config.report_skips {
                emit(ChangeEntry::skipped_read(path, reason, self.mode));
            }
            return true;
        }

        let original = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "read failed");
                emit(ChangeEntry::skipped_read(
                    path,
                    SkipReason::ReadError(e.to_string()),
                    self.mode,
                ));
                return true;
            }
        };

        let rewrite = self.content.rewrite(&original);
        if !rewrite.changed {
            return true;
        }

        let mut entry = ChangeEntry::content_changed(path, self.mode);
        if self.config.capture_diffs {
            let rel = path.strip_prefix(root).unwrap_or(path);
            entry = entry.with_diff(unified_diff(&original, &rewrite.result, rel));
        }

        if self.config.apply {
            let op = FileOperation::Write {
                path: path.to_path_buf(),
                contents: rewrite.result,
            };
            debug!("{}", op.describe());
            if let Err(e) = op.execute() {
                warn!(path = %path.display(), error = %e, "write failed");
                emit(ChangeEntry::skipped_write(path, e, self.mode));
                return false;
            }
        }

        emit(entry);
        true
    }

    fn rename<F>(&self, path: &Path, wrote: bool, ledger: &mut RenameLedger, emit: &mut F)
    where
        F: FnMut(ChangeEntry),
    {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "non UTF-8 file name, not renamed");
            return;
        };

        let new_name = self.names.rewrite(name);
        if new_name == name {
            return;
        }
        let new_path = path.with_file_name(&new_name);

        let refusal = if matches!(new_name.as_str(), "" | "." | "..") {
            Some(format!("invalid file name '{}'", new_name))
        } else if !wrote {
            Some("content write failed".to_string())
        } else if ledger.is_occupied(&new_path) {
            Some("target already exists".to_string())
        } else {
            None
        };

        if let Some(reason) = refusal {
            warn!(path = %path.display(), target = %new_path.display(), %reason, "rename skipped");
            emit(ChangeEntry::skipped_rename(path, new_path, reason, self.mode));
            return;
        }

        if self.config.apply {
            let op = FileOperation::Rename {
                from: path.to_path_buf(),
                to: new_path.clone(),
            };
            debug!("{}", op.describe());
            if let Err(e) = op.execute() {
                warn!(path = %path.display(), error = %e, "rename failed");
                emit(ChangeEntry::skipped_rename(path, new_path, e, self.mode));
                return;
            }
        }

        ledger.record(path, &new_path);
        emit(ChangeEntry::renamed(path, new_path, self.mode));
    }
}
