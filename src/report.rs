//! The change report: every rewrite, rename and skip decision of a run.

use crate::diff::DiffSummary;
use crate::error::Result;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether side effects were performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Dry,
    Write,
}

impl Mode {
    pub fn from_apply(apply: bool) -> Self {
        if apply { Mode::Write } else { Mode::Dry }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Dry => write!(f, "DRY RUN (no changes)"),
            Mode::Write => write!(f, "APPLY (writes & renames)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    ContentChanged,
    Renamed,
    SkippedRead,
    SkippedRename,
    /// A detected content change could not be written. Apply mode only.
    SkippedWrite,
}

/// One decision made during a run. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    pub kind: ChangeKind,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<PathBuf>,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl ChangeEntry {
    fn new(kind: ChangeKind, path: PathBuf, mode: Mode) -> Self {
        Self {
            kind,
            path,
            new_path: None,
            mode,
            reason: None,
            diff: None,
        }
    }

    pub fn content_changed(path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self::new(ChangeKind::ContentChanged, path.into(), mode)
    }

    pub fn renamed(path: impl Into<PathBuf>, new_path: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            new_path: Some(new_path.into()),
            ..Self::new(ChangeKind::Renamed, path.into(), mode)
        }
    }

    pub fn skipped_read(path: impl Into<PathBuf>, reason: impl ToString, mode: Mode) -> Self {
        Self {
            reason: Some(reason.to_string()),
            ..Self::new(ChangeKind::SkippedRead, path.into(), mode)
        }
    }

    pub fn skipped_rename(
        path: impl Into<PathBuf>,
        new_path: impl Into<PathBuf>,
        reason: impl ToString,
        mode: Mode,
    ) -> Self {
        Self {
            new_path: Some(new_path.into()),
            reason: Some(reason.to_string()),
            ..Self::new(ChangeKind::SkippedRename, path.into(), mode)
        }
    }

    pub fn skipped_write(path: impl Into<PathBuf>, reason: impl ToString, mode: Mode) -> Self {
        Self {
            reason: Some(reason.to_string()),
            ..Self::new(ChangeKind::SkippedWrite, path.into(), mode)
        }
    }

    pub fn with_diff(mut self, diff: String) -> Self {
        self.diff = Some(diff);
        self
    }

    /// True when both entries record the same decision, whatever their mode.
    pub fn same_decision(&self, other: &ChangeEntry) -> bool {
        self.kind == other.kind
            && self.path == other.path
            && self.new_path == other.new_path
            && self.reason == other.reason
            && self.diff == other.diff
    }

    pub fn is_skip(&self) -> bool {
        matches!(
            self.kind,
            ChangeKind::SkippedRead | ChangeKind::SkippedRename | ChangeKind::SkippedWrite
        )
    }

    /// Renders the entry as one report line, with paths relative to `root`.
    pub fn render(&self, root: &Path) -> String {
        let rel = relative(&self.path, root);
        let new_rel = self
            .new_path
            .as_deref()
            .map(|p| relative(p, root))
            .unwrap_or_default();
        let reason = self.reason.as_deref().unwrap_or("unknown");

        match (self.kind, self.mode) {
            (ChangeKind::ContentChanged, Mode::Dry) => format!("[DRY]   content: {}", rel),
            (ChangeKind::ContentChanged, Mode::Write) => format!("[WRITE] content: {}", rel),
            (ChangeKind::Renamed, Mode::Dry) => format!("[DRY]   rename: {} -> {}", rel, new_rel),
            (ChangeKind::Renamed, Mode::Write) => format!("[RENAME] {} -> {}", rel, new_rel),
            (ChangeKind::SkippedRead, _) => format!("[SKIP ] read: {}: {}", rel, reason),
            (ChangeKind::SkippedRename, _) => {
                format!("[SKIP ] rename failed: {} -> {}: {}", rel, new_rel, reason)
            }
            (ChangeKind::SkippedWrite, _) => format!("[SKIP ] write failed: {}: {}", rel, reason),
        }
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Counts per entry kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub content_changed: usize,
    pub renamed: usize,
    pub skipped_read: usize,
    pub skipped_rename: usize,
    pub skipped_write: usize,
}

impl ReportSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_read + self.skipped_rename + self.skipped_write
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} content change(s), {} rename(s), {} skipped ({} read, {} rename, {} write)",
            self.content_changed,
            self.renamed,
            self.skipped(),
            self.skipped_read,
            self.skipped_rename,
            self.skipped_write
        )
    }
}

/// The ordered sequence of entries produced by one run.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
    pub root: PathBuf,
    pub mode: Mode,
    pub entries: Vec<ChangeEntry>,
    /// Set when the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl ChangeReport {
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            root: root.into(),
            mode,
            entries: Vec::new(),
            cancelled: false,
        }
    }

    pub fn push(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry.kind {
                ChangeKind::ContentChanged => summary.content_changed += 1,
                ChangeKind::Renamed => summary.renamed += 1,
                ChangeKind::SkippedRead => summary.skipped_read += 1,
                ChangeKind::SkippedRename => summary.skipped_rename += 1,
                ChangeKind::SkippedWrite => summary.skipped_write += 1,
            }
        }
        summary
    }

    /// Line statistics over all captured diffs.
    pub fn diff_summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for diff in self.entries.iter().filter_map(|e| e.diff.as_deref()) {
            summary.merge(&DiffSummary::from_unified(diff));
        }
        summary
    }

    /// Entries of the given kind.
    pub fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// True when both reports hold the same decisions in the same order,
    /// ignoring the mode tag.
    pub fn same_decisions(&self, other: &ChangeReport) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.same_decision(b))
    }

    /// True when the run changed or would change nothing.
    pub fn is_clean(&self) -> bool {
        let summary = self.summary();
        summary.content_changed == 0 && summary.renamed == 0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.render(&self.root))?;
        }
        if self.cancelled {
            writeln!(f, "Cancelled before the walk finished.")?;
        }
        write!(f, "{}", self.summary())
    }
}
