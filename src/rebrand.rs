//! Run executor and DSL entry point.

use crate::config::{Rule, RunConfig};
use crate::diff::colorize;
use crate::error::{RebrandError, Result};
use crate::preset::Preset;
use crate::report::{ChangeReport, Mode};
use crate::transform::RuleSet;
use crate::walker::{TreeWalker, WalkOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::info;

/// Runs the engine once over `config.root_dir`.
///
/// Simulate and apply compute the same decisions; apply additionally issues
/// the writes and renames. For each file, its content entry is emitted (and
/// written) before its rename entry.
pub fn run(config: &RunConfig) -> Result<ChangeReport> {
    execute(config, None)
}

fn execute(config: &RunConfig, cancel: Option<&AtomicBool>) -> Result<ChangeReport> {
    config.validate()?;

    let root = config.root_dir.as_path();
    if !root.exists() {
        return Err(RebrandError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(RebrandError::InvalidConfig(format!(
            "root is not a directory: {}",
            root.display()
        )));
    }

    let mode = Mode::from_apply(config.apply);
    info!(
        root = %root.display(),
        %mode,
        content_rules = config.content_rules.len(),
        name_rules = config.name_rules.len(),
        "rebrand starting"
    );

    let mut walker = TreeWalker::new(config)?;
    if let Some(flag) = cancel {
        walker = walker.with_cancel_flag(flag);
    }

    let mut report = ChangeReport::new(root, mode);
    let outcome = walker.walk(root, |entry| report.push(entry))?;
    report.cancelled = outcome == WalkOutcome::Cancelled;

    info!(summary = %report.summary(), cancelled = report.cancelled, "rebrand finished");
    Ok(report)
}

/// The main rebranding DSL builder.
///
/// ```rust,no_run
/// use rebrand::prelude::*;
///
/// let report = Rebrand::in_dir("./extension")
///     .content(|r| r
///         .replace_literal("uBlock Origin", "A Block")
///         .replace_literal("uBlock", "A Block"))
///     .names(|r| r.replace_literal("ublock", "ablock"))
///     .dry_run()
///     .run()?;
///
/// println!("{}", report);
/// # Ok::<(), rebrand::error::RebrandError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Rebrand {
    config: RunConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Rebrand {
    /// Creates a new rebrand operation rooted at the given directory.
    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self::with_config(RunConfig::new(path))
    }

    /// Creates a new rebrand operation in the current directory.
    pub fn current_dir() -> Result<Self> {
        Ok(Self::in_dir(std::env::current_dir()?))
    }

    /// Starts from a fully built configuration.
    pub fn with_config(config: RunConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Appends content rules built by `f`.
    pub fn content<F>(mut self, f: F) -> Self
    where
        F: FnOnce(RuleSet) -> RuleSet,
    {
        let rules = f(RuleSet::new());
        self.config.content_rules.extend(rules.rules().iter().cloned());
        self
    }

    /// Appends name rules built by `f`.
    pub fn names<F>(mut self, f: F) -> Self
    where
        F: FnOnce(RuleSet) -> RuleSet,
    {
        let rules = f(RuleSet::new());
        self.config.name_rules.extend(rules.rules().iter().cloned());
        self
    }

    /// Appends a built-in rule table.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = preset.apply_to(self.config);
        self
    }

    /// Adds a directory name (or glob) that is never descended into.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.config.excluded_dir_names.push(name.into());
        self
    }

    /// Adds an extension whose content is never rewritten.
    pub fn binary_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.binary_extensions.push(ext.into());
        self
    }

    /// Sets the size ceiling for content rewriting.
    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    /// Adds a regex whose matches mark a line as protected.
    pub fn protect_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.protection.patterns.push(pattern.into());
        self
    }

    /// Compares protection markers case-insensitively.
    pub fn case_insensitive_protection(mut self) -> Self {
        self.config.protection.case_sensitive = false;
        self
    }

    /// Reports size, extension and stat skips in the change report.
    pub fn report_skips(mut self) -> Self {
        self.config.report_skips = true;
        self
    }

    /// Attaches a unified diff to each content change.
    pub fn capture_diffs(mut self) -> Self {
        self.config.capture_diffs = true;
        self
    }

    /// Enables dry-run mode (report changes without applying).
    pub fn dry_run(mut self) -> Self {
        self.config.apply = false;
        self
    }

    /// Performs writes and renames.
    pub fn apply_changes(mut self) -> Self {
        self.config.apply = true;
        self
    }

    /// Stops the walk before the next entry once `flag` is set.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Runs the rebrand and returns the change report.
    pub fn run(&self) -> Result<ChangeReport> {
        execute(&self.config, self.cancel.as_deref())
    }

    /// Runs in dry-run mode and returns the colorized diff of all content
    /// changes.
    pub fn preview(self) -> Result<String> {
        let report = self.dry_run().capture_diffs().run()?;
        Ok(report
            .entries
            .iter()
            .filter_map(|e| e.diff.as_deref())
            .map(colorize)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub fn root(&self) -> &Path {
        &self.config.root_dir
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn content_rules(&self) -> &[Rule] {
        &self.config.content_rules
    }
}
