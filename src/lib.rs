//! # Rebrand
//!
//! Tree-wide rebranding: rewrite brand strings inside files and rename files
//! whose names contain them, without breaking URLs, imports or links.
//!
//! The engine walks a directory, skipping excluded directories and
//! binary or oversized files. For every other file it applies an ordered list
//! of literal content rules to each line that does not look like a URL,
//! import or link reference, then applies an ordered list of name rules to the
//! file's base name. Every decision lands in a [`ChangeReport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rebrand::prelude::*;
//!
//! // Preview first.
//! let report = Rebrand::in_dir("./extension")
//!     .content(|r| r
//!         .replace_literal("uBlock Origin", "A Block")
//!         .replace_literal("uBlock", "A Block"))
//!     .names(|r| r.replace_literal("ublock", "ablock"))
//!     .dry_run()
//!     .run()?;
//! println!("{}", report);
//!
//! // Same decisions, now written to disk.
//! let config = RunConfig::new("./extension")
//!     .content_rule("uBlock", "A Block")
//!     .name_rule("ublock", "ablock")
//!     .with_apply(true);
//! let report = run(&config)?;
//! println!("{}", report.summary());
//! # Ok::<(), rebrand::error::RebrandError>(())
//! ```
//!
//! ## Rule order
//!
//! Rules run sequentially, each over the output of the previous one. Put the
//! longer, more specific rule first:
//!
//! ```rust
//! use rebrand::transform::RuleSet;
//!
//! let rules = RuleSet::new()
//!     .replace_literal("Alpha Widget", "X")
//!     .replace_literal("Alpha", "Y");
//! assert_eq!(rules.apply("Alpha Widget uses Alpha"), "X uses Y");
//! ```
//!
//! ## Known limitations
//!
//! - Protected-line detection is a substring heuristic.
//! - A rewritten file has its `\r\n` line endings normalized to `\n`.
//! - There is no rollback: a failed write leaves the file in whatever state
//!   the filesystem left it, and earlier files stay rewritten.

pub mod config;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod preset;
pub mod rebrand;
pub mod report;
pub mod transform;
pub mod walker;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ProtectionConfig, Rule, RunConfig};
    pub use crate::diff::DiffSummary;
    pub use crate::error::{RebrandError, Result};
    pub use crate::matcher::{FileFilter, LineClassifier, SkipReason};
    pub use crate::preset::Preset;
    pub use crate::rebrand::{Rebrand, run};
    pub use crate::report::{ChangeEntry, ChangeKind, ChangeReport, Mode, ReportSummary};
    pub use crate::transform::{
        ContentRewrite, ContentRewriter, FileOperation, NameRewriter, RuleSet, Transform,
    };
    pub use crate::walker::{TreeWalker, WalkOutcome};
}

pub use prelude::*;
