//! Filename rewriting.

use super::RuleSet;

/// Applies name rules to a single path segment.
///
/// Only the base name of the entry being visited is rewritten; parent
/// directories keep their names.
#[derive(Debug, Clone, Default)]
pub struct NameRewriter {
    rules: RuleSet,
}

impl NameRewriter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Returns the rewritten name, or `name` unchanged when no rule matches.
    pub fn rewrite(&self, name: &str) -> String {
        self.rules.apply(name)
    }
}
