//! Line-wise content rewriting that leaves protected lines alone.

use super::RuleSet;
use crate::matcher::LineClassifier;

/// The outcome of rewriting one file body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRewrite {
    pub result: String,
    pub changed: bool,
}

/// Applies content rules to every unprotected line of a text.
///
/// Lines are split on `\n` with an optional preceding `\r` and always joined
/// back with `\n`. A rewritten file therefore loses its carriage returns;
/// files that do not change are never written, so they keep theirs.
#[derive(Debug, Clone)]
pub struct ContentRewriter {
    rules: RuleSet,
    classifier: LineClassifier,
}

impl ContentRewriter {
    pub fn new(rules: RuleSet, classifier: LineClassifier) -> Self {
        Self { rules, classifier }
    }

    pub fn rewrite(&self, text: &str) -> ContentRewrite {
        let mut changed = false;

        let lines: Vec<String> = text
            .split('\n')
            .map(|raw| {
                let line = raw.strip_suffix('\r').unwrap_or(raw);
                if self.classifier.is_protected(line) {
                    return line.to_string();
                }
                let rewritten = self.rules.apply(line);
                if rewritten != line {
                    changed = true;
                }
                rewritten
            })
            .collect();

        ContentRewrite {
            result: lines.join("\n"),
            changed,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
