//! Literal rewrite rules and the rewriters built on them.

pub mod file;
pub mod name;
pub mod text;

pub use file::FileOperation;
pub use name::NameRewriter;
pub use text::{ContentRewrite, ContentRewriter};

use crate::config::Rule;

/// A rewrite step applied to a single piece of text.
pub trait Transform: Send + Sync {
    /// Applies the rewrite, returning the new text.
    fn apply(&self, input: &str) -> String;

    /// Returns a description of the rewrite.
    fn describe(&self) -> String;
}

impl Transform for Rule {
    fn apply(&self, input: &str) -> String {
        if input.contains(self.from.as_str()) {
            input.replace(self.from.as_str(), &self.to)
        } else {
            input.to_string()
        }
    }

    fn describe(&self) -> String {
        format!("Replace literal '{}' with '{}'", self.from, self.to)
    }
}

/// An ordered list of literal rules.
///
/// Rules run one after another over the same text: rule `i + 1` sees the
/// output of rule `i`, so a replacement may be matched again by a later rule.
/// Put longer, more specific rules first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Adds a literal string replacement.
    pub fn replace_literal(mut self, from: &str, to: &str) -> Self {
        self.rules.push(Rule::new(from, to));
        self
    }

    /// Applies every rule in order, each replacing all occurrences.
    pub fn apply(&self, input: &str) -> String {
        let mut result = input.to_string();
        for rule in &self.rules {
            result = Transform::apply(rule, &result);
        }
        result
    }

    /// Returns descriptions of all rules.
    pub fn describe(&self) -> Vec<String> {
        self.rules.iter().map(Transform::describe).collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
