//! Built-in rule tables.
//!
//! A preset is plain data: it only fills in `content_rules` and `name_rules`
//! of a [`RunConfig`]. The engine itself knows nothing about any brand.

use crate::config::{Rule, RunConfig};
use crate::error::{RebrandError, Result};

/// Named rule tables that ship with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Sigma Block / uBlock Origin branding to "A Block".
    ABlock,
}

impl Preset {
    /// All available presets.
    pub fn all() -> &'static [Preset] {
        &[Preset::ABlock]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::ABlock => "ablock",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| RebrandError::InvalidConfig(format!("unknown preset '{}'", name)))
    }

    /// Content rules, most specific first.
    pub fn content_rules(&self) -> Vec<Rule> {
        match self {
            Preset::ABlock => pairs(&[
                ("Sigma Block", "A Block"),
                ("my-sigma-static-filters_", "my-ablock-static-filters_"),
                ("my-sigma-dynamic-rules_", "my-ablock-dynamic-rules_"),
                ("my-sigma-trusted-sites_", "my-ablock-trusted-sites_"),
                ("Sigma", "A Block"),
                ("uBlock Origin", "A Block"),
                ("uBlock", "A Block"),
                ("ublock", "ablock"),
                ("uBO", "A Block"),
            ]),
        }
    }

    pub fn name_rules(&self) -> Vec<Rule> {
        match self {
            Preset::ABlock => pairs(&[
                ("sigma", "ablock"),
                ("ublock", "ablock"),
                ("Sigma", "Ablock"),
            ]),
        }
    }

    /// Appends this preset's rules after any rules already in `config`.
    pub fn apply_to(&self, mut config: RunConfig) -> RunConfig {
        config.content_rules.extend(self.content_rules());
        config.name_rules.extend(self.name_rules());
        config
    }
}

fn pairs(table: &[(&str, &str)]) -> Vec<Rule> {
    table.iter().map(|(from, to)| Rule::new(*from, *to)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::RuleSet;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Preset::from_name("ablock").unwrap(), Preset::ABlock);
        assert!(Preset::from_name("nope").is_err());
    }

    #[test]
    fn test_ablock_content_rules_are_idempotent() {
        let rules = RuleSet::from_rules(Preset::ABlock.content_rules());
        let once = rules.apply(
            "Sigma Block and uBlock Origin, uBO, my-sigma-static-filters_x, ublock",
        );
        assert_eq!(once, "A Block and A Block, A Block, my-ablock-static-filters_x, ablock");
        assert_eq!(rules.apply(&once), once);
    }

    #[test]
    fn test_ablock_name_rules() {
        let rules = RuleSet::from_rules(Preset::ABlock.name_rules());
        assert_eq!(rules.apply("sigma-ublock-Sigma.js"), "ablock-ablock-Ablock.js");
    }

    #[test]
    fn test_apply_to_keeps_existing_rules_first() {
        let config = RunConfig::default().content_rule("Acme", "A Block");
        let config = Preset::ABlock.apply_to(config);
        assert_eq!(config.content_rules[0], Rule::new("Acme", "A Block"));
        assert_eq!(config.content_rules.len(), 1 + Preset::ABlock.content_rules().len());
    }
}
