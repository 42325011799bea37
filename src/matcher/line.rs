//! Protected-line detection.
//!
//! The check is a textual heuristic, not a parser. It over-protects prose
//! that happens to contain a marker such as `from ` and under-protects links
//! written without a scheme. Both are accepted trade-offs; tune the markers
//! and patterns in [`ProtectionConfig`] instead of tightening the detection.

use crate::config::ProtectionConfig;
use crate::error::Result;
use regex::Regex;

/// Decides whether a line must be left untouched by content rules.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    markers: Vec<String>,
    case_sensitive: bool,
    patterns: Vec<Regex>,
}

impl LineClassifier {
    /// Builds a classifier, compiling any extra regex patterns.
    pub fn new(config: &ProtectionConfig) -> Result<Self> {
        let markers = config
            .markers
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| {
                if config.case_sensitive {
                    m.clone()
                } else {
                    m.to_lowercase()
                }
            })
            .collect();

        let patterns = config
            .patterns
            .iter()
            .map(|p| Ok(Regex::new(p)?))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            markers,
            case_sensitive: config.case_sensitive,
            patterns,
        })
    }

    /// Returns true when the line looks like a URL, import or link reference.
    pub fn is_protected(&self, line: &str) -> bool {
        let trimmed = line.trim();

        let hit = if self.case_sensitive {
            self.markers.iter().any(|m| trimmed.contains(m.as_str()))
        } else {
            let lower = trimmed.to_lowercase();
            self.markers.iter().any(|m| lower.contains(m.as_str()))
        };

        hit || self.patterns.iter().any(|re| re.is_match(trimmed))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self {
            markers: ProtectionConfig::default().markers,
            case_sensitive: true,
            patterns: Vec::new(),
        }
    }
}
