//! Serializable run configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RebrandError, Result};

/// Default size ceiling for content rewriting (1 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Directories never descended into unless the configuration says otherwise.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "out",
    ".vscode",
    ".idea",
];

/// Extensions whose content is never rewritten.
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "svg", "woff", "woff2", "ttf", "eot", "zip", "tar", "gz",
];

/// Markers that make a line protected from content rewriting.
pub const DEFAULT_PROTECTION_MARKERS: &[&str] = &[
    "http://", "https://", "://", "import ", "require(", "export ", "from ", "@import", "url(",
    "src=", "href=",
];

/// A literal `from -> to` substring replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub from: String,
    pub to: String,
}

impl Rule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parses a `FROM=TO` pair as given on the command line.
    pub fn parse_pair(pair: &str) -> Result<Self> {
        match pair.split_once('=') {
            Some((from, to)) if !from.is_empty() => Ok(Self::new(from, to)),
            _ => Err(RebrandError::InvalidConfig(format!(
                "expected FROM=TO, got '{}'",
                pair
            ))),
        }
    }
}

/// Settings for the protected-line heuristic.
///
/// Detection is lexical: a line is protected when its trimmed form contains
/// any marker or matches any extra regex. Comparison against `markers` is
/// case-sensitive unless `case_sensitive` is false, in which case both sides
/// are lowercased first. The regexes in `patterns` carry their own flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionConfig {
    pub markers: Vec<String>,
    pub case_sensitive: bool,
    pub patterns: Vec<String>,
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            markers: DEFAULT_PROTECTION_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            case_sensitive: true,
            patterns: Vec::new(),
        }
    }
}

/// Everything a single run needs. Immutable once the run starts.
///
/// # Example YAML
///
/// ```yaml
/// root_dir: ./extension
/// apply: false
/// excluded_dir_names: [".git", "node_modules", "*.egg-info"]
/// max_file_bytes: 1048576
/// content_rules:
///   - from: "uBlock Origin"
///     to: "A Block"
///   - from: "uBlock"
///     to: "A Block"
/// name_rules:
///   - from: ublock
///     to: ablock
/// protection:
///   case_sensitive: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub root_dir: PathBuf,

    /// Perform writes and renames. When false the run only reports.
    pub apply: bool,

    /// Directory base names never descended into. Entries containing glob
    /// metacharacters are matched as globs against the base name.
    pub excluded_dir_names: Vec<String>,

    pub max_file_bytes: u64,

    /// Extensions (without the dot) whose content is never rewritten.
    pub binary_extensions: Vec<String>,

    pub content_rules: Vec<Rule>,
    pub name_rules: Vec<Rule>,
    pub protection: ProtectionConfig,

    /// Emit `SkippedRead` entries for size, extension and stat skips.
    pub report_skips: bool,

    /// Attach a unified diff to every `ContentChanged` entry.
    pub capture_diffs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            apply: false,
            excluded_dir_names: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            binary_extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            content_rules: Vec::new(),
            name_rules: Vec::new(),
            protection: ProtectionConfig::default(),
            report_skips: false,
            capture_diffs: false,
        }
    }
}

impl RunConfig {
    /// Creates a default configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root.into(),
            ..Default::default()
        }
    }

    /// Appends a content rule.
    pub fn content_rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.content_rules.push(Rule::new(from, to));
        self
    }

    /// Appends a name rule.
    pub fn name_rule(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.name_rules.push(Rule::new(from, to));
        self
    }

    /// Switches between simulate (`false`) and apply (`true`).
    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }

    /// Returns a copy with the given root directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root_dir = root.into();
        self
    }

    /// Load config from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config_file(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load config from a JSON file.
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config_file(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load config from a file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            other => Err(RebrandError::InvalidConfig(format!(
                "unsupported config format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Save config to a YAML file.
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Rejects configurations the engine cannot run safely.
    ///
    /// An empty `from` would match between every character, so it is refused
    /// for both rule lists.
    pub fn validate(&self) -> Result<()> {
        let empty = self
            .content_rules
            .iter()
            .map(|r| ("content", r))
            .chain(self.name_rules.iter().map(|r| ("name", r)))
            .find(|(_, r)| r.from.is_empty());

        if let Some((kind, rule)) = empty {
            return Err(RebrandError::InvalidConfig(format!(
                "{} rule with empty 'from' (to: '{}')",
                kind, rule.to
            )));
        }

        if let Some(rule) = self.name_rules.iter().find(|r| r.to.contains(['/', '\\'])) {
            return Err(RebrandError::InvalidConfig(format!(
                "name rule '{}' -> '{}' would introduce a path separator",
                rule.from, rule.to
            )));
        }

        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        RebrandError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read config file {}: {}", path.display(), e),
        ))
    })
}
