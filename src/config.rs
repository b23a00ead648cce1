//! Configuration file support.
//!
//! Loads an optional `.baseline-scan.toml` from the scanned root, or the file
//! given with `--config`.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = ".baseline-scan.toml";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fail on warnings as well as errors
    pub strict: bool,
    pub output_format: OutputFormat,
    /// Path patterns a file must match (empty = every supported file)
    pub include: Vec<String>,
    /// Path patterns excluded from the scan
    pub ignore: Vec<String>,
    pub targets: Targets,
    /// Per-feature severity overrides, keyed by feature id
    pub rules: BTreeMap<String, RuleLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            output_format: OutputFormat::Console,
            include: Vec::new(),
            ignore: vec![
                "node_modules/".to_string(),
                ".git/".to_string(),
                "dist/".to_string(),
                "build/".to_string(),
            ],
            targets: Targets::default(),
            rules: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Targets {
    pub baseline: BaselineTarget,
}

/// Which Baseline tier the project accepts without warnings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineTarget {
    /// Widely available only
    #[default]
    High,
    /// Newly available is acceptable
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warn,
    Off,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Html,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Console => "console",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
        };
        f.write_str(name)
    }
}

impl Config {
    /// Load `.baseline-scan.toml` from the given root directory.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        Self::load_from_path(&root.join(CONFIG_FILE_NAME))
    }

    /// Load config from a specific path, falling back to defaults.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Strict load: read or parse failures are returned, not masked
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ScanError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ScanError::Configuration {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.message().to_string())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ScanError::Configuration {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|source| ScanError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn rule_for(&self, feature: &str) -> Option<RuleLevel> {
        self.rules.get(feature).copied()
    }
}
