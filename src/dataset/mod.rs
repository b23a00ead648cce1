//! Feature dataset snapshot
//!
//! The dataset is an offline, versioned table of web-platform features:
//! feature id -> { name, baseline status, compat keys }. A curated snapshot is
//! compiled into the binary; a full web-features `data.json` can be loaded
//! from disk instead. Nothing here talks to the network.

mod index;

pub use index::{DatasetIndex, FeatureRecord};

use crate::error::{Result, ScanError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

const BUNDLED_SNAPSHOT: &str = include_str!("../../data/features.json");

/// Cross-browser availability tier of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaselineStatus {
    /// Widely available
    High,
    /// Newly available
    Low,
    /// Not Baseline (serialized as `false`)
    Limited,
}

impl BaselineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BaselineStatus::High => "high",
            BaselineStatus::Low => "low",
            BaselineStatus::Limited => "false",
        }
    }
}

impl fmt::Display for BaselineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BaselineStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            BaselineStatus::High => serializer.serialize_str("high"),
            BaselineStatus::Low => serializer.serialize_str("low"),
            BaselineStatus::Limited => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for BaselineStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Tier(String),
            Flag(bool),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Tier(tier) => match tier.as_str() {
                "high" => Ok(BaselineStatus::High),
                "low" => Ok(BaselineStatus::Low),
                other => Err(serde::de::Error::custom(format!(
                    "unknown baseline tier `{}`",
                    other
                ))),
            },
            Raw::Flag(false) => Ok(BaselineStatus::Limited),
            Raw::Flag(true) => Err(serde::de::Error::custom(
                "baseline must be \"high\", \"low\" or false",
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureStatus {
    pub baseline: BaselineStatus,
}

/// One feature as stored in the dataset file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureEntry {
    #[serde(default)]
    pub name: Option<String>,
    /// Absent for moved/split features, which are skipped by the index
    #[serde(default)]
    pub status: Option<FeatureStatus>,
    #[serde(default, alias = "compatFeatures")]
    pub compat_features: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Wrapped { features: BTreeMap<String, FeatureEntry> },
    Bare(BTreeMap<String, FeatureEntry>),
}

/// Parsed feature table, ordered by feature id
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub features: BTreeMap<String, FeatureEntry>,
}

impl Dataset {
    /// The snapshot compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SNAPSHOT)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: DatasetFile = serde_json::from_str(json).map_err(|e| ScanError::Dataset {
            message: e.to_string(),
        })?;

        let features = match file {
            DatasetFile::Wrapped { features } => features,
            DatasetFile::Bare(features) => features,
        };

        debug!("Loaded feature dataset with {} entries", features.len());
        Ok(Self { features })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ScanError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|e| ScanError::Dataset {
            message: format!("{}: {}", path.display(), e),
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_snapshot_parses() {
        let dataset = Dataset::bundled().unwrap();
        assert!(dataset.len() > 100);
        let grid = dataset.features.get("grid").unwrap();
        assert_eq!(
            grid.status.as_ref().unwrap().baseline,
            BaselineStatus::High
        );
        assert!(grid
            .compat_features
            .contains(&"css.properties.display.grid".to_string()));
    }

    #[test]
    fn test_status_accepts_false_and_rejects_true() {
        let limited: BaselineStatus = serde_json::from_str("false").unwrap();
        assert_eq!(limited, BaselineStatus::Limited);
        assert!(serde_json::from_str::<BaselineStatus>("true").is_err());
        assert!(serde_json::from_str::<BaselineStatus>("\"medium\"").is_err());
        assert_eq!(serde_json::to_string(&BaselineStatus::Limited).unwrap(), "false");
        assert_eq!(serde_json::to_string(&BaselineStatus::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_bare_map_and_camel_case_keys() {
        let json = r#"{
            "demo": {
                "name": "Demo",
                "status": { "baseline": "low" },
                "compatFeatures": ["api.Demo"]
            }
        }"#;
        let dataset = Dataset::from_json(json).unwrap();
        assert_eq!(dataset.features["demo"].compat_features, vec!["api.Demo"]);
    }

    #[test]
    fn test_malformed_json_is_dataset_error() {
        let err = Dataset::from_json("{ nope").unwrap_err();
        assert_eq!(err.kind(), "dataset");
    }
}
