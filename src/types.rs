// Core data structures shared by the mapper, the walkers and the classifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntax domain a feature was detected in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Css,
    Js,
    Html,
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Css => write!(f, "css"),
            FeatureType::Js => write!(f, "js"),
            FeatureType::Html => write!(f, "html"),
        }
    }
}

/// How sure a detection rule is about its match
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// One web-platform feature usage found in a source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectedFeature {
    /// Feature id (or raw pattern when nothing resolved it)
    pub name: String,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    /// 1-based line in the original source text
    pub line: u32,
    /// 1-based column, counted in characters
    pub column: u32,
    /// Human-readable description of the matched construct
    pub context: String,
    pub confidence: Confidence,
}
