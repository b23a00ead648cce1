// Baseline Scan - web-platform feature detection for CSS, JS/TS and HTML
//
// Pipeline: tree-sitter parse -> language walker -> FeatureMapper (dataset
// keys, enhanced patterns, fuzzy fallback) -> classifier -> report.

pub mod classify;
pub mod config;
pub mod dataset;
pub mod error;
pub mod language;
pub mod mapper;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod walkers;

pub use classify::{classify, FeatureResult, Severity};
pub use config::Config;
pub use error::{Result, ScanError};
pub use mapper::FeatureMapper;
pub use scanner::{ScanReport, Scanner};
pub use types::{Confidence, DetectedFeature, FeatureType};
pub use walkers::{WalkOutput, WalkerManager};
