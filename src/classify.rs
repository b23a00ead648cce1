//! Result classification
//!
//! Turns walker output into report records: resolve the Baseline status of
//! each detected feature, derive a severity from it, then apply the
//! configured rule overrides and baseline target.

use crate::config::{BaselineTarget, Config, RuleLevel};
use crate::dataset::{BaselineStatus, DatasetIndex};
use crate::types::{Confidence, DetectedFeature, FeatureType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    /// Default severity for a Baseline status
    pub fn from_status(status: BaselineStatus) -> Self {
        match status {
            BaselineStatus::Limited => Severity::Error,
            BaselineStatus::Low => Severity::Warn,
            BaselineStatus::High => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// One classified finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureResult {
    pub feature: String,
    pub status: BaselineStatus,
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub fixable: bool,
    /// False when the feature id is absent from the dataset
    pub known: bool,
    /// Display name from the dataset, or the feature id when unknown
    pub name: String,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub context: String,
    pub confidence: Confidence,
}

/// Classify detected features against the dataset and configuration.
///
/// Results removed by an `off` rule never appear in the output.
pub fn classify(
    detected: &[DetectedFeature],
    config: &Config,
    index: &DatasetIndex,
) -> Vec<FeatureResult> {
    let mut results: Vec<FeatureResult> = detected
        .iter()
        .filter_map(|feature| classify_one(feature, config, index))
        .collect();

    results.sort_by(|a, b| {
        a.line
            .cmp(&b.line)
            .then_with(|| a.column.cmp(&b.column))
            .then_with(|| a.feature.cmp(&b.feature))
    });
    results
}

fn classify_one(
    detected: &DetectedFeature,
    config: &Config,
    index: &DatasetIndex,
) -> Option<FeatureResult> {
    let rule = config.rule_for(&detected.name);
    if rule == Some(RuleLevel::Off) {
        return None;
    }

    let record = index.get(&detected.name);
    let status = record
        .map(|record| record.baseline_status)
        .unwrap_or(BaselineStatus::Limited);
    let name = record
        .map(|record| record.name.clone())
        .unwrap_or_else(|| detected.name.clone());

    let mut severity = match rule {
        Some(RuleLevel::Error) => Severity::Error,
        Some(RuleLevel::Warn) => Severity::Warn,
        Some(RuleLevel::Off) | None => Severity::from_status(status),
    };
    // The low target accepts newly available features, overridden or not
    if config.targets.baseline == BaselineTarget::Low
        && status == BaselineStatus::Low
        && severity == Severity::Warn
    {
        severity = Severity::Info;
    }

    let message = match (record.is_some(), status) {
        (false, _) => format!("`{}` not found in the feature dataset", detected.name),
        (true, BaselineStatus::High) => format!("{} is Baseline widely available", name),
        (true, BaselineStatus::Low) => {
            format!("{} is Baseline newly available, not yet widely available", name)
        }
        (true, BaselineStatus::Limited) => {
            format!("{} is not Baseline and has limited availability", name)
        }
    };

    Some(FeatureResult {
        feature: detected.name.clone(),
        status,
        severity,
        line: detected.line,
        column: detected.column,
        message,
        fixable: status != BaselineStatus::High,
        known: record.is_some(),
        name,
        feature_type: detected.feature_type,
        context: detected.context.clone(),
        confidence: detected.confidence,
    })
}

/// A file passes with no errors, and in strict mode no warnings either
pub fn passed(results: &[FeatureResult], strict: bool) -> bool {
    results.iter().all(|result| match result.severity {
        Severity::Error => false,
        Severity::Warn => !strict,
        Severity::Info => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    const DATASET: &str = r#"{
        "grid": { "name": "Grid", "status": { "baseline": "high" }, "compat_features": ["css.properties.display.grid"] },
        "dialog": { "name": "<dialog>", "status": { "baseline": "low" }, "compat_features": ["html.elements.dialog"] },
        "anchor-positioning": { "name": "Anchor positioning", "status": { "baseline": false }, "compat_features": [] },
        "fetch": { "name": "Fetch", "status": { "baseline": "high" }, "compat_features": ["api.fetch"] }
    }"#;

    fn index() -> DatasetIndex {
        DatasetIndex::build(&Dataset::from_json(DATASET).unwrap())
    }

    fn detected(name: &str, line: u32, column: u32) -> DetectedFeature {
        DetectedFeature {
            name: name.to_string(),
            feature_type: FeatureType::Css,
            line,
            column,
            context: name.to_string(),
            confidence: Confidence::High,
        }
    }

    #[test]
    fn test_severity_follows_status() {
        let features = vec![
            detected("grid", 1, 1),
            detected("dialog", 2, 1),
            detected("anchor-positioning", 3, 1),
        ];
        let results = classify(&features, &Config::default(), &index());
        let severities: Vec<Severity> = results.iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![Severity::Info, Severity::Warn, Severity::Error]);
        assert_eq!(results[0].name, "Grid");
        assert!(!results[0].fixable);
        assert!(results[1].fixable);
    }

    #[test]
    fn test_unknown_feature_is_error_with_distinct_message() {
        let results = classify(&[detected("made-up", 1, 1)], &Config::default(), &index());
        assert_eq!(results[0].status, BaselineStatus::Limited);
        assert_eq!(results[0].severity, Severity::Error);
        assert!(!results[0].known);
        assert!(results[0].message.contains("not found in the feature dataset"));
    }

    #[test]
    fn test_rule_off_removes_result() {
        let mut config = Config::default();
        config.rules.insert("fetch".to_string(), RuleLevel::Off);
        let features = vec![detected("fetch", 1, 1), detected("grid", 2, 1)];
        let results = classify(&features, &config, &index());
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|r| r.feature != "fetch"));
    }

    #[test]
    fn test_rule_overrides_force_severity() {
        let mut config = Config::default();
        config.rules.insert("grid".to_string(), RuleLevel::Error);
        config.rules.insert("anchor-positioning".to_string(), RuleLevel::Warn);
        let features = vec![detected("grid", 1, 1), detected("anchor-positioning", 2, 1)];
        let results = classify(&features, &config, &index());
        assert_eq!(results[0].severity, Severity::Error);
        assert_eq!(results[1].severity, Severity::Warn);
    }

    #[test]
    fn test_low_target_demotes_only_newly_available() {
        let mut config = Config::default();
        config.targets.baseline = BaselineTarget::Low;
        let features = vec![
            detected("grid", 1, 1),
            detected("dialog", 2, 1),
            detected("anchor-positioning", 3, 1),
        ];
        let results = classify(&features, &config, &index());
        let severities: Vec<Severity> = results.iter().map(|r| r.severity).collect();
        assert_eq!(severities, vec![Severity::Info, Severity::Info, Severity::Error]);
    }

    #[test]
    fn test_low_target_demotes_after_rule_overrides() {
        let mut config = Config::default();
        config.targets.baseline = BaselineTarget::Low;
        config.rules.insert("dialog".to_string(), RuleLevel::Warn);
        config.rules.insert("anchor-positioning".to_string(), RuleLevel::Warn);
        let features = vec![detected("dialog", 1, 1), detected("anchor-positioning", 2, 1)];
        let results = classify(&features, &config, &index());
        assert_eq!(results[0].severity, Severity::Info);
        assert_eq!(results[1].severity, Severity::Warn);

        config.rules.insert("dialog".to_string(), RuleLevel::Error);
        let results = classify(&features, &config, &index());
        assert_eq!(results[0].severity, Severity::Error);
    }

    #[test]
    fn test_results_are_ordered_by_position() {
        let features = vec![
            detected("grid", 2, 5),
            detected("fetch", 1, 9),
            detected("dialog", 2, 5),
            detected("anchor-positioning", 1, 3),
        ];
        let results = classify(&features, &Config::default(), &index());
        let order: Vec<&str> = results.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(order, vec!["anchor-positioning", "fetch", "dialog", "grid"]);
    }

    #[test]
    fn test_passed() {
        let results = classify(&[detected("dialog", 1, 1)], &Config::default(), &index());
        assert!(passed(&results, false));
        assert!(!passed(&results, true));

        let results = classify(&[detected("anchor-positioning", 1, 1)], &Config::default(), &index());
        assert!(!passed(&results, false));
        assert!(passed(&[], true));
    }
}
