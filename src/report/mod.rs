//! Report rendering
//!
//! Every renderer takes the finished [`ScanReport`] and returns the whole
//! document as a string; the binary decides whether it goes to stdout or a
//! file.

mod console;
mod html;
mod json;
mod text;

use crate::classify::Severity;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::scanner::ScanReport;

/// Render `report` in the requested format
pub fn render(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Console => Ok(console::render(report)),
        OutputFormat::Json => json::render(report),
        OutputFormat::Html => Ok(html::render(report)),
        OutputFormat::Text => Ok(text::render(report)),
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "info",
    }
}

fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::classify::{FeatureResult, Severity};
    use crate::dataset::BaselineStatus;
    use crate::scanner::{FileError, FileReport, ScanReport, Summary};
    use crate::types::{Confidence, FeatureType};

    fn result(feature: &str, status: BaselineStatus, severity: Severity, line: u32) -> FeatureResult {
        FeatureResult {
            feature: feature.to_string(),
            status,
            severity,
            line,
            column: 3,
            message: format!("{} message", feature),
            fixable: status != BaselineStatus::High,
            known: true,
            name: feature.to_string(),
            feature_type: FeatureType::Css,
            context: format!("{} <context>", feature),
            confidence: Confidence::High,
        }
    }

    pub(crate) fn sample_report() -> ScanReport {
        let files = vec![
            FileReport {
                path: "styles/app.css".to_string(),
                results: vec![
                    result("grid", BaselineStatus::High, Severity::Info, 3),
                    result("anchor-positioning", BaselineStatus::Limited, Severity::Error, 7),
                    result("has", BaselineStatus::Low, Severity::Warn, 9),
                ],
                warnings: vec!["syntax error near line 12, column 1".to_string()],
                error: None,
                passed: false,
            },
            FileReport {
                path: "big.js".to_string(),
                results: Vec::new(),
                warnings: Vec::new(),
                error: Some(FileError {
                    kind: "file-size",
                    message: "big.js is 20000000 bytes, larger than the 10485760 byte limit".to_string(),
                }),
                passed: false,
            },
        ];
        ScanReport {
            summary: Summary::from_files(&files),
            files,
            strict: false,
        }
    }
}
