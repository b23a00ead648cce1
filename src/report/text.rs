// Plain-text report for files and CI logs

use super::{pluralize, severity_label};
use crate::scanner::ScanReport;
use std::fmt::Write;

pub(super) fn render(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Baseline scan report");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out);

    for file in &report.files {
        let status = if file.passed { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "[{}] {}", status, file.path);

        if let Some(error) = &file.error {
            let _ = writeln!(out, "    {}: {}", error.kind, error.message);
        }
        for result in &file.results {
            let _ = writeln!(
                out,
                "    {}:{} {} {} ({}, status {})",
                result.line,
                result.column,
                severity_label(result.severity),
                result.message,
                result.feature,
                result.status
            );
            if !result.context.is_empty() {
                let _ = writeln!(out, "        {}", result.context);
            }
        }
        for warning in &file.warnings {
            let _ = writeln!(out, "    parse warning: {}", warning);
        }
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Files:    {}", summary.total_files);
    let _ = writeln!(out, "Errors:   {}", summary.total_errors);
    let _ = writeln!(out, "Warnings: {}", summary.total_warnings);
    let _ = writeln!(
        out,
        "Result:   {} ({} passed, {} failed)",
        if report.passed() { "passed" } else { "failed" },
        pluralize(summary.passed_files, "file"),
        summary.failed_files
    );
    out
}
