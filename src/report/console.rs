// Console report: colored, grouped per file
//
// Coloring follows `colored`'s global switch, so `--no-color` and non-tty
// detection are handled by the binary.

use super::{pluralize, severity_label};
use crate::classify::Severity;
use crate::scanner::{FileReport, ScanReport};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

pub(super) fn render(report: &ScanReport) -> String {
    let mut out = String::new();

    for file in &report.files {
        render_file(&mut out, file);
    }

    let summary = &report.summary;
    let _ = writeln!(
        out,
        "{} scanned: {}, {}, {} passed, {} failed",
        pluralize(summary.total_files, "file"),
        paint(&pluralize(summary.total_errors, "error"), Severity::Error),
        paint(&pluralize(summary.total_warnings, "warning"), Severity::Warn),
        summary.passed_files,
        summary.failed_files,
    );

    let verdict = if report.passed() {
        "✓ Baseline check passed".green().bold()
    } else {
        "✗ Baseline check failed".red().bold()
    };
    let _ = writeln!(out, "{}", verdict);
    out
}

fn render_file(out: &mut String, file: &FileReport) {
    if file.results.is_empty() && file.warnings.is_empty() && file.error.is_none() {
        return;
    }

    let _ = writeln!(out, "{}", file.path.bold().underline());

    if let Some(error) = &file.error {
        let _ = writeln!(out, "  {} {}", "✗".red().bold(), error.message);
    }

    for result in &file.results {
        let _ = writeln!(
            out,
            "  {:>4}:{:<3} {:<7} {} {}",
            result.line,
            result.column,
            paint(severity_label(result.severity), result.severity),
            result.message,
            format!("[{}]", result.feature).dimmed(),
        );
    }

    for warning in &file.warnings {
        let _ = writeln!(out, "  {} {}", "⚠".yellow(), warning.dimmed());
    }

    out.push('\n');
}

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => text.red(),
        Severity::Warn => text.yellow(),
        Severity::Info => text.blue(),
    }
}
