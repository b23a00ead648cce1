// Standalone HTML report
//
// One self-contained document, inline CSS, no scripts. Every string that
// comes from scanned files is escaped.

use super::{pluralize, severity_label};
use crate::scanner::{FileReport, ScanReport};
use std::fmt::Write;

const STYLE: &str = r#"body{font-family:system-ui,sans-serif;margin:2rem;color:#1f2328}
table{border-collapse:collapse;width:100%;margin-bottom:1.5rem}
th,td{border-bottom:1px solid #d0d7de;padding:.35rem .5rem;text-align:left;vertical-align:top}
code{font-size:.9em}
.error{color:#cf222e}.warn{color:#9a6700}.info{color:#0969da}
.summary span{margin-right:1.5rem}
.file-error{color:#cf222e}.parse-warning{color:#57606a}"#;

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub(super) fn render(report: &ScanReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>Baseline scan report</title>");
    let _ = writeln!(out, "<style>{}</style>\n</head>\n<body>", STYLE);
    let _ = writeln!(out, "<h1>Baseline scan report</h1>");
    let _ = writeln!(
        out,
        "<p class=\"summary\"><span>{}</span><span class=\"error\">{}</span><span class=\"warn\">{}</span><span>{} passed</span><span>{} failed</span></p>",
        pluralize(summary.total_files, "file"),
        pluralize(summary.total_errors, "error"),
        pluralize(summary.total_warnings, "warning"),
        summary.passed_files,
        summary.failed_files
    );

    for file in &report.files {
        render_file(&mut out, file);
    }

    let _ = writeln!(out, "</body>\n</html>");
    out
}

fn render_file(out: &mut String, file: &FileReport) {
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(&file.path));

    if let Some(error) = &file.error {
        let _ = writeln!(out, "<p class=\"file-error\">{}</p>", escape_html(&error.message));
    }
    for warning in &file.warnings {
        let _ = writeln!(out, "<p class=\"parse-warning\">{}</p>", escape_html(warning));
    }
    if file.results.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "<table>\n<tr><th>Line</th><th>Severity</th><th>Feature</th><th>Status</th><th>Message</th><th>Context</th></tr>"
    );
    for result in &file.results {
        let severity = severity_label(result.severity);
        let _ = writeln!(
            out,
            "<tr><td>{}:{}</td><td class=\"{}\">{}</td><td><code>{}</code></td><td>{}</td><td>{}</td><td><code>{}</code></td></tr>",
            result.line,
            result.column,
            result.severity,
            severity,
            escape_html(&result.feature),
            result.status,
            escape_html(&result.message),
            escape_html(&result.context)
        );
    }
    let _ = writeln!(out, "</table>");
}
