use crate::error::{Result, ScanError};
use crate::scanner::ScanReport;

pub(super) fn render(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| ScanError::Report {
        message: e.to_string(),
    })
}
